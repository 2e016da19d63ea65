use super::preferences::{AudioFormat, EngineKind};
use std::path::{Path, PathBuf};

/// Audio produced by a successful synthesis call.
///
/// The artifact is a handle to a file inside a job workspace. Whoever holds
/// the artifact last is responsible for releasing it; the worker does so by
/// dropping the whole workspace once delivery is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub format: AudioFormat,
    pub engine: EngineKind,
}

impl AudioArtifact {
    /// Build an artifact from a file an engine claims to have written.
    ///
    /// Returns `None` if the file is missing or empty, so a partially
    /// written output is never registered as successful.
    pub async fn from_written_file(
        path: &Path,
        format: AudioFormat,
        engine: EngineKind,
    ) -> Option<Self> {
        let metadata = tokio::fs::metadata(path).await.ok()?;
        if !metadata.is_file() || metadata.len() == 0 {
            return None;
        }

        Some(Self {
            path: path.to_path_buf(),
            size_bytes: metadata.len(),
            format,
            engine,
        })
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Remove the underlying file. Missing files are not an error.
    pub async fn release(&self) -> std::io::Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
