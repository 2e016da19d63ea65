use crate::domain::tts::{AudioArtifact, AudioFormat};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

#[derive(Debug, thiserror::Error)]
pub enum FinalizeError {
    #[error("finalizer unavailable: {0}")]
    Unavailable(String),
    #[error("finalizer failed: {0}")]
    CommandFailed(String),
    #[error("finalizer produced no output")]
    EmptyOutput,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizeOptions {
    /// Title tag, e.g. "Part 2 of 3"
    pub title: String,
    pub output_format: AudioFormat,
}

/// Post-processing applied to each synthesized chunk before delivery.
/// On failure the input artifact is left in place for the caller.
#[async_trait]
pub trait AudioFinalizer: Send + Sync {
    async fn finalize(
        &self,
        artifact: &AudioArtifact,
        options: &FinalizeOptions,
    ) -> Result<AudioArtifact, FinalizeError>;
}

pub struct PassthroughFinalizer;

#[async_trait]
impl AudioFinalizer for PassthroughFinalizer {
    async fn finalize(
        &self,
        artifact: &AudioArtifact,
        _options: &FinalizeOptions,
    ) -> Result<AudioArtifact, FinalizeError> {
        Ok(artifact.clone())
    }
}

/// Transcodes to the preferred format and writes the title tag with ffmpeg.
/// The finalized file is written next to the input, which is then removed.
pub struct FfmpegFinalizer {
    binary: String,
}

impl FfmpegFinalizer {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl AudioFinalizer for FfmpegFinalizer {
    async fn finalize(
        &self,
        artifact: &AudioArtifact,
        options: &FinalizeOptions,
    ) -> Result<AudioArtifact, FinalizeError> {
        let stem = artifact
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());
        let output = artifact.path.with_file_name(format!(
            "{}-final.{}",
            stem,
            options.output_format.extension()
        ));

        let result = Command::new(&self.binary)
            .arg("-y")
            .args(["-loglevel", "error"])
            .arg("-i")
            .arg(&artifact.path)
            .arg("-vn")
            .arg("-metadata")
            .arg(format!("title={}", options.title))
            .arg(&output)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await;

        let command_output = match result {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FinalizeError::Unavailable(format!("{} is not installed", self.binary)));
            }
            Err(e) => return Err(FinalizeError::Io(e)),
        };

        if !command_output.status.success() {
            if let Err(e) = tokio::fs::remove_file(&output).await {
                tracing::debug!(path = %output.display(), error = %e, "No partial ffmpeg output to remove");
            }
            return Err(FinalizeError::CommandFailed(
                String::from_utf8_lossy(&command_output.stderr).trim().to_string(),
            ));
        }

        let finalized = AudioArtifact::from_written_file(&output, options.output_format, artifact.engine)
            .await
            .ok_or(FinalizeError::EmptyOutput)?;

        artifact.release().await?;
        Ok(finalized)
    }
}
