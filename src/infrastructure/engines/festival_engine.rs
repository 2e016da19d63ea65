use super::command;
use super::engine::{EngineError, SpeechEngine};
use crate::domain::tts::{AudioFormat, EngineKind, SynthesisPreferences};
use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::Path;

/// Festival's `text2wave` script. It reads its input from a file, so the
/// chunk is staged next to the output and removed afterwards. Festival uses
/// its default voice; language and gender preferences are not applied.
pub struct FestivalEngine {
    binary: String,
}

impl FestivalEngine {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl SpeechEngine for FestivalEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Festival
    }

    fn output_format(&self, _preferences: &SynthesisPreferences) -> AudioFormat {
        AudioFormat::Wav
    }

    async fn synthesize(
        &self,
        text: &str,
        _preferences: &SynthesisPreferences,
        output: &Path,
    ) -> Result<(), EngineError> {
        let input = output.with_extension("txt");
        tokio::fs::write(&input, text).await?;

        let result = command::run(
            &self.binary,
            [OsStr::new("-o"), output.as_os_str(), input.as_os_str()],
            None,
        )
        .await;

        if let Err(e) = tokio::fs::remove_file(&input).await {
            tracing::debug!(path = %input.display(), error = %e, "Failed to remove festival input");
        }

        result.map(|_| ())
    }
}
