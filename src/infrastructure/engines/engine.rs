use crate::domain::tts::{AudioFormat, EngineKind, SynthesisPreferences};
use async_trait::async_trait;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("engine unavailable: {0}")]
    Unavailable(String),
    #[error("no voice for language '{language}'")]
    UnsupportedVoice { language: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("command '{command}' failed: {detail}")]
    CommandFailed { command: String, detail: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Speech synthesis backend.
///
/// Implementations write the audio for one chunk to `output` and report the
/// format they wrote. They must not be called while any queue lock is held.
/// The registry validates the written file, so an engine that returns `Ok`
/// after producing nothing is treated as a failure.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    fn kind(&self) -> EngineKind;

    /// Format of the file `synthesize` writes for these preferences
    fn output_format(&self, preferences: &SynthesisPreferences) -> AudioFormat;

    async fn synthesize(
        &self,
        text: &str,
        preferences: &SynthesisPreferences,
        output: &Path,
    ) -> Result<(), EngineError>;
}
