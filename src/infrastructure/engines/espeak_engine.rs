use super::command;
use super::engine::{EngineError, SpeechEngine};
use crate::domain::tts::{AudioFormat, EngineKind, SynthesisPreferences, VoiceGender};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;

/// eSpeak command-line synthesizer. Picks a gendered variant of the
/// language voice (`ru+f2`, `en+m1`) and writes WAV.
pub struct EspeakEngine {
    binary: String,
    speech_rate: u32,
}

impl EspeakEngine {
    pub fn new(binary: impl Into<String>, speech_rate: u32) -> Self {
        Self {
            binary: binary.into(),
            speech_rate,
        }
    }

    fn voice_variant(preferences: &SynthesisPreferences) -> String {
        let variant = match preferences.voice_gender {
            VoiceGender::Male => "m1",
            VoiceGender::Female => "f2",
        };
        format!("{}+{}", preferences.language_tag, variant)
    }

    fn args(&self, preferences: &SynthesisPreferences, output: &Path) -> Vec<OsString> {
        vec![
            "-v".into(),
            Self::voice_variant(preferences).into(),
            "-s".into(),
            self.speech_rate.to_string().into(),
            "-w".into(),
            output.as_os_str().to_owned(),
            "--stdin".into(),
        ]
    }
}

#[async_trait]
impl SpeechEngine for EspeakEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Espeak
    }

    fn output_format(&self, _preferences: &SynthesisPreferences) -> AudioFormat {
        AudioFormat::Wav
    }

    async fn synthesize(
        &self,
        text: &str,
        preferences: &SynthesisPreferences,
        output: &Path,
    ) -> Result<(), EngineError> {
        command::run(&self.binary, self.args(preferences, output), Some(text)).await?;
        Ok(())
    }
}
