use super::command;
use super::engine::{EngineError, SpeechEngine};
use crate::domain::tts::{select_voice, AudioFormat, EngineKind, InstalledVoice, SynthesisPreferences};
use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Local speech backend that exposes its installed voices
#[async_trait]
pub trait VoiceDriver: Send + Sync {
    async fn list_voices(&self) -> Result<Vec<InstalledVoice>, EngineError>;

    async fn render(
        &self,
        voice: &InstalledVoice,
        text: &str,
        output: &Path,
    ) -> Result<(), EngineError>;
}

/// Engine that picks a concrete installed voice by language and gender.
///
/// The voice list is read once and cached. A failed listing is not cached,
/// so a later job retries it.
pub struct OfflineVoiceEngine {
    driver: Arc<dyn VoiceDriver>,
    voices: OnceCell<Vec<InstalledVoice>>,
}

impl OfflineVoiceEngine {
    pub fn new(driver: Arc<dyn VoiceDriver>) -> Self {
        Self {
            driver,
            voices: OnceCell::new(),
        }
    }

    async fn voices(&self) -> Result<&[InstalledVoice], EngineError> {
        let voices = self
            .voices
            .get_or_try_init(|| async {
                let voices = self.driver.list_voices().await?;
                tracing::info!(voice_count = voices.len(), "Installed voices loaded");
                Ok::<_, EngineError>(voices)
            })
            .await?;
        Ok(voices.as_slice())
    }
}

#[async_trait]
impl SpeechEngine for OfflineVoiceEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::OfflineVoice
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
        let voices = self.voices().await?;
        let voice = select_voice(voices, &preferences.language_tag, preferences.voice_gender)
            .ok_or_else(|| EngineError::UnsupportedVoice {
                language: preferences.language_tag.clone(),
            })?;

        tracing::debug!(voice_id = %voice.id, voice_name = %voice.name, "Voice selected");
        self.driver.render(voice, text, output).await
    }
}

/// [`VoiceDriver`] backed by the voices eSpeak reports with `--voices`
pub struct EspeakVoiceDriver {
    binary: String,
    speech_rate: u32,
}

impl EspeakVoiceDriver {
    pub fn new(binary: impl Into<String>, speech_rate: u32) -> Self {
        Self {
            binary: binary.into(),
            speech_rate,
        }
    }
}

/// Parse the table printed by `espeak --voices`:
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  5  ru              --/M      Russian            europe/ru
/// ```
///
/// The file column is the voice id. The gender column is folded into the
/// name so gender markers can match it.
pub fn parse_voice_listing(listing: &str) -> Vec<InstalledVoice> {
    listing
        .lines()
        .skip_while(|line| !line.trim_start().starts_with("Pty"))
        .skip(1)
        .filter_map(|line| {
            let columns: Vec<&str> = line.split_whitespace().collect();
            if columns.len() < 5 {
                return None;
            }

            let language = columns[1];
            let gender = match columns[2].rsplit('/').next() {
                Some("M") => "male",
                Some("F") => "female",
                _ => "",
            };
            let name = if gender.is_empty() {
                columns[3].to_string()
            } else {
                format!("{} {}", columns[3], gender)
            };

            Some(InstalledVoice {
                id: columns[4].to_string(),
                name,
                languages: vec![language.to_string()],
            })
        })
        .collect()
}

#[async_trait]
impl VoiceDriver for EspeakVoiceDriver {
    async fn list_voices(&self) -> Result<Vec<InstalledVoice>, EngineError> {
        let stdout = command::run(&self.binary, ["--voices"], None).await?;
        Ok(parse_voice_listing(&String::from_utf8_lossy(&stdout)))
    }

    async fn render(
        &self,
        voice: &InstalledVoice,
        text: &str,
        output: &Path,
    ) -> Result<(), EngineError> {
        let rate = self.speech_rate.to_string();
        command::run(
            &self.binary,
            [
                OsStr::new("-v"),
                OsStr::new(&voice.id),
                OsStr::new("-s"),
                OsStr::new(&rate),
                OsStr::new("-w"),
                output.as_os_str(),
                OsStr::new("--stdin"),
            ],
            Some(text),
        )
        .await?;
        Ok(())
    }
}
