use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Language tags an owner may pick for synthesis
pub const SUPPORTED_LANGUAGES: &[&str] = &["ru", "en", "fr", "de", "es", "it"];

/// Speech synthesis backends, one variant per engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// Hosted text-to-speech endpoint (engine of last resort)
    #[serde(alias = "gtts")]
    Online,
    /// Local engine that enumerates installed voices
    #[serde(alias = "pyttsx3")]
    OfflineVoice,
    /// eSpeak command-line synthesizer
    Espeak,
    /// Festival `text2wave` command-line synthesizer
    Festival,
}

impl EngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Online => "online",
            EngineKind::OfflineVoice => "offline_voice",
            EngineKind::Espeak => "espeak",
            EngineKind::Festival => "festival",
        }
    }
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EngineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "online" | "gtts" => Ok(EngineKind::Online),
            "offline_voice" | "pyttsx3" => Ok(EngineKind::OfflineVoice),
            "espeak" => Ok(EngineKind::Espeak),
            "festival" => Ok(EngineKind::Festival),
            other => Err(format!("unknown engine: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceGender {
    Male,
    Female,
}

impl VoiceGender {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceGender::Male => "male",
            VoiceGender::Female => "female",
        }
    }
}

impl std::fmt::Display for VoiceGender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VoiceGender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(VoiceGender::Male),
            "female" => Ok(VoiceGender::Female),
            other => Err(format!("unknown voice gender: {}", other)),
        }
    }
}

/// Container formats an artifact can be in. Owners choose between
/// `Mp3` and `Ogg`; local engines natively produce `Wav`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Ogg,
    Wav,
}

impl AudioFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Ogg => "ogg",
            AudioFormat::Wav => "wav",
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for AudioFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mp3" => Ok(AudioFormat::Mp3),
            "ogg" => Ok(AudioFormat::Ogg),
            other => Err(format!("unsupported output format: {}", other)),
        }
    }
}

/// Per-owner synthesis settings, fetched once per job and never mutated by
/// the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisPreferences {
    pub engine: EngineKind,
    pub voice_gender: VoiceGender,
    pub language_tag: String,
    pub output_format: AudioFormat,
}

impl Default for SynthesisPreferences {
    fn default() -> Self {
        Self {
            engine: EngineKind::Online,
            voice_gender: VoiceGender::Female,
            language_tag: "ru".to_string(),
            output_format: AudioFormat::Mp3,
        }
    }
}

/// Partial update for PUT /api/owners/:owner_id/preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferencesUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<EngineKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_gender: Option<VoiceGender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<AudioFormat>,
}

impl PreferencesUpdate {
    /// Apply the update on top of `current`, validating the language tag
    /// and the output format
    pub fn apply_to(self, current: &SynthesisPreferences) -> Result<SynthesisPreferences, String> {
        let mut next = current.clone();

        if let Some(engine) = self.engine {
            next.engine = engine;
        }
        if let Some(gender) = self.voice_gender {
            next.voice_gender = gender;
        }
        if let Some(language) = self.language_tag {
            let language = language.trim().to_lowercase();
            if !SUPPORTED_LANGUAGES.contains(&language.as_str()) {
                return Err(format!("Invalid language: {}", language));
            }
            next.language_tag = language;
        }
        if let Some(format) = self.output_format {
            if format == AudioFormat::Wav {
                return Err("Output format must be mp3 or ogg".to_string());
            }
            next.output_format = format;
        }

        Ok(next)
    }
}
