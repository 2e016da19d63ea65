use crate::domain::tts::{AudioFormat, EngineKind, SynthesisPreferences, VoiceGender};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Preferences are kept in memory when unset
    pub database_url: Option<String>,
    pub log_format: LogFormat,
    // Queue and worker
    pub queue_capacity: usize,
    pub max_chunk_chars: usize,
    pub max_submission_chars: usize,
    pub chars_per_minute: usize,
    pub poll_interval: Duration,
    pub fault_backoff: Duration,
    pub temp_dir: PathBuf,
    pub outbox_dir: PathBuf,
    // Default preferences for new owners
    pub default_preferences: SynthesisPreferences,
    // Engines
    pub online_tts_url: String,
    pub espeak_binary: String,
    pub festival_binary: String,
    pub speech_rate: u32,
    // Finalization
    pub audio_finalizer: FinalizerKind,
    pub ffmpeg_binary: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("expected pretty or json, got {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum FinalizerKind {
    Passthrough,
    Ffmpeg,
}

impl FromStr for FinalizerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "passthrough" => Ok(FinalizerKind::Passthrough),
            "ffmpeg" => Ok(FinalizerKind::Ffmpeg),
            other => Err(format!("expected passthrough or ffmpeg, got {}", other)),
        }
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T>(name: &str, default: &str) -> Result<T, Box<dyn std::error::Error>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = var_or(name, default);
    raw.trim()
        .parse::<T>()
        .map_err(|e| format!("invalid {}='{}': {}", name, raw, e).into())
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: var_or("HOST", "0.0.0.0"),
            port: parse_var("PORT", "8080")?,
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty()),
            log_format: parse_var("LOG_FORMAT", "pretty")?,
            queue_capacity: parse_var("QUEUE_CAPACITY", "100")?,
            max_chunk_chars: parse_var("MAX_CHUNK_CHARS", "4000")?,
            max_submission_chars: parse_var("MAX_SUBMISSION_CHARS", "100000")?,
            chars_per_minute: parse_var("CHARS_PER_MINUTE", "1000")?,
            poll_interval: Duration::from_millis(parse_var("POLL_INTERVAL_MS", "1000")?),
            fault_backoff: Duration::from_millis(parse_var("FAULT_BACKOFF_MS", "5000")?),
            temp_dir: PathBuf::from(var_or("TEMP_DIR", "./temp")),
            outbox_dir: PathBuf::from(var_or("OUTBOX_DIR", "./outbox")),
            default_preferences: SynthesisPreferences {
                engine: parse_var::<EngineKind>("DEFAULT_TTS_ENGINE", "online")?,
                voice_gender: parse_var::<VoiceGender>("DEFAULT_VOICE_GENDER", "female")?,
                language_tag: var_or("DEFAULT_LANGUAGE", "ru").trim().to_lowercase(),
                output_format: parse_var::<AudioFormat>("DEFAULT_AUDIO_FORMAT", "mp3")?,
            },
            online_tts_url: var_or("ONLINE_TTS_URL", "https://translate.google.com/translate_tts"),
            espeak_binary: var_or("ESPEAK_BINARY", "espeak"),
            festival_binary: var_or("FESTIVAL_BINARY", "text2wave"),
            speech_rate: parse_var("SPEECH_RATE", "150")?,
            audio_finalizer: parse_var("AUDIO_FINALIZER", "passthrough")?,
            ffmpeg_binary: var_or("FFMPEG_BINARY", "ffmpeg"),
        };

        if config.queue_capacity == 0 {
            return Err("QUEUE_CAPACITY must be at least 1".into());
        }
        if config.max_chunk_chars == 0 {
            return Err("MAX_CHUNK_CHARS must be at least 1".into());
        }

        Ok(config)
    }
}
