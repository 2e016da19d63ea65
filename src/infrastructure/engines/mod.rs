mod command;
pub mod engine;
pub mod espeak_engine;
pub mod festival_engine;
pub mod offline_voice_engine;
pub mod online_engine;

pub use engine::{EngineError, SpeechEngine};
pub use espeak_engine::EspeakEngine;
pub use festival_engine::FestivalEngine;
pub use offline_voice_engine::{parse_voice_listing, EspeakVoiceDriver, OfflineVoiceEngine, VoiceDriver};
pub use online_engine::{OnlineEngine, DEFAULT_ONLINE_TTS_URL};
