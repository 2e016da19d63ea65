pub mod artifact;
pub mod error;
pub mod preferences;
pub mod registry;
pub mod segmenter;
pub mod voice_selection;

pub use artifact::AudioArtifact;
pub use error::SynthesisError;
pub use preferences::{
    AudioFormat, EngineKind, PreferencesUpdate, SynthesisPreferences, VoiceGender,
    SUPPORTED_LANGUAGES,
};
pub use registry::{EngineRegistry, FALLBACK_ORDER};
pub use segmenter::{segment, split_sentences, DEFAULT_MAX_CHUNK_CHARS};
pub use voice_selection::{language_candidates, select_voice, InstalledVoice};
