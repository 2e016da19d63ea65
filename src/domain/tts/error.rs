use super::preferences::EngineKind;

#[derive(Debug, Clone, thiserror::Error)]
pub enum SynthesisError {
    #[error("no synthesis engine is registered")]
    NoEngines,
    #[error("all engines failed; last engine {engine}: {reason}")]
    Exhausted { engine: EngineKind, reason: String },
}
