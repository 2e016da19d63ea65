use super::artifact::AudioArtifact;
use super::error::SynthesisError;
use super::preferences::{EngineKind, SynthesisPreferences};
use crate::infrastructure::engines::SpeechEngine;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Order in which engines are tried after the preferred one fails.
/// The online engine comes last: it is the engine of last resort.
pub const FALLBACK_ORDER: [EngineKind; 4] = [
    EngineKind::OfflineVoice,
    EngineKind::Espeak,
    EngineKind::Festival,
    EngineKind::Online,
];

/// Set of synthesis engines wrapped in a deterministic fallback chain
pub struct EngineRegistry {
    engines: HashMap<EngineKind, Arc<dyn SpeechEngine>>,
}

impl EngineRegistry {
    pub fn new(engines: Vec<Arc<dyn SpeechEngine>>) -> Self {
        let engines = engines
            .into_iter()
            .map(|engine| (engine.kind(), engine))
            .collect();
        Self { engines }
    }

    pub fn registered(&self) -> Vec<EngineKind> {
        FALLBACK_ORDER
            .iter()
            .copied()
            .filter(|kind| self.engines.contains_key(kind))
            .collect()
    }

    /// Engines to try, in order, for a preferred engine.
    ///
    /// The preferred engine goes first, followed by the rest of
    /// [`FALLBACK_ORDER`]. Choosing the online engine yields a chain of just
    /// that engine, since nothing ranks below it. Unregistered engines are
    /// skipped.
    pub fn fallback_chain(&self, preferred: EngineKind) -> Vec<EngineKind> {
        let mut chain = vec![preferred];
        if preferred != EngineKind::Online {
            chain.extend(FALLBACK_ORDER.iter().copied().filter(|kind| *kind != preferred));
        }
        chain.retain(|kind| self.engines.contains_key(kind));
        chain
    }

    /// Synthesize one chunk into `workdir`, walking the fallback chain until
    /// an engine produces a non-empty file.
    ///
    /// Later engines are never invoked once one succeeds. When every engine
    /// fails the error carries the last engine's reason.
    pub async fn synthesize(
        &self,
        chunk: &str,
        preferences: &SynthesisPreferences,
        workdir: &Path,
    ) -> Result<AudioArtifact, SynthesisError> {
        let chain = self.fallback_chain(preferences.engine);
        let mut last_failure: Option<(EngineKind, String)> = None;

        for kind in chain {
            let Some(engine) = self.engines.get(&kind) else {
                continue;
            };

            let format = engine.output_format(preferences);
            let output = workdir.join(format!("{}-{}.{}", kind, Uuid::new_v4(), format.extension()));
            let start_time = Instant::now();

            let reason = match engine.synthesize(chunk, preferences, &output).await {
                Ok(()) => match AudioArtifact::from_written_file(&output, format, kind).await {
                    Some(artifact) => {
                        tracing::info!(
                            engine = %kind,
                            preferred = %preferences.engine,
                            latency_ms = start_time.elapsed().as_millis(),
                            characters_count = chunk.chars().count(),
                            audio_size_bytes = artifact.size_bytes,
                            "Chunk synthesized"
                        );
                        return Ok(artifact);
                    }
                    None => "engine produced an empty or missing file".to_string(),
                },
                Err(e) => e.to_string(),
            };

            tracing::warn!(
                engine = %kind,
                error = %reason,
                latency_ms = start_time.elapsed().as_millis(),
                "Engine failed, falling through"
            );
            discard_partial(&output).await;
            last_failure = Some((kind, reason));
        }

        match last_failure {
            Some((engine, reason)) => Err(SynthesisError::Exhausted { engine, reason }),
            None => Err(SynthesisError::NoEngines),
        }
    }
}

async fn discard_partial(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove partial artifact");
        }
    }
}
