use crate::domain::tts::SynthesisError;
use crate::infrastructure::repositories::ProfileError;

/// Failures scoped to a single job. Each one fails the job and is turned
/// into a notification to its owner; none of them stops the worker.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("could not load preferences: {0}")]
    PreferencesUnavailable(#[source] ProfileError),

    #[error("synthesis of part {part} of {total} failed: {source}")]
    SynthesisFailed {
        part: usize,
        total: usize,
        #[source]
        source: SynthesisError,
    },

    #[error("{failed} of {total} parts could not be delivered: {reason}")]
    DeliveryFailed {
        failed: usize,
        total: usize,
        reason: String,
    },

    #[error("could not prepare job workspace: {0}")]
    Workspace(#[from] std::io::Error),
}

impl JobError {
    /// Text sent to the owner when their job fails
    pub fn owner_message(&self) -> String {
        match self {
            JobError::PreferencesUnavailable(_) => {
                "Your settings could not be loaded, so the conversion was not started. Please try again later.".to_string()
            }
            JobError::SynthesisFailed { source, .. } => {
                format!("Conversion failed: {}. Please submit the text again.", source)
            }
            JobError::DeliveryFailed { failed, total, .. } => {
                format!("{} of {} audio parts could not be delivered.", failed, total)
            }
            JobError::Workspace(_) => {
                "An internal error prevented the conversion. Please try again later.".to_string()
            }
        }
    }
}
