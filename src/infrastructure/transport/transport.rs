use crate::domain::job::OwnerId;
use crate::domain::tts::AudioArtifact;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("delivery rejected: {0}")]
    Rejected(String),
}

/// Channel back to the owner of a job.
///
/// `deliver_audio` must copy what it needs out of the artifact before
/// returning: the worker releases the file right after delivery.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn notify(&self, owner_id: OwnerId, message: &str) -> Result<(), TransportError>;

    async fn deliver_audio(
        &self,
        owner_id: OwnerId,
        artifact: &AudioArtifact,
        label: Option<&str>,
    ) -> Result<(), TransportError>;
}
