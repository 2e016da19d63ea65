use crate::domain::job::OwnerId;
use crate::domain::tts::{PreferencesUpdate, SynthesisPreferences};
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("invalid preferences: {0}")]
    Invalid(String),
    #[error("stored preferences for owner {owner_id} are corrupt: {detail}")]
    Corrupt { owner_id: OwnerId, detail: String },
}

/// Store of per-owner synthesis preferences.
///
/// Implementations are responsible for:
/// - Creating default preferences the first time an owner is seen
/// - Validating partial updates before persisting them
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Preferences for an owner, created from the defaults if absent
    async fn get_preferences(&self, owner_id: OwnerId) -> Result<SynthesisPreferences, ProfileError>;

    /// Apply a partial update and return the resulting preferences
    async fn update_preferences(
        &self,
        owner_id: OwnerId,
        update: PreferencesUpdate,
    ) -> Result<SynthesisPreferences, ProfileError>;

    /// Overwrite an owner's preferences with the defaults
    async fn reset_preferences(&self, owner_id: OwnerId) -> Result<SynthesisPreferences, ProfileError>;
}
