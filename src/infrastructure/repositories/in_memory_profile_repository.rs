use super::profile_repository::{ProfileError, ProfileRepository};
use crate::domain::job::OwnerId;
use crate::domain::tts::{PreferencesUpdate, SynthesisPreferences};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Process-local profile store, used when no database is configured
pub struct InMemoryProfileRepository {
    defaults: SynthesisPreferences,
    profiles: RwLock<HashMap<OwnerId, SynthesisPreferences>>,
}

impl InMemoryProfileRepository {
    pub fn new(defaults: SynthesisPreferences) -> Self {
        Self {
            defaults,
            profiles: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn get_preferences(&self, owner_id: OwnerId) -> Result<SynthesisPreferences, ProfileError> {
        if let Some(existing) = self.profiles.read().get(&owner_id) {
            return Ok(existing.clone());
        }

        let mut profiles = self.profiles.write();
        let preferences = profiles
            .entry(owner_id)
            .or_insert_with(|| {
                tracing::info!(owner_id, "Default preferences created");
                self.defaults.clone()
            })
            .clone();
        Ok(preferences)
    }

    async fn update_preferences(
        &self,
        owner_id: OwnerId,
        update: PreferencesUpdate,
    ) -> Result<SynthesisPreferences, ProfileError> {
        let mut profiles = self.profiles.write();
        let current = profiles
            .get(&owner_id)
            .cloned()
            .unwrap_or_else(|| self.defaults.clone());

        let next = update.apply_to(&current).map_err(ProfileError::Invalid)?;
        profiles.insert(owner_id, next.clone());
        Ok(next)
    }

    async fn reset_preferences(&self, owner_id: OwnerId) -> Result<SynthesisPreferences, ProfileError> {
        self.profiles.write().insert(owner_id, self.defaults.clone());
        Ok(self.defaults.clone())
    }
}
