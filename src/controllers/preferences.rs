use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::{
    domain::job::OwnerId,
    domain::tts::{PreferencesUpdate, SynthesisPreferences},
    error::AppResult,
    infrastructure::repositories::ProfileRepository,
};

pub struct PreferencesController {
    profiles: Arc<dyn ProfileRepository>,
}

impl PreferencesController {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    /// GET /api/owners/{ownerId}/preferences
    pub async fn get(
        State(controller): State<Arc<PreferencesController>>,
        Path(owner_id): Path<OwnerId>,
    ) -> AppResult<Json<SynthesisPreferences>> {
        let preferences = controller.profiles.get_preferences(owner_id).await?;
        Ok(Json(preferences))
    }

    /// PUT /api/owners/{ownerId}/preferences - Partial update
    pub async fn update(
        State(controller): State<Arc<PreferencesController>>,
        Path(owner_id): Path<OwnerId>,
        Json(update): Json<PreferencesUpdate>,
    ) -> AppResult<Json<SynthesisPreferences>> {
        let preferences = controller.profiles.update_preferences(owner_id, update).await?;
        tracing::info!(owner_id, engine = %preferences.engine, language = %preferences.language_tag, "Preferences updated");
        Ok(Json(preferences))
    }

    /// DELETE /api/owners/{ownerId}/preferences - Back to defaults
    pub async fn reset(
        State(controller): State<Arc<PreferencesController>>,
        Path(owner_id): Path<OwnerId>,
    ) -> AppResult<Json<SynthesisPreferences>> {
        let preferences = controller.profiles.reset_preferences(owner_id).await?;
        Ok(Json(preferences))
    }
}
