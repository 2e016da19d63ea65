use super::profile_repository::{ProfileError, ProfileRepository};
use crate::domain::job::OwnerId;
use crate::domain::tts::{PreferencesUpdate, SynthesisPreferences};
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;
use sqlx::{FromRow, PgExecutor};
use std::sync::Arc;

#[derive(Debug, FromRow)]
struct PreferencesRow {
    engine: String,
    voice_gender: String,
    language_tag: String,
    output_format: String,
}

impl PreferencesRow {
    fn into_preferences(self, owner_id: OwnerId) -> Result<SynthesisPreferences, ProfileError> {
        let corrupt = |detail: String| ProfileError::Corrupt { owner_id, detail };

        Ok(SynthesisPreferences {
            engine: self.engine.parse().map_err(corrupt)?,
            voice_gender: self.voice_gender.parse().map_err(corrupt)?,
            language_tag: self.language_tag,
            output_format: self.output_format.parse().map_err(corrupt)?,
        })
    }
}

const SELECT_PREFERENCES: &str =
    "SELECT engine, voice_gender, language_tag, output_format FROM owner_preferences WHERE owner_id = $1";

const SELECT_PREFERENCES_FOR_UPDATE: &str =
    "SELECT engine, voice_gender, language_tag, output_format FROM owner_preferences WHERE owner_id = $1 FOR UPDATE";

/// PostgreSQL-backed profile store (table `owner_preferences`)
pub struct PgProfileRepository {
    pool: Arc<DbPool>,
    defaults: SynthesisPreferences,
}

impl PgProfileRepository {
    pub fn new(pool: Arc<DbPool>, defaults: SynthesisPreferences) -> Self {
        Self { pool, defaults }
    }

    /// Insert defaults for a new owner; existing rows are left alone
    async fn insert_defaults<'e, E>(&self, executor: E, owner_id: OwnerId) -> Result<(), ProfileError>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            r#"
            INSERT INTO owner_preferences (owner_id, engine, voice_gender, language_tag, output_format)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (owner_id) DO NOTHING
            "#,
        )
        .bind(owner_id)
        .bind(self.defaults.engine.as_str())
        .bind(self.defaults.voice_gender.as_str())
        .bind(&self.defaults.language_tag)
        .bind(self.defaults.output_format.extension())
        .execute(executor)
        .await?;

        Ok(())
    }

    async fn write<'e, E>(
        &self,
        executor: E,
        owner_id: OwnerId,
        preferences: &SynthesisPreferences,
    ) -> Result<(), ProfileError>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            r#"
            INSERT INTO owner_preferences (owner_id, engine, voice_gender, language_tag, output_format, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            ON CONFLICT (owner_id) DO UPDATE
            SET engine = EXCLUDED.engine,
                voice_gender = EXCLUDED.voice_gender,
                language_tag = EXCLUDED.language_tag,
                output_format = EXCLUDED.output_format,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(owner_id)
        .bind(preferences.engine.as_str())
        .bind(preferences.voice_gender.as_str())
        .bind(&preferences.language_tag)
        .bind(preferences.output_format.extension())
        .bind(chrono::Utc::now())
        .execute(executor)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn get_preferences(&self, owner_id: OwnerId) -> Result<SynthesisPreferences, ProfileError> {
        let pool = self.pool.as_ref();

        self.insert_defaults(pool, owner_id).await?;

        let row = sqlx::query_as::<_, PreferencesRow>(SELECT_PREFERENCES)
            .bind(owner_id)
            .fetch_one(pool)
            .await?;

        row.into_preferences(owner_id)
    }

    /// Read-modify-write under a row lock, so concurrent partial updates of
    /// different fields all land
    async fn update_preferences(
        &self,
        owner_id: OwnerId,
        update: PreferencesUpdate,
    ) -> Result<SynthesisPreferences, ProfileError> {
        let mut tx = self.pool.begin().await?;

        self.insert_defaults(&mut *tx, owner_id).await?;

        let row = sqlx::query_as::<_, PreferencesRow>(SELECT_PREFERENCES_FOR_UPDATE)
            .bind(owner_id)
            .fetch_one(&mut *tx)
            .await?;
        let current = row.into_preferences(owner_id)?;

        // Dropping the transaction rolls it back
        let next = update.apply_to(&current).map_err(ProfileError::Invalid)?;
        self.write(&mut *tx, owner_id, &next).await?;

        tx.commit().await?;
        Ok(next)
    }

    async fn reset_preferences(&self, owner_id: OwnerId) -> Result<SynthesisPreferences, ProfileError> {
        self.write(self.pool.as_ref(), owner_id, &self.defaults).await?;
        Ok(self.defaults.clone())
    }
}
