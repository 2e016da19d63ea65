use crate::helpers::PgContext;

use futures::future::join_all;
use hyper::StatusCode;
use serde_json::json;
use voicequeue::domain::tts::{
    AudioFormat, EngineKind, PreferencesUpdate, SynthesisPreferences, VoiceGender,
};
use voicequeue::infrastructure::repositories::{ProfileError, ProfileRepository};

async fn row_count(ctx: &PgContext, owner_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM owner_preferences WHERE owner_id = $1")
        .bind(owner_id)
        .fetch_one(ctx.pool.as_ref())
        .await
        .unwrap()
}

#[tokio::test]
async fn it_should_report_connected_database_when_ready() {
    let Some(ctx) = PgContext::start().await else {
        return;
    };

    let response = ctx.client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.field("database"), "connected");

    ctx.shutdown().await;
}

#[tokio::test]
async fn it_should_create_default_preferences_once() {
    let Some(ctx) = PgContext::start().await else {
        return;
    };

    assert_eq!(row_count(&ctx, 100).await, 0);

    let first = ctx.profiles.get_preferences(100).await.unwrap();
    let second = ctx.profiles.get_preferences(100).await.unwrap();

    assert_eq!(first, SynthesisPreferences::default());
    assert_eq!(second, first);
    assert_eq!(row_count(&ctx, 100).await, 1);

    ctx.shutdown().await;
}

#[tokio::test]
async fn it_should_persist_partial_updates() {
    let Some(ctx) = PgContext::start().await else {
        return;
    };

    let response = ctx
        .client
        .put(
            "/api/owners/101/preferences",
            &json!({ "voice_gender": "male", "output_format": "ogg" }),
        )
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);

    // Read straight from the store, not from the response
    let stored = ctx.profiles.get_preferences(101).await.unwrap();
    assert_eq!(
        stored,
        SynthesisPreferences {
            voice_gender: VoiceGender::Male,
            output_format: AudioFormat::Ogg,
            ..SynthesisPreferences::default()
        }
    );

    ctx.shutdown().await;
}

#[tokio::test]
async fn it_should_leave_stored_preferences_untouched_on_invalid_update() {
    let Some(ctx) = PgContext::start().await else {
        return;
    };

    ctx.profiles
        .update_preferences(
            102,
            PreferencesUpdate {
                engine: Some(EngineKind::Espeak),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let err = ctx
        .profiles
        .update_preferences(
            102,
            PreferencesUpdate {
                engine: Some(EngineKind::Festival),
                language_tag: Some("xx".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ProfileError::Invalid(_)));

    let stored = ctx.profiles.get_preferences(102).await.unwrap();
    assert_eq!(stored.engine, EngineKind::Espeak);
    assert_eq!(stored.language_tag, "ru");

    ctx.shutdown().await;
}

#[tokio::test]
async fn it_should_reset_stored_preferences() {
    let Some(ctx) = PgContext::start().await else {
        return;
    };

    ctx.client
        .put("/api/owners/103/preferences", &json!({ "language_tag": "fr" }))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let response = ctx.client.delete("/api/owners/103/preferences").await.unwrap();
    response.assert_status(StatusCode::OK);

    let stored = ctx.profiles.get_preferences(103).await.unwrap();
    assert_eq!(stored, SynthesisPreferences::default());
    assert_eq!(row_count(&ctx, 103).await, 1);

    ctx.shutdown().await;
}

#[tokio::test]
async fn it_should_keep_every_field_of_concurrent_partial_updates() {
    let Some(ctx) = PgContext::start().await else {
        return;
    };

    let owners: Vec<i64> = (200..210).collect();
    let updates = owners.iter().flat_map(|&owner_id| {
        let engine = PreferencesUpdate {
            engine: Some(EngineKind::Espeak),
            ..Default::default()
        };
        let language = PreferencesUpdate {
            language_tag: Some("en".to_string()),
            ..Default::default()
        };
        let gender = PreferencesUpdate {
            voice_gender: Some(VoiceGender::Male),
            ..Default::default()
        };
        [engine, language, gender].map(|update| {
            let profiles = ctx.profiles.clone();
            async move { profiles.update_preferences(owner_id, update).await }
        })
    });

    for result in join_all(updates).await {
        result.unwrap();
    }

    for owner_id in owners {
        let stored = ctx.profiles.get_preferences(owner_id).await.unwrap();
        assert_eq!(
            stored,
            SynthesisPreferences {
                engine: EngineKind::Espeak,
                voice_gender: VoiceGender::Male,
                language_tag: "en".to_string(),
                output_format: AudioFormat::Mp3,
            },
            "owner {} lost an update",
            owner_id
        );
        assert_eq!(row_count(&ctx, owner_id).await, 1);
    }

    ctx.shutdown().await;
}

#[tokio::test]
async fn it_should_fail_on_corrupt_stored_preferences() {
    let Some(ctx) = PgContext::start().await else {
        return;
    };

    sqlx::query(
        "INSERT INTO owner_preferences (owner_id, engine, voice_gender, language_tag, output_format) \
         VALUES ($1, 'polly', 'female', 'ru', 'mp3')",
    )
    .bind(104_i64)
    .execute(ctx.pool.as_ref())
    .await
    .unwrap();

    let response = ctx.client.get("/api/owners/104/preferences").await.unwrap();

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    ctx.shutdown().await;
}
