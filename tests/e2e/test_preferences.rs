use crate::helpers::TestContext;

use hyper::StatusCode;
use serde_json::json;
use test_context::test_context;
use voicequeue::domain::tts::{AudioFormat, EngineKind, SynthesisPreferences, VoiceGender};

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_defaults_for_new_owner(ctx: &TestContext) {
    let response = ctx.client.get("/api/owners/42/preferences").await.unwrap();

    response.assert_status(StatusCode::OK);

    let preferences: SynthesisPreferences = response.json().unwrap();
    assert_eq!(preferences, SynthesisPreferences::default());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_update_only_given_fields(ctx: &TestContext) {
    let response = ctx
        .client
        .put(
            "/api/owners/42/preferences",
            &json!({ "engine": "espeak", "language_tag": "EN" }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let updated: SynthesisPreferences = response.json().unwrap();
    assert_eq!(updated.engine, EngineKind::Espeak);
    assert_eq!(updated.language_tag, "en");
    assert_eq!(updated.voice_gender, VoiceGender::Female);
    assert_eq!(updated.output_format, AudioFormat::Mp3);

    // Persisted for subsequent reads
    let stored: SynthesisPreferences = ctx
        .client
        .get("/api/owners/42/preferences")
        .await
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(stored, updated);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_accept_legacy_engine_names(ctx: &TestContext) {
    let response = ctx
        .client
        .put("/api/owners/7/preferences", &json!({ "engine": "pyttsx3" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.field("engine"), "offline_voice");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_unsupported_language(ctx: &TestContext) {
    let response = ctx
        .client
        .put("/api/owners/42/preferences", &json!({ "language_tag": "xx" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Invalid language");

    // Nothing was stored
    let stored: SynthesisPreferences = ctx
        .client
        .get("/api/owners/42/preferences")
        .await
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(stored.language_tag, "ru");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_wav_as_output_format(ctx: &TestContext) {
    let response = ctx
        .client
        .put("/api/owners/42/preferences", &json!({ "output_format": "wav" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("mp3 or ogg");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reset_preferences_to_defaults(ctx: &TestContext) {
    ctx.client
        .put(
            "/api/owners/42/preferences",
            &json!({ "voice_gender": "male", "output_format": "ogg" }),
        )
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let response = ctx.client.delete("/api/owners/42/preferences").await.unwrap();

    response.assert_status(StatusCode::OK);
    let preferences: SynthesisPreferences = response.json().unwrap();
    assert_eq!(preferences, SynthesisPreferences::default());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_keep_owners_independent(ctx: &TestContext) {
    ctx.client
        .put("/api/owners/1/preferences", &json!({ "language_tag": "de" }))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let other: SynthesisPreferences = ctx
        .client
        .get("/api/owners/2/preferences")
        .await
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(other.language_tag, "ru");
}
