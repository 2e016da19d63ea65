use crate::helpers::{TestContext, TestOptions, MAX_SUBMISSION_CHARS};

use futures::future::join_all;
use hyper::StatusCode;
use serde_json::json;
use std::collections::HashSet;
use test_context::test_context;
use voicequeue::domain::submission::SubmissionReceipt;

async fn submit(ctx: &TestContext, owner_id: i64, text: &str) -> SubmissionReceipt {
    let response = ctx
        .client
        .post("/api/jobs", &json!({ "owner_id": owner_id, "text": text }))
        .await
        .unwrap();
    response.assert_status(StatusCode::ACCEPTED);
    response.json().unwrap()
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_accept_text_and_report_queue_position(ctx: &TestContext) {
    let first = submit(ctx, 1, "Hello there.").await;
    let second = submit(ctx, 2, &"a".repeat(250)).await;

    assert_eq!(first.position, 1);
    assert_eq!(second.position, 2);
    assert_ne!(first.job_id, second.job_id);
    // 100 characters per minute, rounded down
    assert_eq!(first.estimated_minutes, 0);
    assert_eq!(second.estimated_minutes, 2);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_accept_extracted_file_text(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/jobs",
            &json!({ "owner_id": 3, "text": "From a document.", "source_kind": "extracted_file" }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::ACCEPTED);

    let listing = ctx.client.get("/api/owners/3/jobs").await.unwrap();
    assert_eq!(listing.field("jobs")[0]["source_kind"], "extracted_file");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_blank_text(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/jobs", &json!({ "owner_id": 1, "text": "   \n\t " }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("empty");
    assert_eq!(ctx.queue.pending_len(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_text_over_the_limit(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/jobs",
            &json!({ "owner_id": 1, "text": "x".repeat(MAX_SUBMISSION_CHARS + 1) }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::PAYLOAD_TOO_LARGE)
        .assert_error_message("too long");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_count_characters_not_bytes(ctx: &TestContext) {
    // Two bytes per character in UTF-8
    let receipt = submit(ctx, 1, &"ж".repeat(MAX_SUBMISSION_CHARS)).await;
    assert_eq!(receipt.position, 1);
}

#[tokio::test]
async fn it_should_reject_submissions_when_queue_is_full() {
    let ctx = TestContext::start(TestOptions {
        queue_capacity: 2,
        ..Default::default()
    })
    .await;

    submit(&ctx, 1, "One.").await;
    submit(&ctx, 1, "Two.").await;

    let response = ctx
        .client
        .post("/api/jobs", &json!({ "owner_id": 1, "text": "Three." }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::SERVICE_UNAVAILABLE)
        .assert_error_message("queue is full");
    assert_eq!(ctx.queue.pending_len(), 2);

    ctx.shutdown().await;
}

#[tokio::test]
async fn it_should_reject_submissions_after_shutdown_started() {
    let ctx = TestContext::start(TestOptions::default()).await;
    ctx.queue.close();

    let response = ctx
        .client
        .post("/api/jobs", &json!({ "owner_id": 1, "text": "Too late." }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::SERVICE_UNAVAILABLE)
        .assert_error_message("shutting down");

    ctx.shutdown().await;
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_position_of_queued_job(ctx: &TestContext) {
    submit(ctx, 1, "First.").await;
    let second = submit(ctx, 1, "Second.").await;

    let response = ctx
        .client
        .get(&format!("/api/jobs/{}", second.job_id))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.field("position"), 2);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_zero_position_for_unknown_job(ctx: &TestContext) {
    let response = ctx
        .client
        .get(&format!("/api/jobs/{}", uuid::Uuid::new_v4()))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.field("position"), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_job_id(ctx: &TestContext) {
    let response = ctx.client.get("/api/jobs/not-a-uuid").await.unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_cancel_queued_job_once(ctx: &TestContext) {
    let first = submit(ctx, 1, "First.").await;
    let second = submit(ctx, 1, "Second.").await;

    let response = ctx
        .client
        .delete(&format!("/api/jobs/{}", first.job_id))
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.field("cancelled"), true);

    let again = ctx
        .client
        .delete(&format!("/api/jobs/{}", first.job_id))
        .await
        .unwrap();
    assert_eq!(again.field("cancelled"), false);

    // The remaining job moved up
    let position = ctx
        .client
        .get(&format!("/api/jobs/{}", second.job_id))
        .await
        .unwrap();
    assert_eq!(position.field("position"), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_jobs_for_owner_with_positions(ctx: &TestContext) {
    submit(ctx, 1, "Owner one, first.").await;
    submit(ctx, 2, "Owner two.").await;
    submit(ctx, 1, "Owner one, second.").await;

    let response = ctx.client.get("/api/owners/1/jobs").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.field("owner_id"), 1);

    let jobs = response.field("jobs").as_array().unwrap();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0]["position"], 1);
    assert_eq!(jobs[0]["status"], "pending");
    assert_eq!(jobs[1]["position"], 3);
    assert_eq!(jobs[1]["text_length"], "Owner one, second.".len());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_cancel_all_queued_jobs_of_owner(ctx: &TestContext) {
    submit(ctx, 1, "A.").await;
    submit(ctx, 2, "B.").await;
    submit(ctx, 1, "C.").await;

    let response = ctx.client.delete("/api/owners/1/jobs").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.field("cancelled"), 2);

    let remaining = ctx.client.get("/api/owners/1/jobs").await.unwrap();
    assert!(remaining.field("jobs").as_array().unwrap().is_empty());

    let other = ctx.client.get("/api/owners/2/jobs").await.unwrap();
    assert_eq!(other.field("jobs")[0]["position"], 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_assign_distinct_positions_to_concurrent_submissions(ctx: &TestContext) {
    let submissions = (0..8).map(|owner_id| {
        let client = ctx.client.clone();
        async move {
            client
                .post(
                    "/api/jobs",
                    &json!({ "owner_id": owner_id, "text": "Concurrent text." }),
                )
                .await
                .unwrap()
        }
    });

    let responses = join_all(submissions).await;

    let positions: HashSet<u64> = responses
        .iter()
        .map(|response| {
            response.assert_status(StatusCode::ACCEPTED);
            response.field("position").as_u64().unwrap()
        })
        .collect();
    assert_eq!(positions, (1..=8).collect::<HashSet<u64>>());
}
