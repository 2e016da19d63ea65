use crate::helpers::{self, TestContext};

use helpers::TestOptions;
use hyper::StatusCode;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_ok_for_health_check(ctx: &TestContext) {
    let response = ctx.client.get("/health").await.unwrap();

    response.assert_status(StatusCode::OK);

    // Health endpoint returns plain text
    let body = String::from_utf8(response.body_bytes.clone()).unwrap();
    assert_eq!(body, "OK");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_ready_status(ctx: &TestContext) {
    let response = ctx.client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::OK);

    assert_eq!(response.field("status"), "ready");
    assert_eq!(response.field("database"), "in_memory");

    let queue = response.field("queue");
    assert_eq!(queue["pending"], 0);
    assert_eq!(queue["in_flight"], 0);
    assert_eq!(queue["capacity"], 10);
    assert_eq!(queue["accepting"], true);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_pending_jobs_in_ready_status(ctx: &TestContext) {
    for text in ["First text.", "Second text."] {
        ctx.client
            .post("/api/jobs", &serde_json::json!({ "owner_id": 5, "text": text }))
            .await
            .unwrap()
            .assert_status(StatusCode::ACCEPTED);
    }

    let response = ctx.client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.field("queue")["pending"], 2);
}

#[tokio::test]
async fn it_should_not_be_ready_once_the_queue_is_closed() {
    let ctx = TestContext::start(TestOptions::default()).await;
    ctx.queue.close();

    let response = ctx.client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.field("status"), "not_ready");
    assert_eq!(response.field("queue")["accepting"], false);

    ctx.shutdown().await;
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_include_request_id_in_health_responses(ctx: &TestContext) {
    let response = ctx.client.get("/health").await.unwrap();

    let request_id = response.header("x-request-id").expect("x-request-id header");
    assert!(uuid::Uuid::parse_str(request_id).is_ok());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_echo_incoming_request_id(ctx: &TestContext) {
    let response = ctx
        .client
        .get_with_headers("/health", &[("x-request-id", "trace-me-123")])
        .await
        .unwrap();

    assert_eq!(
        response.header("x-request-id").map(String::as_str),
        Some("trace-me-123")
    );
}
