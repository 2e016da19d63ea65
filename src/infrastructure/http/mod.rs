pub mod request_id;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::controllers::{
    health::{self, HealthState},
    inbox::InboxController,
    jobs::JobsController,
    preferences::PreferencesController,
};
use crate::infrastructure::config::Config;

pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};

/// Build the application router from its controllers
pub fn create_router(
    health_state: Arc<HealthState>,
    jobs_controller: Arc<JobsController>,
    preferences_controller: Arc<PreferencesController>,
    inbox_controller: Arc<InboxController>,
) -> Router {
    let job_routes = Router::new()
        .route("/api/jobs", post(JobsController::submit))
        .route(
            "/api/jobs/:jobId",
            get(JobsController::position).delete(JobsController::cancel),
        )
        .route(
            "/api/owners/:ownerId/jobs",
            get(JobsController::list_for_owner).delete(JobsController::cancel_for_owner),
        )
        .with_state(jobs_controller);

    let preference_routes = Router::new()
        .route(
            "/api/owners/:ownerId/preferences",
            get(PreferencesController::get)
                .put(PreferencesController::update)
                .delete(PreferencesController::reset),
        )
        .with_state(preferences_controller);

    let inbox_routes = Router::new()
        .route("/api/owners/:ownerId/inbox", get(InboxController::list))
        .with_state(inbox_controller);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(health_state)
        .merge(job_routes)
        .merge(preference_routes)
        .merge(inbox_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_id_middleware)),
        )
}

/// Serve `app` until `shutdown` resolves, then finish in-flight requests
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
