use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::domain::job::JobQueue;
use crate::infrastructure::db::{check_connection, DbPool};

pub struct HealthState {
    pub queue: Arc<JobQueue>,
    /// `None` when preferences are kept in memory
    pub pool: Option<Arc<DbPool>>,
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let database = match &state.pool {
        Some(pool) => match check_connection(pool).await {
            Ok(_) => "connected",
            Err(_) => "disconnected",
        },
        None => "in_memory",
    };
    let accepting = !state.queue.is_closed();
    let ready = accepting && database != "disconnected";

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if ready { "ready" } else { "not_ready" },
            "database": database,
            "queue": {
                "pending": state.queue.pending_len(),
                "in_flight": state.queue.in_flight_len(),
                "capacity": state.queue.capacity(),
                "accepting": accepting
            }
        })),
    )
}
