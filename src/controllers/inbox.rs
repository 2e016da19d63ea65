use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    domain::job::OwnerId,
    infrastructure::transport::{InboxEntry, OutboxTransport},
};

#[derive(Debug, Serialize)]
pub struct InboxResponse {
    pub owner_id: OwnerId,
    pub entries: Vec<InboxEntry>,
}

pub struct InboxController {
    outbox: Arc<OutboxTransport>,
}

impl InboxController {
    pub fn new(outbox: Arc<OutboxTransport>) -> Self {
        Self { outbox }
    }

    /// GET /api/owners/{ownerId}/inbox - Notifications and delivered audio
    pub async fn list(
        State(controller): State<Arc<InboxController>>,
        Path(owner_id): Path<OwnerId>,
    ) -> Json<InboxResponse> {
        let entries = controller.outbox.inbox(owner_id);
        Json(InboxResponse { owner_id, entries })
    }
}
