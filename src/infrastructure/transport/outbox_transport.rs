use super::transport::{Transport, TransportError};
use crate::domain::job::OwnerId;
use crate::domain::tts::{AudioArtifact, AudioFormat, EngineKind};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InboxEntry {
    Message {
        text: String,
        at: DateTime<Utc>,
    },
    Audio {
        file_name: String,
        path: String,
        size_bytes: u64,
        format: AudioFormat,
        engine: EngineKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        at: DateTime<Utc>,
    },
}

/// Entries kept per owner; older ones are dropped from the inbox (delivered
/// files stay on disk)
pub const DEFAULT_INBOX_LIMIT: usize = 200;

/// Transport that files everything per owner: messages go to an in-memory
/// inbox, audio is copied under `<outbox_dir>/<owner_id>/`.
pub struct OutboxTransport {
    outbox_dir: PathBuf,
    inbox_limit: usize,
    inboxes: RwLock<HashMap<OwnerId, VecDeque<InboxEntry>>>,
}

impl OutboxTransport {
    pub fn new(outbox_dir: impl Into<PathBuf>) -> Self {
        Self {
            outbox_dir: outbox_dir.into(),
            inbox_limit: DEFAULT_INBOX_LIMIT,
            inboxes: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_inbox_limit(mut self, limit: usize) -> Self {
        self.inbox_limit = limit.max(1);
        self
    }

    /// Everything sent to an owner, oldest first
    pub fn inbox(&self, owner_id: OwnerId) -> Vec<InboxEntry> {
        self.inboxes
            .read()
            .get(&owner_id)
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn record(&self, owner_id: OwnerId, entry: InboxEntry) {
        let mut inboxes = self.inboxes.write();
        let entries = inboxes.entry(owner_id).or_default();
        entries.push_back(entry);
        while entries.len() > self.inbox_limit {
            entries.pop_front();
        }
    }
}

#[async_trait]
impl Transport for OutboxTransport {
    async fn notify(&self, owner_id: OwnerId, message: &str) -> Result<(), TransportError> {
        tracing::debug!(owner_id, message, "Notification sent");
        self.record(
            owner_id,
            InboxEntry::Message {
                text: message.to_string(),
                at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn deliver_audio(
        &self,
        owner_id: OwnerId,
        artifact: &AudioArtifact,
        label: Option<&str>,
    ) -> Result<(), TransportError> {
        let owner_dir = self.outbox_dir.join(owner_id.to_string());
        tokio::fs::create_dir_all(&owner_dir).await?;

        let file_name = artifact.file_name();
        if file_name.is_empty() {
            return Err(TransportError::Rejected(format!(
                "artifact has no file name: {}",
                artifact.path.display()
            )));
        }

        let destination = owner_dir.join(&file_name);
        let size_bytes = tokio::fs::copy(&artifact.path, &destination).await?;

        tracing::info!(
            owner_id,
            file_name = %file_name,
            size_bytes,
            label = label.unwrap_or(""),
            "Audio delivered"
        );

        self.record(
            owner_id,
            InboxEntry::Audio {
                file_name,
                path: destination.display().to_string(),
                size_bytes,
                format: artifact.format,
                engine: artifact.engine,
                label: label.map(str::to_string),
                at: Utc::now(),
            },
        );
        Ok(())
    }
}
