use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of the chat/transport user who submitted a job
pub type OwnerId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for JobId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    #[default]
    RawText,
    ExtractedFile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Done,
    Canceled,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Canceled | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Done => "done",
            JobStatus::Canceled => "canceled",
            JobStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// One unit of text scheduled for synthesis and delivery
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub owner_id: OwnerId,
    pub payload: String,
    pub source_kind: SourceKind,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    /// Monotonic insertion rank; queue position is derived from it
    pub enqueued_rank: u64,
}

impl Job {
    pub fn char_count(&self) -> usize {
        self.payload.chars().count()
    }
}

/// Read-only view of a non-terminal job, without its payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    pub job_id: JobId,
    pub owner_id: OwnerId,
    pub status: JobStatus,
    pub source_kind: SourceKind,
    /// 1-indexed queue position, 0 once claimed by the worker
    pub position: usize,
    pub text_length: usize,
    pub created_at: DateTime<Utc>,
}
