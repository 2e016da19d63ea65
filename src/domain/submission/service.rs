use super::error::SubmissionError;
use crate::domain::job::{JobId, JobQueue, JobSummary, OwnerId, SourceKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_MAX_SUBMISSION_CHARS: usize = 100_000;
pub const DEFAULT_CHARS_PER_MINUTE: usize = 1000;

#[derive(Debug, Clone, Copy)]
pub struct SubmissionLimits {
    pub max_submission_chars: usize,
    /// Processing throughput used for the time estimate
    pub chars_per_minute: usize,
}

impl Default for SubmissionLimits {
    fn default() -> Self {
        Self {
            max_submission_chars: DEFAULT_MAX_SUBMISSION_CHARS,
            chars_per_minute: DEFAULT_CHARS_PER_MINUTE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub job_id: JobId,
    pub position: usize,
    pub estimated_minutes: usize,
}

/// Entry point used by transports to queue text and follow its progress
pub struct SubmissionService {
    queue: Arc<JobQueue>,
    limits: SubmissionLimits,
}

impl SubmissionService {
    pub fn new(queue: Arc<JobQueue>, limits: SubmissionLimits) -> Self {
        Self { queue, limits }
    }

    pub fn submit(
        &self,
        owner_id: OwnerId,
        text: String,
        source_kind: SourceKind,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        if text.trim().is_empty() {
            return Err(SubmissionError::Empty);
        }

        let length = text.chars().count();
        if length > self.limits.max_submission_chars {
            return Err(SubmissionError::TooLong {
                length,
                max: self.limits.max_submission_chars,
            });
        }

        let job_id = self.queue.enqueue(owner_id, text, source_kind).map_err(|e| {
            tracing::warn!(owner_id, error = %e, "Submission rejected");
            e
        })?;

        Ok(SubmissionReceipt {
            job_id,
            position: self.queue.position_of(job_id),
            estimated_minutes: length / self.limits.chars_per_minute.max(1),
        })
    }

    /// 1-indexed queue position, 0 when the job is not waiting
    pub fn position(&self, job_id: JobId) -> usize {
        self.queue.position_of(job_id)
    }

    pub fn cancel(&self, job_id: JobId) -> bool {
        self.queue.cancel(job_id)
    }

    pub fn pending_for_owner(&self, owner_id: OwnerId) -> Vec<JobSummary> {
        self.queue.jobs_for_owner(owner_id)
    }

    pub fn cancel_all_for_owner(&self, owner_id: OwnerId) -> usize {
        self.queue.cancel_all_for_owner(owner_id)
    }

    pub fn queue(&self) -> &JobQueue {
        &self.queue
    }
}
