use super::error::QueueError;
use super::model::{Job, JobId, JobStatus, JobSummary, OwnerId, SourceKind};
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::Notify;

/// Default bound on non-terminal jobs
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

#[derive(Default)]
struct QueueState {
    pending: VecDeque<Job>,
    processing: HashMap<JobId, Job>,
    next_rank: u64,
    closed: bool,
}

impl QueueState {
    fn non_terminal(&self) -> usize {
        self.pending.len() + self.processing.len()
    }

    fn position_of(&self, id: JobId) -> usize {
        self.pending
            .iter()
            .position(|job| job.id == id)
            .map(|index| index + 1)
            .unwrap_or(0)
    }
}

/// Bounded FIFO of pending jobs.
///
/// Every operation takes the single state lock for a short, non-blocking
/// critical section; nothing awaits while holding it. Enqueue wakes a waiting
/// worker through a [`Notify`] so idle workers need not poll.
pub struct JobQueue {
    state: Mutex<QueueState>,
    notify: Notify,
    capacity: usize,
}

impl JobQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            notify: Notify::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a new pending job and return its id.
    ///
    /// Fails without touching the queue when the number of non-terminal jobs
    /// (queued plus in flight) has reached the capacity, or once the queue is
    /// closed.
    pub fn enqueue(
        &self,
        owner_id: OwnerId,
        payload: impl Into<String>,
        source_kind: SourceKind,
    ) -> Result<JobId, QueueError> {
        let job_id = {
            let mut state = self.state.lock();
            if state.closed {
                return Err(QueueError::Closed);
            }
            if state.non_terminal() >= self.capacity {
                return Err(QueueError::CapacityExceeded {
                    capacity: self.capacity,
                });
            }

            let rank = state.next_rank;
            state.next_rank += 1;

            let job = Job {
                id: JobId::new(),
                owner_id,
                payload: payload.into(),
                source_kind,
                status: JobStatus::Pending,
                created_at: Utc::now(),
                enqueued_rank: rank,
            };
            let job_id = job.id;
            state.pending.push_back(job);
            job_id
        };

        tracing::info!(job_id = %job_id, owner_id, "Job enqueued");
        self.notify.notify_one();
        Ok(job_id)
    }

    /// 1-indexed position among queued jobs, or 0 when the job is not
    /// waiting (already claimed, finished, canceled or unknown).
    pub fn position_of(&self, id: JobId) -> usize {
        self.state.lock().position_of(id)
    }

    /// Remove a job that is still pending. Jobs already claimed by the worker
    /// are never interrupted, so canceling them returns `false`.
    pub fn cancel(&self, id: JobId) -> bool {
        let removed = {
            let mut state = self.state.lock();
            match state.pending.iter().position(|job| job.id == id) {
                Some(index) => state.pending.remove(index),
                None => None,
            }
        };

        match removed {
            Some(job) => {
                tracing::info!(job_id = %id, owner_id = job.owner_id, status = %JobStatus::Canceled, "Job canceled");
                true
            }
            None => false,
        }
    }

    /// Cancel every pending job of an owner, returning how many were removed
    pub fn cancel_all_for_owner(&self, owner_id: OwnerId) -> usize {
        let removed = {
            let mut state = self.state.lock();
            let before = state.pending.len();
            state.pending.retain(|job| job.owner_id != owner_id);
            before - state.pending.len()
        };

        if removed > 0 {
            tracing::info!(owner_id, count = removed, "Owner jobs canceled");
        }
        removed
    }

    /// Claim the oldest pending job.
    ///
    /// Removal from the pending set and the switch to `Processing` happen in
    /// one critical section, so a job is never seen as both.
    pub fn dequeue_head(&self) -> Option<Job> {
        let mut state = self.state.lock();
        let mut job = state.pending.pop_front()?;
        job.status = JobStatus::Processing;
        state.processing.insert(job.id, job.clone());
        Some(job)
    }

    /// Record that a claimed job reached a terminal state and drop it.
    /// Returns `false` if the job was not in flight.
    pub fn finish(&self, id: JobId, status: JobStatus) -> bool {
        debug_assert!(status.is_terminal());
        let removed = self.state.lock().processing.remove(&id);

        match removed {
            Some(job) => {
                tracing::info!(job_id = %id, owner_id = job.owner_id, status = %status, "Job finished");
                true
            }
            None => false,
        }
    }

    /// Non-terminal jobs of one owner: in-flight first, then queued in order
    pub fn jobs_for_owner(&self, owner_id: OwnerId) -> Vec<JobSummary> {
        let state = self.state.lock();

        let mut in_flight: Vec<&Job> = state
            .processing
            .values()
            .filter(|job| job.owner_id == owner_id)
            .collect();
        in_flight.sort_by_key(|job| job.enqueued_rank);

        let queued = state
            .pending
            .iter()
            .enumerate()
            .filter(|(_, job)| job.owner_id == owner_id)
            .map(|(index, job)| (index + 1, job));

        in_flight
            .into_iter()
            .map(|job| (0, job))
            .chain(queued)
            .map(|(position, job)| JobSummary {
                job_id: job.id,
                owner_id: job.owner_id,
                status: job.status,
                source_kind: job.source_kind,
                position,
                text_length: job.char_count(),
                created_at: job.created_at,
            })
            .collect()
    }

    pub fn pending_len(&self) -> usize {
        self.state.lock().pending.len()
    }

    pub fn in_flight_len(&self) -> usize {
        self.state.lock().processing.len()
    }

    /// Stop accepting submissions. Queued jobs can still be claimed.
    pub fn close(&self) {
        self.state.lock().closed = true;
        self.notify.notify_waiters();
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Wait until a job is enqueued or `timeout` elapses.
    /// Returns `true` if woken by an enqueue.
    pub async fn wait_for_job(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, self.notify.notified())
            .await
            .is_ok()
    }
}

impl Default for JobQueue {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}
