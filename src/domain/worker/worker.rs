use super::error::JobError;
use crate::domain::job::{Job, JobQueue, JobStatus};
use crate::domain::tts::{segment, AudioArtifact, EngineRegistry, SynthesisPreferences, DEFAULT_MAX_CHUNK_CHARS};
use crate::infrastructure::audio::{AudioFinalizer, FinalizeOptions};
use crate::infrastructure::repositories::ProfileRepository;
use crate::infrastructure::transport::Transport;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;

const JOB_TITLE_CHARS: usize = 40;

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Upper bound on an idle wait when no enqueue wakes the worker
    pub poll_interval: Duration,
    /// Pause after a fault that escaped job processing
    pub fault_backoff: Duration,
    pub max_chunk_chars: usize,
    /// Parent directory of per-job workspaces
    pub temp_dir: PathBuf,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(1000),
            fault_backoff: Duration::from_millis(5000),
            max_chunk_chars: DEFAULT_MAX_CHUNK_CHARS,
            temp_dir: PathBuf::from("./temp"),
        }
    }
}

/// Result of one pass of the worker loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Iteration {
    /// Nothing was queued
    Idle,
    /// A job ran to a terminal state
    Finished(JobStatus),
    /// Job processing crashed; the job was failed and the loop must back off
    Faulted,
}

/// Drains the job queue one job at a time.
///
/// Each claimed job goes through Convert (preferences, segmentation,
/// synthesis and finalization of every chunk) and then Deliver. Every
/// temporary file lives in a per-job workspace that is removed when the job
/// ends, whichever way it ends. A job is always marked terminal and removed
/// from the queue before the next one is claimed.
pub struct ConversionWorker {
    queue: Arc<JobQueue>,
    registry: Arc<EngineRegistry>,
    profiles: Arc<dyn ProfileRepository>,
    transport: Arc<dyn Transport>,
    finalizer: Arc<dyn AudioFinalizer>,
    config: WorkerConfig,
}

/// Handle to a running worker
pub struct WorkerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl WorkerHandle {
    /// Ask the worker to stop and wait for it. An in-flight job is allowed
    /// to finish first.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Worker task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl ConversionWorker {
    pub fn new(
        queue: Arc<JobQueue>,
        registry: Arc<EngineRegistry>,
        profiles: Arc<dyn ProfileRepository>,
        transport: Arc<dyn Transport>,
        finalizer: Arc<dyn AudioFinalizer>,
        config: WorkerConfig,
    ) -> Self {
        Self {
            queue,
            registry,
            profiles,
            transport,
            finalizer,
            config,
        }
    }

    /// Spawn the worker loop on the runtime
    pub fn start(self) -> WorkerHandle {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let worker = Arc::new(self);
        let task = tokio::spawn(async move { worker.run(shutdown_rx).await });
        WorkerHandle { shutdown, task }
    }

    async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            engines = ?self.registry.registered(),
            poll_interval_ms = self.config.poll_interval.as_millis(),
            "Worker started"
        );

        while !*shutdown.borrow() {
            match self.run_once().await {
                Iteration::Finished(_) => {}
                Iteration::Idle => {
                    tokio::select! {
                        _ = self.queue.wait_for_job(self.config.poll_interval) => {}
                        changed = shutdown.changed() => if changed.is_err() { break },
                    }
                }
                Iteration::Faulted => {
                    tokio::select! {
                        _ = tokio::time::sleep(self.config.fault_backoff) => {}
                        changed = shutdown.changed() => if changed.is_err() { break },
                    }
                }
            }
        }

        tracing::info!(pending = self.queue.pending_len(), "Worker stopped");
    }

    /// Claim the head of the queue and process it to completion
    pub async fn run_once(self: &Arc<Self>) -> Iteration {
        let Some(job) = self.queue.dequeue_head() else {
            return Iteration::Idle;
        };

        let job_id = job.id;
        let owner_id = job.owner_id;

        // A panic inside the job task unwinds only that task
        let worker = Arc::clone(self);
        let result = tokio::spawn(async move { worker.process_job(job).await }).await;

        match result {
            Ok(status) => {
                self.queue.finish(job_id, status);
                Iteration::Finished(status)
            }
            Err(e) => {
                tracing::error!(job_id = %job_id, owner_id, error = %e, "Job processing crashed");
                self.queue.finish(job_id, JobStatus::Failed);
                if let Err(e) = self
                    .transport
                    .notify(owner_id, "An internal error interrupted your conversion. Please try again.")
                    .await
                {
                    tracing::warn!(owner_id, error = %e, "Failed to notify owner");
                }
                Iteration::Faulted
            }
        }
    }

    async fn process_job(&self, job: Job) -> JobStatus {
        let start_time = Instant::now();
        tracing::info!(
            job_id = %job.id,
            owner_id = job.owner_id,
            source_kind = ?job.source_kind,
            text_length = job.char_count(),
            "Job started"
        );

        match self.convert_and_deliver(&job).await {
            Ok(parts) => {
                tracing::info!(
                    job_id = %job.id,
                    owner_id = job.owner_id,
                    parts,
                    latency_ms = start_time.elapsed().as_millis(),
                    "Job completed"
                );
                JobStatus::Done
            }
            Err(e) => {
                tracing::warn!(
                    job_id = %job.id,
                    owner_id = job.owner_id,
                    error = %e,
                    latency_ms = start_time.elapsed().as_millis(),
                    "Job failed"
                );
                if let Err(notify_error) = self.transport.notify(job.owner_id, &e.owner_message()).await {
                    tracing::warn!(owner_id = job.owner_id, error = %notify_error, "Failed to notify owner");
                }
                JobStatus::Failed
            }
        }
    }

    async fn convert_and_deliver(&self, job: &Job) -> Result<usize, JobError> {
        let preferences = self
            .profiles
            .get_preferences(job.owner_id)
            .await
            .map_err(JobError::PreferencesUnavailable)?;

        // Removed on drop, on every exit path
        let workspace = tempfile::Builder::new()
            .prefix(&format!("job-{}-", job.id))
            .tempdir_in(&self.config.temp_dir)?;

        let chunks = segment(&job.payload, self.config.max_chunk_chars);
        let total = chunks.len();
        tracing::debug!(job_id = %job.id, chunk_count = total, "Text segmented");

        let mut produced = Vec::with_capacity(total);
        for (index, chunk) in chunks.iter().enumerate() {
            let artifact = self
                .registry
                .synthesize(chunk, &preferences, workspace.path())
                .await
                .map_err(|source| JobError::SynthesisFailed {
                    part: index + 1,
                    total,
                    source,
                })?;

            let label = part_label(index, total);
            let title = label.clone().unwrap_or_else(|| job_title(&job.payload));
            let artifact = self.finalize(artifact, title, &preferences).await;

            tracing::debug!(job_id = %job.id, chunk_index = index, engine = %artifact.engine, "Chunk ready");
            produced.push((label, artifact));
        }

        let mut failed = 0;
        let mut last_reason = String::new();
        for (index, (label, artifact)) in produced.iter().enumerate() {
            if let Err(e) = self
                .transport
                .deliver_audio(job.owner_id, artifact, label.as_deref())
                .await
            {
                tracing::warn!(job_id = %job.id, chunk_index = index, error = %e, "Delivery failed");
                failed += 1;
                last_reason = e.to_string();
            }
        }

        if let Err(e) = workspace.close() {
            tracing::warn!(job_id = %job.id, error = %e, "Failed to remove job workspace");
        }

        if failed > 0 {
            return Err(JobError::DeliveryFailed {
                failed,
                total,
                reason: last_reason,
            });
        }
        Ok(total)
    }

    async fn finalize(
        &self,
        artifact: AudioArtifact,
        title: String,
        preferences: &SynthesisPreferences,
    ) -> AudioArtifact {
        let options = FinalizeOptions {
            title,
            output_format: preferences.output_format,
        };

        match self.finalizer.finalize(&artifact, &options).await {
            Ok(finalized) => finalized,
            Err(e) => {
                tracing::warn!(
                    file_name = %artifact.file_name(),
                    error = %e,
                    "Finalization failed, delivering unfinalized audio"
                );
                artifact
            }
        }
    }
}

/// "Part i of n" for multi-chunk jobs, nothing for single-chunk ones
fn part_label(index: usize, total: usize) -> Option<String> {
    (total > 1).then(|| format!("Part {} of {}", index + 1, total))
}

fn job_title(payload: &str) -> String {
    let title: String = payload.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = title.chars();
    let head: String = chars.by_ref().take(JOB_TITLE_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
