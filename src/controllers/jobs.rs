use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    domain::job::{JobId, JobSummary, OwnerId, SourceKind},
    domain::submission::{SubmissionReceipt, SubmissionService},
    error::AppResult,
};

/// Request for POST /api/jobs
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitJobRequest {
    pub owner_id: OwnerId,
    pub text: String,
    #[serde(default)]
    pub source_kind: SourceKind,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobPositionResponse {
    pub job_id: JobId,
    /// 0 when the job is not waiting
    pub position: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CancelJobResponse {
    pub cancelled: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OwnerJobsResponse {
    pub owner_id: OwnerId,
    pub jobs: Vec<JobSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CancelOwnerJobsResponse {
    pub cancelled: usize,
}

pub struct JobsController {
    submission_service: Arc<SubmissionService>,
}

impl JobsController {
    pub fn new(submission_service: Arc<SubmissionService>) -> Self {
        Self { submission_service }
    }

    /// POST /api/jobs - Queue text for conversion
    pub async fn submit(
        State(controller): State<Arc<JobsController>>,
        Json(request): Json<SubmitJobRequest>,
    ) -> AppResult<(StatusCode, Json<SubmissionReceipt>)> {
        let receipt = controller
            .submission_service
            .submit(request.owner_id, request.text, request.source_kind)?;

        Ok((StatusCode::ACCEPTED, Json(receipt)))
    }

    /// GET /api/jobs/{jobId} - Queue position of a job
    pub async fn position(
        State(controller): State<Arc<JobsController>>,
        Path(job_id): Path<JobId>,
    ) -> Json<JobPositionResponse> {
        let position = controller.submission_service.position(job_id);
        Json(JobPositionResponse { job_id, position })
    }

    /// DELETE /api/jobs/{jobId} - Cancel a job that has not started
    pub async fn cancel(
        State(controller): State<Arc<JobsController>>,
        Path(job_id): Path<JobId>,
    ) -> Json<CancelJobResponse> {
        let cancelled = controller.submission_service.cancel(job_id);
        Json(CancelJobResponse { cancelled })
    }

    /// GET /api/owners/{ownerId}/jobs - Queued and running jobs of an owner
    pub async fn list_for_owner(
        State(controller): State<Arc<JobsController>>,
        Path(owner_id): Path<OwnerId>,
    ) -> Json<OwnerJobsResponse> {
        let jobs = controller.submission_service.pending_for_owner(owner_id);
        Json(OwnerJobsResponse { owner_id, jobs })
    }

    /// DELETE /api/owners/{ownerId}/jobs - Cancel every queued job of an owner
    pub async fn cancel_for_owner(
        State(controller): State<Arc<JobsController>>,
        Path(owner_id): Path<OwnerId>,
    ) -> Json<CancelOwnerJobsResponse> {
        let cancelled = controller.submission_service.cancel_all_for_owner(owner_id);
        Json(CancelOwnerJobsResponse { cancelled })
    }
}
