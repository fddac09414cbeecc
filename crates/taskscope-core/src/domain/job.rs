//! Job record and the enriched detail view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::codec::{base64_bytes, base64_opt_bytes};
use super::ids::JobId;
use super::state::JobStatus;

/// Job message as stored by the task-queue engine.
///
/// Owned by the engine; this crate never writes one back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: JobId,
    pub task: String,

    #[serde(with = "base64_bytes", default)]
    pub payload: Vec<u8>,

    pub status: JobStatus,

    #[serde(default)]
    pub queue: String,

    #[serde(default)]
    pub max_retry: u32,

    #[serde(default)]
    pub retried: u32,

    /// Last error message (if any).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,

    /// Jobs enqueued by the engine once this one succeeds.
    #[serde(default)]
    pub on_success_ids: Vec<JobId>,

    /// Result handed down from the previous job of a chain.
    #[serde(
        with = "base64_opt_bytes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub prev_job_result: Option<Vec<u8>>,
}

impl JobRecord {
    pub fn new(id: impl Into<JobId>, task: impl Into<String>, queue: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            task: task.into(),
            payload: Vec::new(),
            status: JobStatus::Queued,
            queue: queue.into(),
            max_retry: 0,
            retried: 0,
            prev_error: None,
            processed_at: None,
            on_success_ids: Vec::new(),
            prev_job_result: None,
        }
    }

    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = payload.into();
        self
    }
}

/// Job record plus the saved result bytes, when the result store still has them.
///
/// The result is attached per request and never written anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDetail {
    #[serde(flatten)]
    pub job: JobRecord,

    #[serde(
        with = "base64_opt_bytes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub result_data: Option<Vec<u8>>,
}

impl JobDetail {
    pub fn new(job: JobRecord, result_data: Option<Vec<u8>>) -> Self {
        Self { job, result_data }
    }
}
