//! Chain record: prior jobs that must finish before the terminal job runs.

use serde::{Deserialize, Serialize};

use super::ids::{ChainId, JobId};
use super::job::JobRecord;
use super::state::JobStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainRecord {
    pub id: ChainId,

    /// The chain's terminal job.
    pub job_id: JobId,

    #[serde(default)]
    pub prev_job_ids: Vec<JobId>,

    pub status: JobStatus,
}

impl ChainRecord {
    pub fn new(id: impl Into<ChainId>, prev_job_ids: Vec<JobId>, job_id: impl Into<JobId>) -> Self {
        Self {
            id: id.into(),
            job_id: job_id.into(),
            prev_job_ids,
            status: JobStatus::Processing,
        }
    }

    /// Prior jobs in order, then the terminal job. Blank ids are skipped.
    pub fn member_ids(&self) -> impl Iterator<Item = &JobId> {
        self.prev_job_ids
            .iter()
            .chain(std::iter::once(&self.job_id))
            .filter(|id| !id.is_empty())
    }
}

/// Chain record plus every member job that could still be loaded, in chain order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainDetail {
    #[serde(flatten)]
    pub chain: ChainRecord,
    pub jobs: Vec<JobRecord>,
}
