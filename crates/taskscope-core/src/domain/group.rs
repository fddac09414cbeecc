//! Group record: unordered member jobs with their last known status.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::ids::{GroupId, JobId};
use super::job::JobRecord;
use super::state::JobStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub id: GroupId,
    pub status: JobStatus,

    /// Member job id -> last known status. Keys are unique by construction;
    /// iteration order means nothing.
    #[serde(default)]
    pub job_status: HashMap<JobId, JobStatus>,
}

impl GroupRecord {
    pub fn new(id: impl Into<GroupId>) -> Self {
        Self {
            id: id.into(),
            status: JobStatus::Processing,
            job_status: HashMap::new(),
        }
    }

    pub fn with_member(mut self, job_id: impl Into<JobId>, status: JobStatus) -> Self {
        self.job_status.insert(job_id.into(), status);
        self
    }

    pub fn member_ids(&self) -> impl Iterator<Item = &JobId> {
        self.job_status.keys()
    }
}

/// Group record plus every member job that could still be loaded (unordered).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDetail {
    #[serde(flatten)]
    pub group: GroupRecord,
    pub jobs: Vec<JobRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_members_collapse() {
        let group = GroupRecord::new("g1")
            .with_member("a", JobStatus::Queued)
            .with_member("a", JobStatus::Success);
        assert_eq!(group.member_ids().count(), 1);
        assert_eq!(group.job_status[&JobId::new("a")], JobStatus::Success);
    }

    #[test]
    fn decodes_status_map() {
        let raw = r#"{"id":"g1","status":"processing","job_status":{"a":"queued","b":"failed"}}"#;
        let group: GroupRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(group.job_status.len(), 2);
        assert_eq!(group.job_status[&JobId::new("b")], JobStatus::Failed);
    }
}
