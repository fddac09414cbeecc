//! State - ジョブの状態
//!
//! The engine owns these transitions; we only read them back.
//! Known states:
//! - queued -> processing -> successful
//! - queued -> processing -> retrying -> queued (until max retries)
//! - queued -> processing -> failed
//!
//! Anything else the engine writes is kept verbatim in `Other`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::ScopeError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Queued,
    Processing,
    Success,
    Failed,
    Retrying,
    Other(String),
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Success => "successful",
            JobStatus::Failed => "failed",
            JobStatus::Retrying => "retrying",
            JobStatus::Other(raw) => raw,
        }
    }

    /// Is this a terminal state (no further transitions)?
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Success | JobStatus::Failed)
    }

    /// The terminal bucket this status is listed under, if any.
    pub fn terminal(&self) -> Option<TerminalStatus> {
        match self {
            JobStatus::Success => Some(TerminalStatus::Success),
            JobStatus::Failed => Some(TerminalStatus::Failed),
            _ => None,
        }
    }
}

impl From<String> for JobStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "queued" => JobStatus::Queued,
            "processing" => JobStatus::Processing,
            "successful" | "success" => JobStatus::Success,
            "failed" => JobStatus::Failed,
            "retrying" => JobStatus::Retrying,
            _ => JobStatus::Other(raw),
        }
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two statuses the store keeps id listings for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalStatus {
    Success,
    Failed,
}

impl TerminalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TerminalStatus::Success => "success",
            TerminalStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for TerminalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TerminalStatus {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "success" | "successful" => Ok(TerminalStatus::Success),
            "failed" => Ok(TerminalStatus::Failed),
            other => Err(ScopeError::invalid(format!(
                "unsupported status filter: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::success("success", TerminalStatus::Success)]
    #[case::successful("successful", TerminalStatus::Success)]
    #[case::failed("failed", TerminalStatus::Failed)]
    #[case::padded(" failed ", TerminalStatus::Failed)]
    fn terminal_status_parses(#[case] raw: &str, #[case] expected: TerminalStatus) {
        assert_eq!(raw.parse::<TerminalStatus>().unwrap(), expected);
    }

    #[rstest]
    #[case::queued("queued")]
    #[case::empty("")]
    #[case::retrying("retrying")]
    fn terminal_status_rejects_others(#[case] raw: &str) {
        let err = raw.parse::<TerminalStatus>().unwrap_err();
        assert!(matches!(err, ScopeError::InvalidArgument(_)));
    }

    #[test]
    fn unknown_job_status_survives_roundtrip() {
        let status: JobStatus = serde_json::from_str("\"paused\"").unwrap();
        assert_eq!(status, JobStatus::Other("paused".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"paused\"");
    }

    #[test]
    fn success_uses_engine_spelling() {
        assert_eq!(
            serde_json::to_string(&JobStatus::Success).unwrap(),
            "\"successful\""
        );
        assert!(JobStatus::Success.is_terminal());
        assert!(!JobStatus::Retrying.is_terminal());
        assert_eq!(JobStatus::Failed.terminal(), Some(TerminalStatus::Failed));
    }
}
