//! Search result: what an opaque id turned out to be.

use serde::{Deserialize, Serialize};

use super::chain::ChainDetail;
use super::errors::ScopeError;
use super::group::GroupDetail;
use super::ids::EntityKind;
use super::job::JobDetail;

/// Exactly one of job / chain / group, or nothing.
///
/// Serialized as `{"type": "job", "job": {...}}` and so on; the miss is
/// `{"type": "not_found", "id": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchResult {
    Job { job: JobDetail },
    Chain { chain: ChainDetail },
    Group { group: GroupDetail },
    NotFound { id: String },
}

impl SearchResult {
    pub fn kind(&self) -> Option<EntityKind> {
        match self {
            SearchResult::Job { .. } => Some(EntityKind::Job),
            SearchResult::Chain { .. } => Some(EntityKind::Chain),
            SearchResult::Group { .. } => Some(EntityKind::Group),
            SearchResult::NotFound { .. } => None,
        }
    }

    pub fn is_found(&self) -> bool {
        self.kind().is_some()
    }

    /// The error describing a miss, `None` when something matched.
    pub fn error(&self) -> Option<ScopeError> {
        match self {
            SearchResult::NotFound { id } => Some(ScopeError::NoMatch { id: id.clone() }),
            _ => None,
        }
    }

    /// Turn a miss into `ScopeError::NoMatch`.
    pub fn found(self) -> Result<Self, ScopeError> {
        match self.error() {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}
