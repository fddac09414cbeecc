//! Resolver - 種別不明な ID の解決
//!
//! Probes job, then chain, then group. The first hit wins. A probe that comes
//! back `NotFound` moves on; anything else (store down, deadline) ends the
//! search with that error.

use tracing::debug;

use super::repository::EntityRepository;
use crate::domain::{ChainId, GroupId, Id, JobId, ScopeError, SearchResult};
use crate::ports::CallContext;

#[derive(Clone)]
pub struct Resolver {
    repository: EntityRepository,
}

impl Resolver {
    pub fn new(repository: EntityRepository) -> Self {
        Self { repository }
    }

    pub async fn resolve(&self, ctx: &CallContext, id: &str) -> Result<SearchResult, ScopeError> {
        let job_id: JobId = Id::new(id);
        if let Some(job) = hit(self.repository.job_detail(ctx, &job_id).await)? {
            return Ok(SearchResult::Job { job });
        }

        let chain_id: ChainId = job_id.cast();
        if let Some(chain) = hit(self.repository.chain_detail(ctx, &chain_id).await)? {
            return Ok(SearchResult::Chain { chain });
        }

        let group_id: GroupId = job_id.cast();
        if let Some(group) = hit(self.repository.group_detail(ctx, &group_id).await)? {
            return Ok(SearchResult::Group { group });
        }

        debug!(id, "search found nothing");
        Ok(SearchResult::NotFound { id: id.to_string() })
    }
}

fn hit<T>(probe: Result<T, ScopeError>) -> Result<Option<T>, ScopeError> {
    match probe {
        Ok(found) => Ok(Some(found)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}
