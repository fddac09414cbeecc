//! EntityRepository - typed fetches with child data joined in.
//!
//! Partial views are normal here: a chain or group member that cannot be
//! loaded is dropped from `jobs`, and a missing result just leaves
//! `result_data` empty. Only cancellation of the request itself escapes.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::domain::{
    ChainDetail, ChainId, ChainRecord, ErrorKind, GroupDetail, GroupId, JobDetail, JobId,
    JobRecord, ScopeError,
};
use crate::ports::{Backend, CallContext};

#[derive(Clone)]
pub struct EntityRepository {
    backend: Arc<dyn Backend>,
}

impl EntityRepository {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub async fn job(&self, ctx: &CallContext, id: &JobId) -> Result<JobRecord, ScopeError> {
        ctx.run(self.backend.fetch_job(id)).await
    }

    /// Job record plus its saved result, if the result store still has one.
    pub async fn job_detail(&self, ctx: &CallContext, id: &JobId) -> Result<JobDetail, ScopeError> {
        let job = self.job(ctx, id).await?;

        let result_data = match ctx.run(self.backend.fetch_result(id)).await {
            Ok(bytes) => Some(bytes),
            Err(err) if err.kind() == ErrorKind::Cancelled => return Err(err),
            Err(err) => {
                debug!(job_id = %id, error = %err, "no result attached");
                None
            }
        };

        Ok(JobDetail::new(job, result_data))
    }

    /// Chain record plus its member jobs: prior jobs in order, then the terminal job.
    pub async fn chain_detail(
        &self,
        ctx: &CallContext,
        id: &ChainId,
    ) -> Result<ChainDetail, ScopeError> {
        let chain: ChainRecord = ctx.run(self.backend.fetch_chain(id)).await?;
        let jobs = self.load_members(ctx, chain.member_ids()).await?;
        Ok(ChainDetail { chain, jobs })
    }

    /// Group record plus its member jobs, in no particular order.
    pub async fn group_detail(
        &self,
        ctx: &CallContext,
        id: &GroupId,
    ) -> Result<GroupDetail, ScopeError> {
        let group = ctx.run(self.backend.fetch_group(id)).await?;
        let jobs = self.load_members(ctx, group.member_ids()).await?;
        Ok(GroupDetail { group, jobs })
    }

    /// Fetch every id, keep what loads, preserve input order.
    async fn load_members<'a>(
        &self,
        ctx: &CallContext,
        ids: impl Iterator<Item = &'a JobId>,
    ) -> Result<Vec<JobRecord>, ScopeError> {
        let fetches = ids.map(|id| async move { (id, self.job(ctx, id).await) });
        let mut jobs = Vec::new();
        for (id, outcome) in join_all(fetches).await {
            match outcome {
                Ok(job) => jobs.push(job),
                Err(err) if err.kind() == ErrorKind::Cancelled => return Err(err),
                Err(err) if err.is_not_found() => {
                    debug!(job_id = %id, "member job missing, dropped");
                }
                Err(err) => {
                    warn!(job_id = %id, error = %err, "member job unreadable, dropped");
                }
            }
        }
        Ok(jobs)
    }
}
