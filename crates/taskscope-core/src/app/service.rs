//! QueryService - トランスポート向けの表面
//!
//! One method per operation the HTTP layer and CLI expose. Each validates its
//! input, then delegates to the repository, dashboard, paginator or resolver.
//! No state is kept between calls besides the shared backend handle.

use std::sync::Arc;

use tracing::{debug, instrument};

use super::dashboard::Dashboard;
use super::pagination::Paginator;
use super::repository::EntityRepository;
use super::search::Resolver;
use crate::config::QueryConfig;
use crate::domain::{
    ChainDetail, ChainId, DashboardStats, GroupDetail, GroupId, Id, IdMarker, JobDetail, JobId,
    JobRecord, PendingPage, ScopeError, SearchResult, TerminalStatus,
};
use crate::ports::{Backend, BackendCapabilities, CallContext};

#[derive(Clone)]
pub struct QueryService {
    backend: Arc<dyn Backend>,
    repository: EntityRepository,
    dashboard: Dashboard,
    paginator: Paginator,
    resolver: Resolver,
    config: QueryConfig,
}

impl QueryService {
    pub fn new(backend: Arc<dyn Backend>, config: QueryConfig) -> Self {
        let repository = EntityRepository::new(backend.clone());
        Self {
            dashboard: Dashboard::new(
                backend.clone(),
                &config.default_queue,
                &config.watched_queues,
            ),
            paginator: Paginator::new(backend.clone(), config.default_queue.clone()),
            resolver: Resolver::new(repository.clone()),
            repository,
            backend,
            config,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn capabilities(&self) -> BackendCapabilities {
        self.backend.capabilities()
    }

    /// Fresh per-request context carrying the configured call timeout.
    pub fn context(&self) -> CallContext {
        match self.config.call_timeout {
            Some(timeout) => CallContext::with_timeout(timeout),
            None => CallContext::background(),
        }
    }

    #[instrument(skip_all, fields(backend = self.backend_name()))]
    pub async fn dashboard_stats(&self, ctx: &CallContext) -> Result<DashboardStats, ScopeError> {
        self.dashboard.snapshot(ctx).await
    }

    #[instrument(skip_all, fields(job_id = id))]
    pub async fn job(&self, ctx: &CallContext, id: &str) -> Result<JobDetail, ScopeError> {
        let id: JobId = require_id(id)?;
        self.repository.job_detail(ctx, &id).await
    }

    #[instrument(skip_all, fields(chain_id = id))]
    pub async fn chain(&self, ctx: &CallContext, id: &str) -> Result<ChainDetail, ScopeError> {
        let id: ChainId = require_id(id)?;
        self.repository.chain_detail(ctx, &id).await
    }

    /// Every known chain id. Empty for backends that cannot enumerate.
    #[instrument(skip_all)]
    pub async fn list_chains(&self, ctx: &CallContext) -> Result<Vec<ChainId>, ScopeError> {
        if !self.capabilities().enumerate_chains {
            debug!(backend = self.backend_name(), "chain enumeration not supported");
        }
        ctx.run(self.backend.list_chain_ids()).await
    }

    #[instrument(skip_all, fields(group_id = id))]
    pub async fn group(&self, ctx: &CallContext, id: &str) -> Result<GroupDetail, ScopeError> {
        let id: GroupId = require_id(id)?;
        self.repository.group_detail(ctx, &id).await
    }

    /// Every known group id. Empty for backends that cannot enumerate.
    #[instrument(skip_all)]
    pub async fn list_groups(&self, ctx: &CallContext) -> Result<Vec<GroupId>, ScopeError> {
        if !self.capabilities().enumerate_groups {
            debug!(backend = self.backend_name(), "group enumeration not supported");
        }
        ctx.run(self.backend.list_group_ids()).await
    }

    /// Whole pending list of a queue, unpaginated.
    #[instrument(skip_all, fields(queue = queue))]
    pub async fn pending_jobs(
        &self,
        ctx: &CallContext,
        queue: &str,
    ) -> Result<Vec<JobRecord>, ScopeError> {
        self.paginator.all(ctx, queue).await
    }

    #[instrument(skip_all, fields(queue = queue, offset = offset, limit = limit))]
    pub async fn pending_page(
        &self,
        ctx: &CallContext,
        queue: &str,
        offset: i64,
        limit: i64,
    ) -> Result<PendingPage, ScopeError> {
        self.paginator.page(ctx, queue, offset, limit).await
    }

    #[instrument(skip_all, fields(queue = queue))]
    pub async fn pending_count(&self, ctx: &CallContext, queue: &str) -> Result<u64, ScopeError> {
        self.paginator.count(ctx, queue).await
    }

    /// Ids with terminal status `status` ("success", "successful" or "failed").
    #[instrument(skip_all, fields(status = status))]
    pub async fn jobs_by_status(
        &self,
        ctx: &CallContext,
        status: &str,
    ) -> Result<Vec<JobId>, ScopeError> {
        let status: TerminalStatus = status.parse()?;
        ctx.run(self.backend.list_by_status(status)).await
    }

    #[instrument(skip_all, fields(job_id = id))]
    pub async fn delete_job(&self, ctx: &CallContext, id: &str) -> Result<(), ScopeError> {
        let id: JobId = require_id(id)?;
        ctx.run(self.backend.delete_job(&id)).await?;
        debug!(job_id = %id, "job deleted");
        Ok(())
    }

    #[instrument(skip_all, fields(id = id))]
    pub async fn search(&self, ctx: &CallContext, id: &str) -> Result<SearchResult, ScopeError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ScopeError::invalid("search id cannot be empty"));
        }
        self.resolver.resolve(ctx, id).await
    }
}

fn require_id<T: IdMarker>(raw: &str) -> Result<Id<T>, ScopeError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ScopeError::invalid(format!("{} id cannot be empty", T::kind())));
    }
    Ok(Id::new(raw))
}
