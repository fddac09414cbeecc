//! Backend port - キューと結果ストアの読み取り口
//!
//! One implementation per storage technology (in-memory map, Redis).
//! Everything above this trait (repository, dashboard, paging, search) is
//! written against `dyn Backend` only, so a new store needs no changes there.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    ChainId, ChainRecord, GroupId, GroupRecord, JobId, JobRecord, ScopeError, TerminalStatus,
};

/// Optional capabilities a backend may or may not offer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackendCapabilities {
    /// `list_chain_ids` returns every stored chain.
    pub enumerate_chains: bool,
    /// `list_group_ids` returns every stored group.
    pub enumerate_groups: bool,
}

/// Read side of the task-queue engine.
///
/// # 設計原則
/// - Reads only, except `delete_job`.
/// - Missing records are `ScopeError::NotFound`; transport trouble is
///   `ScopeError::BackendUnavailable`. The two are never conflated.
/// - `list_pending` with an offset past the end returns an empty page and the
///   real total, not an error.
/// - `delete_job` on an absent id is `NotFound`, not a silent success.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Short name for logs ("redis", "in-memory").
    fn name(&self) -> &'static str;

    fn capabilities(&self) -> BackendCapabilities {
        BackendCapabilities::default()
    }

    async fn fetch_job(&self, id: &JobId) -> Result<JobRecord, ScopeError>;

    async fn fetch_chain(&self, id: &ChainId) -> Result<ChainRecord, ScopeError>;

    async fn fetch_group(&self, id: &GroupId) -> Result<GroupRecord, ScopeError>;

    /// Saved result bytes of a job. `NotFound` when nothing was saved or it expired.
    async fn fetch_result(&self, id: &JobId) -> Result<Vec<u8>, ScopeError>;

    async fn list_by_status(&self, status: TerminalStatus) -> Result<Vec<JobId>, ScopeError>;

    async fn count_pending(&self, queue: &str) -> Result<u64, ScopeError>;

    /// Up to `limit` pending jobs starting at `offset`, plus the queue's total.
    async fn list_pending(
        &self,
        queue: &str,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<JobRecord>, u64), ScopeError>;

    async fn delete_job(&self, id: &JobId) -> Result<(), ScopeError>;

    async fn list_registered_tasks(&self) -> Result<Vec<String>, ScopeError>;

    /// Every stored chain id. Backends without a scan primitive keep the
    /// default, which knows of no chains.
    async fn list_chain_ids(&self) -> Result<Vec<ChainId>, ScopeError> {
        Ok(Vec::new())
    }

    /// Every stored group id. Same caveat as `list_chain_ids`.
    async fn list_group_ids(&self) -> Result<Vec<GroupId>, ScopeError> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl<B: Backend + ?Sized> Backend for Arc<B> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn capabilities(&self) -> BackendCapabilities {
        (**self).capabilities()
    }

    async fn fetch_job(&self, id: &JobId) -> Result<JobRecord, ScopeError> {
        (**self).fetch_job(id).await
    }

    async fn fetch_chain(&self, id: &ChainId) -> Result<ChainRecord, ScopeError> {
        (**self).fetch_chain(id).await
    }

    async fn fetch_group(&self, id: &GroupId) -> Result<GroupRecord, ScopeError> {
        (**self).fetch_group(id).await
    }

    async fn fetch_result(&self, id: &JobId) -> Result<Vec<u8>, ScopeError> {
        (**self).fetch_result(id).await
    }

    async fn list_by_status(&self, status: TerminalStatus) -> Result<Vec<JobId>, ScopeError> {
        (**self).list_by_status(status).await
    }

    async fn count_pending(&self, queue: &str) -> Result<u64, ScopeError> {
        (**self).count_pending(queue).await
    }

    async fn list_pending(
        &self,
        queue: &str,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<JobRecord>, u64), ScopeError> {
        (**self).list_pending(queue, offset, limit).await
    }

    async fn delete_job(&self, id: &JobId) -> Result<(), ScopeError> {
        (**self).delete_job(id).await
    }

    async fn list_registered_tasks(&self) -> Result<Vec<String>, ScopeError> {
        (**self).list_registered_tasks().await
    }

    async fn list_chain_ids(&self) -> Result<Vec<ChainId>, ScopeError> {
        (**self).list_chain_ids().await
    }

    async fn list_group_ids(&self) -> Result<Vec<GroupId>, ScopeError> {
        (**self).list_group_ids().await
    }
}
