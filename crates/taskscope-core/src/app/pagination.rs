//! Paginator - pending キューのページング
//!
//! Windows over one queue's pending list. A blank queue name means the
//! configured default queue.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{JobRecord, PageRequest, PendingPage, ScopeError};
use crate::ports::{Backend, CallContext};

/// Trimmed queue name; blank means `default_queue`.
pub(crate) fn resolve_queue<'a>(queue: &'a str, default_queue: &'a str) -> &'a str {
    let queue = queue.trim();
    if queue.is_empty() { default_queue } else { queue }
}

#[derive(Clone)]
pub struct Paginator {
    backend: Arc<dyn Backend>,
    default_queue: String,
}

impl Paginator {
    pub fn new(backend: Arc<dyn Backend>, default_queue: impl Into<String>) -> Self {
        Self {
            backend,
            default_queue: default_queue.into(),
        }
    }

    /// Resolve a caller-supplied queue name.
    pub fn queue_or_default<'a>(&'a self, queue: &'a str) -> &'a str {
        resolve_queue(queue, &self.default_queue)
    }

    /// Raw `(offset, limit)` from a request; see [`PageRequest::normalize`].
    pub async fn page(
        &self,
        ctx: &CallContext,
        queue: &str,
        offset: i64,
        limit: i64,
    ) -> Result<PendingPage, ScopeError> {
        self.window(ctx, queue, PageRequest::normalize(offset, limit))
            .await
    }

    pub async fn window(
        &self,
        ctx: &CallContext,
        queue: &str,
        request: PageRequest,
    ) -> Result<PendingPage, ScopeError> {
        let queue = self.queue_or_default(queue);
        let (jobs, total) = ctx
            .run(self.backend.list_pending(queue, request.offset, request.limit))
            .await?;
        debug!(
            queue,
            offset = request.offset,
            limit = request.limit,
            returned = jobs.len(),
            total,
            "pending page"
        );
        Ok(PendingPage::new(jobs, total, request))
    }

    /// Every pending job in the queue, head first.
    pub async fn all(&self, ctx: &CallContext, queue: &str) -> Result<Vec<JobRecord>, ScopeError> {
        let page = self.window(ctx, queue, PageRequest::unbounded()).await?;
        Ok(page.jobs)
    }

    pub async fn count(&self, ctx: &CallContext, queue: &str) -> Result<u64, ScopeError> {
        let queue = self.queue_or_default(queue);
        ctx.run(self.backend.count_pending(queue)).await
    }
}
