//! Dashboard - 集計スナップショット
//!
//! Success count, failed count, pending count per watched queue and the
//! registered task names, read concurrently and folded into one
//! `DashboardStats`.
//!
//! # 失敗ポリシー
//! - success / failed listing: fatal, success checked first
//! - registered tasks: fatal
//! - per-queue pending count: logged and left out of `queue_stats`

use std::collections::BTreeSet;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use super::pagination::resolve_queue;
use crate::domain::{DashboardStats, ScopeError, TerminalStatus};
use crate::ports::{Backend, CallContext};

#[derive(Clone)]
pub struct Dashboard {
    backend: Arc<dyn Backend>,
    watched_queues: Vec<String>,
}

impl Dashboard {
    /// Watched names are trimmed, blanks become `default_queue`, and each
    /// queue is counted once.
    pub fn new<I, S>(backend: Arc<dyn Backend>, default_queue: &str, watched_queues: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let watched_queues: BTreeSet<String> = watched_queues
            .into_iter()
            .map(|queue| resolve_queue(queue.as_ref(), default_queue).to_string())
            .collect();
        Self {
            backend,
            watched_queues: watched_queues.into_iter().collect(),
        }
    }

    pub async fn snapshot(&self, ctx: &CallContext) -> Result<DashboardStats, ScopeError> {
        let backend = &self.backend;
        let counts = join_all(self.watched_queues.iter().map(|queue| async move {
            (queue, ctx.run(backend.count_pending(queue)).await)
        }));

        let (success, failed, tasks, counts) = tokio::join!(
            ctx.run(backend.list_by_status(TerminalStatus::Success)),
            ctx.run(backend.list_by_status(TerminalStatus::Failed)),
            ctx.run(backend.list_registered_tasks()),
            counts,
        );

        let success = success?;
        let failed = failed?;
        let registered_tasks = tasks?;

        let mut stats = DashboardStats {
            total_success: success.len() as u64,
            total_failed: failed.len() as u64,
            registered_tasks,
            ..DashboardStats::default()
        };

        for (queue, count) in counts {
            match count {
                Ok(pending) => stats.add_queue(queue.as_str(), pending),
                Err(err @ (ScopeError::Cancelled | ScopeError::DeadlineExceeded)) => {
                    return Err(err);
                }
                Err(err) => {
                    warn!(queue = %queue, error = %err, "pending count unavailable, queue omitted");
                }
            }
        }

        debug!(
            success = stats.total_success,
            failed = stats.total_failed,
            pending = stats.total_pending,
            "dashboard snapshot"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{JobRecord, JobStatus};
    use crate::impls::InMemoryBackend;

    async fn seeded() -> InMemoryBackend {
        let backend = InMemoryBackend::new();
        backend
            .insert_job(JobRecord::new("j1", "add", "q").with_status(JobStatus::Success))
            .await;
        backend
            .insert_job(JobRecord::new("j2", "add", "q").with_status(JobStatus::Failed))
            .await;
        backend.insert_job(JobRecord::new("j3", "add", "q")).await;
        backend.insert_job(JobRecord::new("j4", "mail", "mail")).await;
        backend.register_task("add").await;
        backend.register_task("mail").await;
        backend
    }

    #[tokio::test]
    async fn counts_every_watched_queue() {
        let backend = seeded().await;
        let dashboard = Dashboard::new(Arc::new(backend), "q", ["q", "mail"]);

        let stats = dashboard.snapshot(&CallContext::background()).await.unwrap();
        assert_eq!(stats.total_success, 1);
        assert_eq!(stats.total_failed, 1);
        assert_eq!(stats.total_pending, 2);
        assert_eq!(stats.queue_stats.get("q"), Some(&1));
        assert_eq!(stats.queue_stats.get("mail"), Some(&1));
        assert_eq!(stats.registered_tasks, vec!["add", "mail"]);
    }

    #[tokio::test]
    async fn unwatched_queue_is_not_reported() {
        let backend = seeded().await;
        let dashboard = Dashboard::new(Arc::new(backend), "q", ["q"]);

        let stats = dashboard.snapshot(&CallContext::background()).await.unwrap();
        assert_eq!(stats.total_pending, 1);
        assert!(!stats.queue_stats.contains_key("mail"));
    }

    #[tokio::test]
    async fn empty_queue_reports_zero() {
        let dashboard = Dashboard::new(Arc::new(InMemoryBackend::new()), "q", ["idle"]);

        let stats = dashboard.snapshot(&CallContext::background()).await.unwrap();
        assert_eq!(stats.queue_stats.get("idle"), Some(&0));
        assert_eq!(stats.total_pending, 0);
    }

    #[tokio::test]
    async fn watched_names_are_normalized_and_counted_once() {
        let dashboard = Dashboard::new(
            Arc::new(seeded().await),
            "q",
            ["q", " q ", "", "mail", "q"],
        );

        let stats = dashboard.snapshot(&CallContext::background()).await.unwrap();
        assert_eq!(stats.queue_stats.len(), 2);
        assert!(!stats.queue_stats.contains_key(""));
        assert_eq!(stats.queue_stats.get("q"), Some(&1));
        assert_eq!(stats.total_pending, stats.queue_stats.values().sum::<u64>());
        assert_eq!(stats.total_pending, 2);
    }

    #[tokio::test]
    async fn cancelled_context_fails() {
        let dashboard = Dashboard::new(Arc::new(seeded().await), "q", ["q"]);
        let ctx = CallContext::background();
        ctx.cancel();

        let err = dashboard.snapshot(&ctx).await.unwrap_err();
        assert!(matches!(err, ScopeError::Cancelled));
    }
}
