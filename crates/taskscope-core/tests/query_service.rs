//! End-to-end checks of QueryService over the in-memory backend, plus a
//! failure-injecting wrapper for the dashboard's partial-failure rules.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rstest::rstest;
use taskscope_core::config::QueryConfig;
use taskscope_core::domain::{
    ChainId, ChainRecord, ErrorKind, GroupId, GroupRecord, JobId, JobRecord,
    JobStatus, ScopeError, SearchResult, TerminalStatus, DEFAULT_QUEUE,
};
use taskscope_core::impls::InMemoryBackend;
use taskscope_core::{Backend, CallContext, QueryService};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Op {
    ListSuccess,
    ListFailed,
    CountPending,
    RegisteredTasks,
    FetchJob,
    Slow,
}

/// Wraps the in-memory backend and fails the selected operations.
struct FlakyBackend {
    inner: InMemoryBackend,
    failing: HashSet<Op>,
}

impl FlakyBackend {
    fn new(inner: InMemoryBackend, failing: &[Op]) -> Self {
        Self {
            inner,
            failing: failing.iter().copied().collect(),
        }
    }

    fn check(&self, op: Op) -> Result<(), ScopeError> {
        if self.failing.contains(&op) {
            return Err(ScopeError::BackendUnavailable(format!("{op:?} injected failure")));
        }
        Ok(())
    }
}

#[async_trait]
impl Backend for FlakyBackend {
    fn name(&self) -> &'static str {
        "flaky"
    }

    async fn fetch_job(&self, id: &JobId) -> Result<JobRecord, ScopeError> {
        if self.failing.contains(&Op::Slow) {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
        self.check(Op::FetchJob)?;
        self.inner.fetch_job(id).await
    }

    async fn fetch_chain(&self, id: &ChainId) -> Result<ChainRecord, ScopeError> {
        self.inner.fetch_chain(id).await
    }

    async fn fetch_group(&self, id: &GroupId) -> Result<GroupRecord, ScopeError> {
        self.inner.fetch_group(id).await
    }

    async fn fetch_result(&self, id: &JobId) -> Result<Vec<u8>, ScopeError> {
        self.inner.fetch_result(id).await
    }

    async fn list_by_status(&self, status: TerminalStatus) -> Result<Vec<JobId>, ScopeError> {
        match status {
            TerminalStatus::Success => self.check(Op::ListSuccess)?,
            TerminalStatus::Failed => self.check(Op::ListFailed)?,
        }
        self.inner.list_by_status(status).await
    }

    async fn count_pending(&self, queue: &str) -> Result<u64, ScopeError> {
        self.check(Op::CountPending)?;
        self.inner.count_pending(queue).await
    }

    async fn list_pending(
        &self,
        queue: &str,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<JobRecord>, u64), ScopeError> {
        self.inner.list_pending(queue, offset, limit).await
    }

    async fn delete_job(&self, id: &JobId) -> Result<(), ScopeError> {
        self.inner.delete_job(id).await
    }

    async fn list_registered_tasks(&self) -> Result<Vec<String>, ScopeError> {
        self.check(Op::RegisteredTasks)?;
        self.inner.list_registered_tasks().await
    }
}

/// j1 success, j2 failed, j3 queued on the default queue.
async fn scenario() -> InMemoryBackend {
    let backend = InMemoryBackend::new();
    backend
        .insert_job(JobRecord::new("j1", "add", DEFAULT_QUEUE).with_status(JobStatus::Success))
        .await;
    backend
        .insert_job(JobRecord::new("j2", "add", DEFAULT_QUEUE).with_status(JobStatus::Failed))
        .await;
    backend
        .insert_job(JobRecord::new("j3", "add", DEFAULT_QUEUE))
        .await;
    backend.register_task("add").await;
    backend
}

fn query_service(backend: impl Backend + 'static) -> QueryService {
    QueryService::new(Arc::new(backend), QueryConfig::default())
}

#[tokio::test]
async fn dashboard_end_to_end() {
    let service = query_service(scenario().await);
    let ctx = CallContext::background();

    let stats = service.dashboard_stats(&ctx).await.unwrap();
    assert_eq!(stats.total_success, 1);
    assert_eq!(stats.total_failed, 1);
    assert_eq!(stats.total_pending, 1);
    assert_eq!(stats.queue_stats.len(), 1);
    assert_eq!(stats.queue_stats.get(DEFAULT_QUEUE), Some(&1));
    assert_eq!(stats.registered_tasks, vec!["add"]);

    assert_eq!(
        service.jobs_by_status(&ctx, "success").await.unwrap(),
        vec![JobId::new("j1")]
    );
    assert_eq!(
        service.jobs_by_status(&ctx, "failed").await.unwrap(),
        vec![JobId::new("j2")]
    );
    assert_eq!(service.pending_count(&ctx, DEFAULT_QUEUE).await.unwrap(), 1);
}

#[tokio::test]
async fn repeated_and_blank_watch_entries_count_default_queue_once() {
    let config = QueryConfig {
        watched_queues: vec![DEFAULT_QUEUE.to_string(), DEFAULT_QUEUE.to_string(), String::new()],
        ..QueryConfig::default()
    };
    let service = QueryService::new(Arc::new(scenario().await), config);

    let stats = service
        .dashboard_stats(&CallContext::background())
        .await
        .unwrap();
    assert_eq!(stats.queue_stats.len(), 1);
    assert_eq!(stats.queue_stats.get(DEFAULT_QUEUE), Some(&1));
    assert_eq!(stats.total_pending, stats.queue_stats.values().sum::<u64>());
}

#[rstest]
#[case::success_list(Op::ListSuccess)]
#[case::failed_list(Op::ListFailed)]
#[case::registered_tasks(Op::RegisteredTasks)]
#[tokio::test]
async fn essential_dashboard_reads_are_fatal(#[case] op: Op) {
    let service = query_service(FlakyBackend::new(scenario().await, &[op]));

    let err = service
        .dashboard_stats(&CallContext::background())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unavailable);
}

#[tokio::test]
async fn pending_count_failure_is_absorbed() {
    let service = query_service(FlakyBackend::new(scenario().await, &[Op::CountPending]));

    let stats = service
        .dashboard_stats(&CallContext::background())
        .await
        .unwrap();
    assert_eq!(stats.total_success, 1);
    assert_eq!(stats.total_failed, 1);
    assert_eq!(stats.total_pending, 0);
    assert!(stats.queue_stats.is_empty());
}

#[tokio::test]
async fn pending_total_matches_full_listing() {
    let backend = InMemoryBackend::new();
    for i in 0..57 {
        backend
            .insert_job(JobRecord::new(format!("p{i}"), "add", "mail"))
            .await;
    }
    let service = query_service(backend);
    let ctx = CallContext::background();

    let first = service.pending_page(&ctx, "mail", 0, 0).await.unwrap();
    assert_eq!(first.limit, 20);
    assert_eq!(first.offset, 0);

    let all = service
        .pending_page(&ctx, "mail", 0, first.total as i64)
        .await
        .unwrap();
    assert_eq!(all.jobs.len() as u64, all.total);
    assert_eq!(service.pending_jobs(&ctx, "mail").await.unwrap().len(), 57);

    let past_end = service.pending_page(&ctx, "mail", 500, 10).await.unwrap();
    assert!(past_end.jobs.is_empty());
    assert_eq!(past_end.total, 57);

    let negative = service.pending_page(&ctx, "mail", -3, 5).await.unwrap();
    assert_eq!(negative.offset, 0);
    assert_eq!(negative.jobs[0].id.as_str(), "p0");
}

#[tokio::test]
async fn empty_queue_name_reads_default_queue() {
    let service = query_service(scenario().await);
    let ctx = CallContext::background();

    let page = service.pending_page(&ctx, "", 0, 10).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.jobs[0].id.as_str(), "j3");
}

#[tokio::test]
async fn delete_removes_job_and_second_delete_is_not_found() {
    let backend = scenario().await;
    backend.set_result("j1", b"42".to_vec()).await;
    let service = query_service(backend);
    let ctx = CallContext::background();

    service.delete_job(&ctx, "j1").await.unwrap();
    let err = service.job(&ctx, "j1").await.unwrap_err();
    assert!(err.is_not_found());
    let err = service.delete_job(&ctx, "j1").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn chain_enrichment_skips_missing_member() {
    let backend = scenario().await;
    backend
        .insert_chain(ChainRecord::new(
            "c1",
            vec![JobId::new("j1"), JobId::new("missing")],
            "j2",
        ))
        .await;
    let service = query_service(backend);

    let detail = service
        .chain(&CallContext::background(), "c1")
        .await
        .unwrap();
    let ids: Vec<&str> = detail.jobs.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, vec!["j1", "j2"]);
}

#[tokio::test]
async fn unavailable_members_are_dropped_not_fatal() {
    let backend = scenario().await;
    backend
        .insert_group(GroupRecord::new("g1").with_member("j1", JobStatus::Success))
        .await;
    let service = query_service(FlakyBackend::new(backend, &[Op::FetchJob]));

    let detail = service
        .group(&CallContext::background(), "g1")
        .await
        .unwrap();
    assert!(detail.jobs.is_empty());
    assert_eq!(detail.group.job_status.len(), 1);
}

#[tokio::test]
async fn search_resolves_group_only_id() {
    let backend = scenario().await;
    backend
        .insert_group(
            GroupRecord::new("grp")
                .with_member("j1", JobStatus::Success)
                .with_member("j2", JobStatus::Failed),
        )
        .await;
    let service = query_service(backend);

    let result = service
        .search(&CallContext::background(), "grp")
        .await
        .unwrap();
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["type"], "group");
    assert!(value.get("job").is_none());
    assert!(value.get("chain").is_none());
    match result {
        SearchResult::Group { group } => assert_eq!(group.jobs.len(), 2),
        other => panic!("expected group, got {other:?}"),
    }
}

#[tokio::test]
async fn search_miss_reports_no_match() {
    let service = query_service(scenario().await);

    let result = service
        .search(&CallContext::background(), "nothing-here")
        .await
        .unwrap();
    assert!(!result.is_found());
    let err = result.found().unwrap_err();
    assert!(matches!(err, ScopeError::NoMatch { .. }));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn search_does_not_hide_backend_outage() {
    let service = query_service(FlakyBackend::new(scenario().await, &[Op::FetchJob]));

    let err = service
        .search(&CallContext::background(), "j1")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unavailable);
}

#[tokio::test(start_paused = true)]
async fn slow_backend_hits_call_deadline() {
    let service = query_service(FlakyBackend::new(scenario().await, &[Op::Slow]));
    let ctx = CallContext::with_timeout(Duration::from_millis(100));

    let err = service.job(&ctx, "j1").await.unwrap_err();
    assert!(matches!(err, ScopeError::DeadlineExceeded));
}

#[tokio::test]
async fn chain_and_group_listing() {
    let backend = scenario().await;
    backend
        .insert_chain(ChainRecord::new("c1", vec![], "j1"))
        .await;
    backend.insert_group(GroupRecord::new("g1")).await;
    let service = query_service(backend);
    let ctx = CallContext::background();

    assert_eq!(
        service.list_chains(&ctx).await.unwrap(),
        vec![ChainId::new("c1")]
    );
    assert_eq!(
        service.list_groups(&ctx).await.unwrap(),
        vec![GroupId::new("g1")]
    );

    // no list_chain_ids override: the trait default knows of no chains
    let flaky = query_service(FlakyBackend::new(scenario().await, &[]));
    assert!(!flaky.capabilities().enumerate_chains);
    assert!(flaky.list_chains(&ctx).await.unwrap().is_empty());
    assert!(flaky.list_groups(&ctx).await.unwrap().is_empty());
}
