//! In-memory backend.
//!
//! Stands in for the engine's in-memory broker + result store. Used for the
//! `in-memory` broker setting, the demo seed and the test suites.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChainId, ChainRecord, DEFAULT_QUEUE, EntityKind, GroupId, GroupRecord, JobId, JobRecord,
    JobStatus, ScopeError, TerminalStatus,
};
use crate::ports::{Backend, BackendCapabilities};

/// In-memory store state.
#[derive(Default)]
struct InMemoryState {
    /// Job messages (single source of truth for job metadata).
    jobs: HashMap<JobId, JobRecord>,

    /// Saved results.
    results: HashMap<JobId, Vec<u8>>,

    chains: BTreeMap<ChainId, ChainRecord>,
    groups: BTreeMap<GroupId, GroupRecord>,

    /// Broker queues: queue name -> copies of the enqueued messages, head first.
    pending: HashMap<String, VecDeque<JobRecord>>,

    /// Terminal id listings, in completion order.
    success: Vec<JobId>,
    failed: Vec<JobId>,

    tasks: Vec<String>,
}

impl InMemoryState {
    /// Store a job message and index it the way the engine would.
    fn record_job(&mut self, job: JobRecord) {
        match job.status.terminal() {
            Some(TerminalStatus::Success) => push_unique(&mut self.success, &job.id),
            Some(TerminalStatus::Failed) => push_unique(&mut self.failed, &job.id),
            None if job.status == JobStatus::Queued => {
                let queue = if job.queue.is_empty() {
                    DEFAULT_QUEUE.to_string()
                } else {
                    job.queue.clone()
                };
                self.pending.entry(queue).or_default().push_back(job.clone());
            }
            None => {}
        }
        self.jobs.insert(job.id.clone(), job);
    }

    fn listing(&self, status: TerminalStatus) -> &[JobId] {
        match status {
            TerminalStatus::Success => &self.success,
            TerminalStatus::Failed => &self.failed,
        }
    }
}

fn push_unique(list: &mut Vec<JobId>, id: &JobId) {
    if !list.contains(id) {
        list.push(id.clone());
    }
}

/// In-memory backend implementation.
///
/// Cheap to clone; clones share the same store.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a job. Terminal jobs land in the success/failed listing, queued
    /// jobs are also pushed onto their queue (the default queue when unset).
    pub async fn insert_job(&self, job: JobRecord) {
        self.state.lock().await.record_job(job);
    }

    pub async fn set_result(&self, id: impl Into<JobId>, result: impl Into<Vec<u8>>) {
        self.state
            .lock()
            .await
            .results
            .insert(id.into(), result.into());
    }

    pub async fn insert_chain(&self, chain: ChainRecord) {
        self.state
            .lock()
            .await
            .chains
            .insert(chain.id.clone(), chain);
    }

    pub async fn insert_group(&self, group: GroupRecord) {
        self.state
            .lock()
            .await
            .groups
            .insert(group.id.clone(), group);
    }

    pub async fn register_task(&self, name: impl Into<String>) {
        let name = name.into();
        let mut state = self.state.lock().await;
        if !state.tasks.contains(&name) {
            state.tasks.push(name);
        }
    }

    /// Pop the head of a queue, as a worker would. Returns the popped message.
    pub async fn take_pending(&self, queue: &str) -> Option<JobRecord> {
        let mut state = self.state.lock().await;
        state.pending.get_mut(queue).and_then(VecDeque::pop_front)
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    fn name(&self) -> &'static str {
        "in-memory"
    }

    fn capabilities(&self) -> BackendCapabilities {
        BackendCapabilities {
            enumerate_chains: true,
            enumerate_groups: true,
        }
    }

    async fn fetch_job(&self, id: &JobId) -> Result<JobRecord, ScopeError> {
        let state = self.state.lock().await;
        state
            .jobs
            .get(id)
            .cloned()
            .ok_or_else(|| ScopeError::not_found(EntityKind::Job, id.as_str()))
    }

    async fn fetch_chain(&self, id: &ChainId) -> Result<ChainRecord, ScopeError> {
        let state = self.state.lock().await;
        state
            .chains
            .get(id)
            .cloned()
            .ok_or_else(|| ScopeError::not_found(EntityKind::Chain, id.as_str()))
    }

    async fn fetch_group(&self, id: &GroupId) -> Result<GroupRecord, ScopeError> {
        let state = self.state.lock().await;
        state
            .groups
            .get(id)
            .cloned()
            .ok_or_else(|| ScopeError::not_found(EntityKind::Group, id.as_str()))
    }

    async fn fetch_result(&self, id: &JobId) -> Result<Vec<u8>, ScopeError> {
        let state = self.state.lock().await;
        state
            .results
            .get(id)
            .cloned()
            .ok_or_else(|| ScopeError::not_found(EntityKind::Job, id.as_str()))
    }

    async fn list_by_status(&self, status: TerminalStatus) -> Result<Vec<JobId>, ScopeError> {
        let state = self.state.lock().await;
        Ok(state.listing(status).to_vec())
    }

    async fn count_pending(&self, queue: &str) -> Result<u64, ScopeError> {
        let state = self.state.lock().await;
        Ok(state.pending.get(queue).map_or(0, |q| q.len() as u64))
    }

    async fn list_pending(
        &self,
        queue: &str,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<JobRecord>, u64), ScopeError> {
        let state = self.state.lock().await;
        let Some(entries) = state.pending.get(queue) else {
            return Ok((Vec::new(), 0));
        };
        let page = entries.iter().skip(offset).take(limit).cloned().collect();
        Ok((page, entries.len() as u64))
    }

    async fn delete_job(&self, id: &JobId) -> Result<(), ScopeError> {
        let mut state = self.state.lock().await;
        if state.jobs.remove(id).is_none() {
            return Err(ScopeError::not_found(EntityKind::Job, id.as_str()));
        }
        state.results.remove(id);
        Ok(())
    }

    async fn list_registered_tasks(&self) -> Result<Vec<String>, ScopeError> {
        let state = self.state.lock().await;
        Ok(state.tasks.clone())
    }

    async fn list_chain_ids(&self) -> Result<Vec<ChainId>, ScopeError> {
        let state = self.state.lock().await;
        Ok(state.chains.keys().cloned().collect())
    }

    async fn list_group_ids(&self) -> Result<Vec<GroupId>, ScopeError> {
        let state = self.state.lock().await;
        Ok(state.groups.keys().cloned().collect())
    }
}
