//! Redis backend.
//!
//! Reads the engine's broker lists and result keys over a shared
//! `ConnectionManager` (reconnects on its own, cheap to clone per call).
//!
//! # Key layout
//!
//! - `tq:job:msg:{id}`   job message (JSON)
//! - `tq:job:res:{id}`   saved result (raw bytes)
//! - `tq:chain:msg:{id}` chain message (JSON)
//! - `tq:group:msg:{id}` group message (JSON)
//! - `tq:jobs:success` / `tq:jobs:failed`  sorted sets of job ids, scored by completion time
//! - `tq:tasks`          set of registered task names
//! - `{queue}`           broker list of pending job messages (JSON), head at index 0

use std::collections::BTreeSet;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::{
    ChainId, ChainRecord, EntityKind, GroupId, GroupRecord, JobId, JobRecord, ScopeError,
    TerminalStatus,
};
use crate::ports::{Backend, BackendCapabilities};

/// Key prefix for everything the engine stores besides queue lists.
pub const KEY_PREFIX: &str = "tq:";

/// Keys requested per SCAN round trip.
const SCAN_BATCH: usize = 200;

pub mod keys {
    use super::KEY_PREFIX;

    pub const JOB_MSG: &str = "job:msg:";
    pub const JOB_RES: &str = "job:res:";
    pub const CHAIN_MSG: &str = "chain:msg:";
    pub const GROUP_MSG: &str = "group:msg:";

    pub fn job_msg(id: &str) -> String {
        format!("{KEY_PREFIX}{JOB_MSG}{id}")
    }

    pub fn job_result(id: &str) -> String {
        format!("{KEY_PREFIX}{JOB_RES}{id}")
    }

    pub fn chain_msg(id: &str) -> String {
        format!("{KEY_PREFIX}{CHAIN_MSG}{id}")
    }

    pub fn group_msg(id: &str) -> String {
        format!("{KEY_PREFIX}{GROUP_MSG}{id}")
    }

    pub fn status_set(status: crate::domain::TerminalStatus) -> String {
        format!("{KEY_PREFIX}jobs:{}", status.as_str())
    }

    pub fn tasks() -> String {
        format!("{KEY_PREFIX}tasks")
    }

    /// SCAN pattern matching every key under `prefix`.
    pub fn pattern(prefix: &str) -> String {
        format!("{KEY_PREFIX}{prefix}*")
    }

    /// Strip `tq:{prefix}` from a scanned key. `None` for keys outside the prefix.
    pub fn extract_id<'a>(key: &'a str, prefix: &str) -> Option<&'a str> {
        key.strip_prefix(KEY_PREFIX)?
            .strip_prefix(prefix)
            .filter(|id| !id.is_empty())
    }
}

/// Inclusive LRANGE bounds for an `(offset, limit)` window, `None` when the
/// window is empty.
pub fn lrange_bounds(offset: usize, limit: usize) -> Option<(i64, i64)> {
    if limit == 0 {
        return None;
    }
    let start = i64::try_from(offset).unwrap_or(i64::MAX);
    let len = i64::try_from(limit).unwrap_or(i64::MAX);
    Some((start, start.saturating_add(len - 1)))
}

fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T, ScopeError> {
    serde_json::from_str(raw).map_err(|e| ScopeError::Corrupt {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

pub struct RedisBackend {
    conn: ConnectionManager,
}

impl RedisBackend {
    /// Connect to Redis.
    ///
    /// # Arguments
    /// * `redis_url` - Redis connection URL (e.g., "redis://localhost:6379/0")
    pub async fn connect(redis_url: &str) -> Result<Self, ScopeError> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| ScopeError::BackendUnavailable(format!("Redis connection error: {e}")))?;

        let conn = ConnectionManager::new(client).await.map_err(|e| {
            ScopeError::BackendUnavailable(format!("Redis connection manager error: {e}"))
        })?;

        Ok(Self { conn })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        key: &str,
        kind: EntityKind,
        id: &str,
    ) -> Result<T, ScopeError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = redis::cmd("GET").arg(key).query_async(&mut conn).await?;
        match raw {
            Some(raw) => decode(key, &raw),
            None => Err(ScopeError::not_found(kind, id)),
        }
    }

    async fn scan_ids(&self, prefix: &str) -> Result<Vec<String>, ScopeError> {
        let mut conn = self.conn.clone();
        let pattern = keys::pattern(prefix);
        let mut cursor: u64 = 0;
        let mut ids = BTreeSet::new();
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;
            ids.extend(
                batch
                    .iter()
                    .filter_map(|key| keys::extract_id(key, prefix))
                    .map(str::to_string),
            );
            if next == 0 {
                break;
            }
            cursor = next;
        }
        debug!(pattern = %pattern, found = ids.len(), "scanned keys");
        Ok(ids.into_iter().collect())
    }
}

#[async_trait]
impl Backend for RedisBackend {
    fn name(&self) -> &'static str {
        "redis"
    }

    fn capabilities(&self) -> BackendCapabilities {
        BackendCapabilities {
            enumerate_chains: true,
            enumerate_groups: true,
        }
    }

    async fn fetch_job(&self, id: &JobId) -> Result<JobRecord, ScopeError> {
        self.get_json(&keys::job_msg(id.as_str()), EntityKind::Job, id.as_str())
            .await
    }

    async fn fetch_chain(&self, id: &ChainId) -> Result<ChainRecord, ScopeError> {
        self.get_json(&keys::chain_msg(id.as_str()), EntityKind::Chain, id.as_str())
            .await
    }

    async fn fetch_group(&self, id: &GroupId) -> Result<GroupRecord, ScopeError> {
        self.get_json(&keys::group_msg(id.as_str()), EntityKind::Group, id.as_str())
            .await
    }

    async fn fetch_result(&self, id: &JobId) -> Result<Vec<u8>, ScopeError> {
        let mut conn = self.conn.clone();
        let raw: Option<Vec<u8>> = redis::cmd("GET")
            .arg(keys::job_result(id.as_str()))
            .query_async(&mut conn)
            .await?;
        raw.ok_or_else(|| ScopeError::not_found(EntityKind::Job, id.as_str()))
    }

    async fn list_by_status(&self, status: TerminalStatus) -> Result<Vec<JobId>, ScopeError> {
        let mut conn = self.conn.clone();
        let ids: Vec<String> = redis::cmd("ZRANGE")
            .arg(keys::status_set(status))
            .arg(0)
            .arg(-1)
            .query_async(&mut conn)
            .await?;
        Ok(ids.into_iter().map(JobId::new).collect())
    }

    async fn count_pending(&self, queue: &str) -> Result<u64, ScopeError> {
        let mut conn = self.conn.clone();
        let count: u64 = redis::cmd("LLEN").arg(queue).query_async(&mut conn).await?;
        Ok(count)
    }

    async fn list_pending(
        &self,
        queue: &str,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<JobRecord>, u64), ScopeError> {
        let mut conn = self.conn.clone();
        let Some((start, stop)) = lrange_bounds(offset, limit) else {
            let total: u64 = redis::cmd("LLEN").arg(queue).query_async(&mut conn).await?;
            return Ok((Vec::new(), total));
        };

        // One MULTI so the page and its total come from the same instant.
        let (total, raw): (u64, Vec<String>) = redis::pipe()
            .atomic()
            .cmd("LLEN")
            .arg(queue)
            .cmd("LRANGE")
            .arg(queue)
            .arg(start)
            .arg(stop)
            .query_async(&mut conn)
            .await?;

        let jobs = raw
            .iter()
            .map(|entry| decode(queue, entry))
            .collect::<Result<Vec<JobRecord>, _>>()?;
        Ok((jobs, total))
    }

    async fn delete_job(&self, id: &JobId) -> Result<(), ScopeError> {
        let mut conn = self.conn.clone();
        let (removed_msg, _removed_res): (i64, i64) = redis::pipe()
            .atomic()
            .cmd("DEL")
            .arg(keys::job_msg(id.as_str()))
            .cmd("DEL")
            .arg(keys::job_result(id.as_str()))
            .query_async(&mut conn)
            .await?;
        if removed_msg == 0 {
            return Err(ScopeError::not_found(EntityKind::Job, id.as_str()));
        }
        Ok(())
    }

    async fn list_registered_tasks(&self) -> Result<Vec<String>, ScopeError> {
        let mut conn = self.conn.clone();
        let mut tasks: Vec<String> = redis::cmd("SMEMBERS")
            .arg(keys::tasks())
            .query_async(&mut conn)
            .await?;
        tasks.sort();
        Ok(tasks)
    }

    async fn list_chain_ids(&self) -> Result<Vec<ChainId>, ScopeError> {
        let ids = self.scan_ids(keys::CHAIN_MSG).await?;
        Ok(ids.into_iter().map(ChainId::new).collect())
    }

    async fn list_group_ids(&self) -> Result<Vec<GroupId>, ScopeError> {
        let ids = self.scan_ids(keys::GROUP_MSG).await?;
        Ok(ids.into_iter().map(GroupId::new).collect())
    }
}
