//! Paging over a queue's pending entries.

use serde::{Deserialize, Serialize};

use super::job::JobRecord;

/// Limit used when the caller asks for `limit <= 0`.
pub const DEFAULT_PAGE_LIMIT: usize = 20;

/// A normalized `(offset, limit)` window.
///
/// No upper bound on `limit`: a huge limit reads the whole queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
}

impl PageRequest {
    /// `limit <= 0` becomes [`DEFAULT_PAGE_LIMIT`], `offset < 0` becomes 0.
    pub fn normalize(offset: i64, limit: i64) -> Self {
        let offset = usize::try_from(offset.max(0)).unwrap_or(usize::MAX);
        let limit = if limit <= 0 {
            DEFAULT_PAGE_LIMIT
        } else {
            usize::try_from(limit).unwrap_or(usize::MAX)
        };
        Self { offset, limit }
    }

    /// Everything from the head of the queue.
    pub fn unbounded() -> Self {
        Self {
            offset: 0,
            limit: usize::MAX,
        }
    }

    /// Number of entries this window yields out of `total`.
    pub fn expected_len(&self, total: u64) -> usize {
        let total = usize::try_from(total).unwrap_or(usize::MAX);
        total.saturating_sub(self.offset).min(self.limit)
    }

    /// The window right after this one.
    pub fn next(&self) -> Self {
        Self {
            offset: self.offset.saturating_add(self.limit),
            limit: self.limit,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// One page of pending jobs plus the totals needed to ask for the next one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingPage {
    pub jobs: Vec<JobRecord>,
    pub total: u64,
    pub offset: usize,
    pub limit: usize,
}

impl PendingPage {
    pub fn new(jobs: Vec<JobRecord>, total: u64, request: PageRequest) -> Self {
        Self {
            jobs,
            total,
            offset: request.offset,
            limit: request.limit,
        }
    }

    pub fn has_more(&self) -> bool {
        (self.offset as u64).saturating_add(self.jobs.len() as u64) < self.total
    }

    pub fn next_request(&self) -> Option<PageRequest> {
        self.has_more().then(|| {
            PageRequest {
                offset: self.offset,
                limit: self.limit,
            }
            .next()
        })
    }
}
