//! Dashboard snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Point-in-time composite of several independent reads.
///
/// No atomicity across the reads: a job can finish between the success listing
/// and the pending count and show up in neither or both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_pending: u64,
    pub total_success: u64,
    pub total_failed: u64,

    /// Queue name -> pending count. Queues whose count could not be read are absent.
    pub queue_stats: BTreeMap<String, u64>,

    pub registered_tasks: Vec<String>,
}

impl DashboardStats {
    /// Record a successful pending count for `queue`.
    pub fn add_queue(&mut self, queue: impl Into<String>, pending: u64) {
        self.total_pending += pending;
        self.queue_stats.insert(queue.into(), pending);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_queue_accumulates_pending() {
        let mut stats = DashboardStats::default();
        stats.add_queue("default", 3);
        stats.add_queue("mail", 2);
        assert_eq!(stats.total_pending, 5);
        assert_eq!(stats.queue_stats["mail"], 2);
    }

    #[test]
    fn serializes_with_snake_case_keys() {
        let value = serde_json::to_value(DashboardStats::default()).unwrap();
        assert_eq!(value["total_pending"], 0);
        assert!(value["queue_stats"].as_object().unwrap().is_empty());
        assert!(value["registered_tasks"].as_array().unwrap().is_empty());
    }
}
