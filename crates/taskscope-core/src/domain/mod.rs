//! Domain model (ids, records, statuses, derived views, errors).
//!
//! Records (`JobRecord`, `ChainRecord`, `GroupRecord`) are owned by the
//! task-queue engine. Views (`JobDetail`, `DashboardStats`, `PendingPage`,
//! `SearchResult`, ...) are built per request and never stored.

pub mod chain;
pub mod codec;
pub mod errors;
pub mod group;
pub mod ids;
pub mod job;
pub mod page;
pub mod search;
pub mod state;
pub mod stats;

pub use chain::{ChainDetail, ChainRecord};
pub use errors::{ErrorKind, ScopeError};
pub use group::{GroupDetail, GroupRecord};
pub use ids::{ChainId, EntityKind, GroupId, Id, IdMarker, JobId};
pub use job::{JobDetail, JobRecord};
pub use page::{DEFAULT_PAGE_LIMIT, PageRequest, PendingPage};
pub use search::SearchResult;
pub use state::{JobStatus, TerminalStatus};
pub use stats::DashboardStats;

/// Queue the engine uses when a job does not name one.
pub const DEFAULT_QUEUE: &str = "tasqueue:tasks";
