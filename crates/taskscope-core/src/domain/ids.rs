//! Domain identifiers (strongly-typed IDs).
//!
//! The task-queue engine hands out opaque string ids for jobs, chains and groups.
//! They all live in the same store, so a plain `String` would let a chain id slip
//! into a job lookup without complaint. `Id<T>` keeps the raw value but tags it
//! with a zero-sized marker so `JobId`, `ChainId` and `GroupId` cannot be mixed.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// IdMarker は各 ID 型のマーカー trait
///
/// Names the entity kind an id points at (used in `NotFound` errors and logs).
pub trait IdMarker: Send + Sync + 'static {
    fn kind() -> EntityKind;
}

/// The three entity kinds an identifier can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Job,
    Chain,
    Group,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Job => "job",
            EntityKind::Chain => "chain",
            EntityKind::Group => "group",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ジェネリック ID 型
///
/// Serialized as the bare string, exactly as the engine stores it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T: IdMarker> {
    value: String,
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn kind(&self) -> EntityKind {
        T::kind()
    }

    /// Reinterpret the raw value as an id of another kind.
    ///
    /// Search only has an untyped string; this is how it probes each namespace.
    pub fn cast<U: IdMarker>(&self) -> Id<U> {
        Id::new(self.value.clone())
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T: IdMarker> From<&str> for Id<T> {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<T: IdMarker> From<String> for Id<T> {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl<T: IdMarker> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de, T: IdMarker> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

// ========================================
// マーカー型の定義
// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Job {}

impl IdMarker for Job {
    fn kind() -> EntityKind {
        EntityKind::Job
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Chain {}

impl IdMarker for Chain {
    fn kind() -> EntityKind {
        EntityKind::Chain
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Group {}

impl IdMarker for Group {
    fn kind() -> EntityKind {
        EntityKind::Group
    }
}

/// Identifier of a single job message.
pub type JobId = Id<Job>;

/// Identifier of a chain (ordered prior jobs + terminal job).
pub type ChainId = Id<Chain>;

/// Identifier of a group (unordered member jobs).
pub type GroupId = Id<Group>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_report_their_kind() {
        assert_eq!(JobId::new("a").kind(), EntityKind::Job);
        assert_eq!(ChainId::new("a").kind(), EntityKind::Chain);
        assert_eq!(GroupId::new("a").kind(), EntityKind::Group);

        // let _: JobId = ChainId::new("a"); // <- does not compile
    }

    #[test]
    fn ids_serialize_as_bare_strings() {
        let id = JobId::new("0b7c6e1a-job");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"0b7c6e1a-job\"");

        let back: JobId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn cast_keeps_raw_value() {
        let job = JobId::new("shared");
        let group: GroupId = job.cast();
        assert_eq!(group.as_str(), "shared");
        assert_eq!(group.kind(), EntityKind::Group);
    }

    #[test]
    fn display_does_not_add_prefix() {
        assert_eq!(GroupId::new("g-1").to_string(), "g-1");
    }
}
