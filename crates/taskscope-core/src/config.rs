//! Configuration.
//!
//! Plain serde structs with defaults. The binary layers flags and environment
//! on top; `validate()` runs before any backend is touched.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{DEFAULT_QUEUE, ScopeError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub broker: BrokerConfig,
    pub ui: UiConfig,
    pub query: QueryConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), ScopeError> {
        if self.server.port == 0 {
            return Err(ScopeError::invalid("server port cannot be 0"));
        }
        if self.broker.kind == BrokerKind::Redis && self.broker.redis.addr.trim().is_empty() {
            return Err(ScopeError::invalid("redis address cannot be empty"));
        }
        if self.query.default_queue.trim().is_empty() {
            return Err(ScopeError::invalid("default queue cannot be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Supported storage technologies. Closed set: anything else is rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BrokerKind {
    #[default]
    Redis,
    InMemory,
}

impl BrokerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BrokerKind::Redis => "redis",
            BrokerKind::InMemory => "in-memory",
        }
    }
}

impl fmt::Display for BrokerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrokerKind {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(BrokerKind::Redis),
            "in-memory" | "inmemory" | "memory" => Ok(BrokerKind::InMemory),
            _ => Err(ScopeError::UnsupportedBackend(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    pub kind: BrokerKind,
    pub redis: RedisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    pub addr: String,
    pub password: Option<String>,
    pub db: i64,
}

impl RedisConfig {
    /// `redis://[:password@]addr/db`, password percent-encoded.
    pub fn connection_url(&self) -> String {
        let auth = match self.password.as_deref() {
            Some(password) if !password.is_empty() => {
                format!(":{}@", urlencoding::encode(password))
            }
            _ => String::new(),
        };
        format!("redis://{auth}{}/{}", self.addr, self.db)
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            addr: "localhost:6379".to_string(),
            password: None,
            db: 0,
        }
    }
}

/// Settings handed to the web UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub refresh_interval: Duration,
    pub max_jobs_display: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(3),
            max_jobs_display: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Queue used when a request names none.
    pub default_queue: String,

    /// Queues the dashboard reports pending counts for.
    pub watched_queues: Vec<String>,

    /// Per-request budget for backend calls. `None` waits forever.
    pub call_timeout: Option<Duration>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_queue: DEFAULT_QUEUE.to_string(),
            watched_queues: vec![DEFAULT_QUEUE.to_string()],
            call_timeout: Some(Duration::from_secs(10)),
        }
    }
}
