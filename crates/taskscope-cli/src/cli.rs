//! Command-line flags. Every flag has a `TASKSCOPE_*` environment fallback,
//! and a `.env` file is read before parsing.

use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use taskscope_core::config::{
    BrokerConfig, BrokerKind, Config, QueryConfig, RedisConfig, ServerConfig, UiConfig,
};
use taskscope_core::domain::DEFAULT_QUEUE;

#[derive(Debug, Parser)]
#[command(name = "taskscope", version, about = "Read-only monitor for a task-queue engine")]
pub struct Cli {
    #[command(flatten)]
    pub opts: Opts,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Args)]
pub struct Opts {
    /// Storage backend: redis or in-memory
    #[arg(long, env = "TASKSCOPE_BROKER", default_value = "redis")]
    pub broker: BrokerKind,

    #[arg(long, env = "TASKSCOPE_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "TASKSCOPE_PORT", default_value_t = 8080)]
    pub port: u16,

    #[arg(long, env = "TASKSCOPE_REDIS_ADDR", default_value = "localhost:6379")]
    pub redis_addr: String,

    #[arg(long, env = "TASKSCOPE_REDIS_PASSWORD", hide_env_values = true)]
    pub redis_password: Option<String>,

    #[arg(long, env = "TASKSCOPE_REDIS_DB", default_value_t = 0)]
    pub redis_db: i64,

    /// Queue used when a request names none
    #[arg(long, env = "TASKSCOPE_DEFAULT_QUEUE", default_value = DEFAULT_QUEUE)]
    pub default_queue: String,

    /// Queues the dashboard counts (comma separated). Defaults to the default queue.
    #[arg(long = "watch-queue", env = "TASKSCOPE_WATCH_QUEUES", value_delimiter = ',')]
    pub watch_queues: Vec<String>,

    /// Per-request backend budget in seconds; 0 disables it
    #[arg(long, env = "TASKSCOPE_CALL_TIMEOUT_SECS", default_value_t = 10)]
    pub call_timeout_secs: u64,

    #[arg(long, env = "TASKSCOPE_REFRESH_SECS", default_value_t = 3)]
    pub refresh_secs: u64,

    #[arg(long, env = "TASKSCOPE_MAX_JOBS_DISPLAY", default_value_t = 100)]
    pub max_jobs_display: usize,

    /// Emit logs as JSON lines
    #[arg(long, env = "TASKSCOPE_LOG_JSON")]
    pub log_json: bool,

    /// Fill the in-memory backend with a small demo dataset
    #[arg(long)]
    pub seed_demo: bool,
}

impl Opts {
    pub fn to_config(&self) -> Config {
        let watched_queues = if self.watch_queues.is_empty() {
            vec![self.default_queue.clone()]
        } else {
            self.watch_queues.clone()
        };

        Config {
            server: ServerConfig {
                host: self.host.clone(),
                port: self.port,
            },
            broker: BrokerConfig {
                kind: self.broker,
                redis: RedisConfig {
                    addr: self.redis_addr.clone(),
                    password: self.redis_password.clone(),
                    db: self.redis_db,
                },
            },
            ui: UiConfig {
                refresh_interval: Duration::from_secs(self.refresh_secs),
                max_jobs_display: self.max_jobs_display,
            },
            query: QueryConfig {
                default_queue: self.default_queue.clone(),
                watched_queues,
                call_timeout: (self.call_timeout_secs > 0)
                    .then(|| Duration::from_secs(self.call_timeout_secs)),
            },
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Print the dashboard snapshot
    Stats,
    /// Show one job with its result
    Job { id: String },
    /// Show one chain with its member jobs
    Chain { id: String },
    /// List known chain ids
    Chains,
    /// Show one group with its member jobs
    Group { id: String },
    /// List known group ids
    Groups,
    /// List a queue's pending jobs
    Pending {
        /// Queue name; the default queue when omitted
        queue: Option<String>,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset: i64,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        limit: i64,
        /// Ignore offset/limit and print the whole queue
        #[arg(long)]
        all: bool,
    },
    /// Count a queue's pending jobs
    Count { queue: Option<String> },
    /// List job ids by terminal status (success | failed)
    Jobs { status: String },
    /// Resolve an id to a job, chain or group
    Search { id: String },
    /// Delete a job and its result
    Delete { id: String },
}
