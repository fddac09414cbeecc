//! ServiceBuilder - QueryService の構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）: 設定の不備は最初のリクエストより前に落とす

use std::sync::Arc;

use tracing::info;

use super::service::QueryService;
use crate::config::{BrokerKind, Config, QueryConfig};
use crate::domain::ScopeError;
use crate::impls::{InMemoryBackend, RedisBackend};
use crate::ports::Backend;

/// ServiceBuilder は QueryService を構築
///
/// # 使用例
/// ```ignore
/// let service = ServiceBuilder::from_config(&config).await?.build()?;
/// ```
///
/// # Fail-fast 設計
/// - `from_config()` validates the configuration and opens the backend
/// - `build()` refuses to run without a backend or with an unusable query config
pub struct ServiceBuilder {
    backend: Option<Arc<dyn Backend>>,
    query: QueryConfig,
}

/// BuildError はサービス構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no backend configured; call with_backend() or from_config()")]
    MissingBackend,

    #[error("invalid configuration: {0}")]
    InvalidConfig(#[source] ScopeError),

    #[error("cannot open {kind} backend: {source}")]
    Connect {
        kind: BrokerKind,
        #[source]
        source: ScopeError,
    },
}

impl ServiceBuilder {
    pub fn new() -> Self {
        Self {
            backend: None,
            query: QueryConfig::default(),
        }
    }

    /// Validate `config` and open the backend it selects.
    pub async fn from_config(config: &Config) -> Result<Self, BuildError> {
        Self::from_config_with_memory(config, InMemoryBackend::new()).await
    }

    /// Like [`from_config`](Self::from_config), but an in-memory selection
    /// serves `memory` (possibly pre-seeded). Ignored for other backends.
    pub async fn from_config_with_memory(
        config: &Config,
        memory: InMemoryBackend,
    ) -> Result<Self, BuildError> {
        config.validate().map_err(BuildError::InvalidConfig)?;

        let kind = config.broker.kind;
        let backend: Arc<dyn Backend> = match kind {
            BrokerKind::InMemory => Arc::new(memory),
            BrokerKind::Redis => {
                let url = config.broker.redis.connection_url();
                let redis = RedisBackend::connect(&url)
                    .await
                    .map_err(|source| BuildError::Connect { kind, source })?;
                Arc::new(redis)
            }
        };
        info!(backend = backend.name(), "backend ready");

        Ok(Self::new()
            .with_backend(backend)
            .with_query_config(config.query.clone()))
    }

    pub fn with_backend(mut self, backend: Arc<dyn Backend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_query_config(mut self, query: QueryConfig) -> Self {
        self.query = query;
        self
    }

    pub fn build(self) -> Result<QueryService, BuildError> {
        let backend = self.backend.ok_or(BuildError::MissingBackend)?;
        if self.query.default_queue.trim().is_empty() {
            return Err(BuildError::InvalidConfig(ScopeError::invalid(
                "default queue cannot be empty",
            )));
        }
        Ok(QueryService::new(backend, self.query))
    }
}

impl Default for ServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BrokerConfig;
    use crate::domain::{DEFAULT_QUEUE, JobRecord};

    #[test]
    fn build_without_backend_fails() {
        let result = ServiceBuilder::new().build();
        assert!(matches!(result, Err(BuildError::MissingBackend)));
    }

    #[test]
    fn build_rejects_blank_default_queue() {
        let query = QueryConfig {
            default_queue: " ".to_string(),
            ..QueryConfig::default()
        };
        let result = ServiceBuilder::new()
            .with_backend(Arc::new(InMemoryBackend::new()))
            .with_query_config(query)
            .build();
        assert!(matches!(result, Err(BuildError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn from_config_opens_in_memory_backend() {
        let config = Config {
            broker: BrokerConfig {
                kind: BrokerKind::InMemory,
                ..BrokerConfig::default()
            },
            ..Config::default()
        };
        let service = ServiceBuilder::from_config(&config).await.unwrap().build().unwrap();
        assert_eq!(service.backend_name(), "in-memory");
    }

    #[tokio::test]
    async fn in_memory_selection_serves_given_backend() {
        let config = Config {
            broker: BrokerConfig {
                kind: BrokerKind::InMemory,
                ..BrokerConfig::default()
            },
            ..Config::default()
        };
        let memory = InMemoryBackend::new();
        memory
            .insert_job(JobRecord::new("seeded", "add", DEFAULT_QUEUE))
            .await;

        let service = ServiceBuilder::from_config_with_memory(&config, memory)
            .await
            .unwrap()
            .build()
            .unwrap();
        let ctx = service.context();
        assert_eq!(service.pending_count(&ctx, "").await.unwrap(), 1);
        assert!(service.job(&ctx, "seeded").await.is_ok());
    }

    #[tokio::test]
    async fn from_config_validates_first() {
        let mut config = Config::default();
        config.server.port = 0;
        let result = ServiceBuilder::from_config(&config).await;
        assert!(matches!(result, Err(BuildError::InvalidConfig(_))));
    }
}
