//! taskscope-core
//!
//! Read-only monitoring layer over a task-queue engine's storage.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, records, state, page, stats, search, errors）
//! - **ports**: 抽象化レイヤー（Backend, CallContext）
//! - **impls**: 実装（InMemoryBackend, RedisBackend）
//! - **app**: アプリケーションロジック（repository, dashboard, pagination, search, service, builder）
//! - **config**: 設定と起動時検証

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{QueryService, ServiceBuilder};
pub use config::Config;
pub use domain::ScopeError;
pub use ports::{Backend, CallContext};
