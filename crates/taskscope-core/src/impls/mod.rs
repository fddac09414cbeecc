//! Impls - Backend の実装
//!
//! このモジュールには ports::Backend の実装を含めます。
//!
//! # 含まれる実装
//! - **InMemoryBackend**: 開発用・テスト用のストア
//! - **RedisBackend**: 本番用（エンジンの Redis broker / results を読む）

pub mod inmem_backend;
pub mod redis_backend;

// 主要な型を再エクスポート
pub use self::inmem_backend::InMemoryBackend;
pub use self::redis_backend::RedisBackend;
