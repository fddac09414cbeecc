//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! `Backend` はタスクキューエンジンのストア（Redis, in-memory）への
//! 読み取りインターフェースを提供し、実装の詳細を隠蔽します。
//!
//! # 設計原則
//! - ジョブの状態はエンジンが正本（このクレートは読むだけ）
//! - 削除だけが唯一の書き込み
//! - すべての呼び出しは `CallContext` 経由でキャンセル・期限に従う

pub mod backend;
pub mod context;

// 主要な trait を再エクスポート
pub use self::backend::{Backend, BackendCapabilities};
pub use self::context::CallContext;
