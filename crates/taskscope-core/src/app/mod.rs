//! App - アプリケーション層
//!
//! このモジュールは、ports::Backend を組み合わせてクエリロジックを実装します。
//!
//! # 主要コンポーネント
//! - **EntityRepository**: job / chain / group の取得と子データの結合
//! - **Dashboard**: 集計スナップショット（致命的 / 非致命的な失敗の区別）
//! - **Paginator**: pending キューのページング
//! - **Resolver**: 種別不明な ID の検索
//! - **QueryService**: トランスポート層向けのファサード
//! - **ServiceBuilder**: 設定からの構築とワイヤリング

pub mod builder;
pub mod dashboard;
pub mod pagination;
pub mod repository;
pub mod search;
pub mod service;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, ServiceBuilder};
pub use self::dashboard::Dashboard;
pub use self::pagination::Paginator;
pub use self::repository::EntityRepository;
pub use self::search::Resolver;
pub use self::service::QueryService;
