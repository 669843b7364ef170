//! FireSnowデータベースへの読み取り専用アクセス

/// TTL付き単一接続キャッシュ
pub mod cache;
/// 物理接続の生成・破棄
pub mod connector;
/// クエリ結果のJSON射影
pub mod projection;
/// 固定SQLと後処理
pub mod queries;

pub use cache::{ConnectionCache, DEFAULT_TTL};
pub use connector::{check_driver, Connector, DbHandle, SqliteConnector};
