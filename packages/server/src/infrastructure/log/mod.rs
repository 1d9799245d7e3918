//! Durable Log 実装
//!
//! - `SqliteLog`: SQLite ファイル（または `:memory:`）に永続化する
//! - `InMemoryLog`: プロセス内のみで保持する（テスト・一時利用向け）

pub mod inmemory;
pub mod schema;
pub mod sqlite;

pub use inmemory::InMemoryLog;
pub use sqlite::SqliteLog;
