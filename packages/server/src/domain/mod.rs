//! ドメイン層
//!
//! 値オブジェクト、メッセージイベント、Durable Log の trait を定義します。
//! インフラ層・UI 層の詳細には依存しません。

pub mod entity;
pub mod error;
pub mod log;
pub mod value_object;

pub use entity::{HistoryEntry, MessageEvent};
pub use error::{LogError, ValueObjectError};
pub use log::DurableLog;
#[cfg(test)]
pub use log::MockDurableLog;
pub use value_object::{ClientId, MessageText};
