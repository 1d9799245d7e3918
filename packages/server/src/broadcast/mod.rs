//! ブロードキャスト層
//!
//! Coordinator（制御ループ）、クライアントごとのメールボックス、
//! Durable Log への書き込み担当から構成されます。

pub mod coordinator;
pub mod log_writer;
pub mod mailbox;

pub use coordinator::{Coordinator, CoordinatorConfig, CoordinatorError};
pub use log_writer::{Durability, LogWrite, LogWriter};
pub use mailbox::{DepositOutcome, MIN_MAILBOX_CAPACITY, Mailbox, OverflowPolicy};
