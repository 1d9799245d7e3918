//! UseCase 層
//!
//! HTTP などの外部インターフェースから受け取った生の値を検証し、
//! Coordinator と Durable Log を組み合わせて各操作を実行します。

pub mod error;
pub mod fetch_history;
pub mod join_room;
pub mod leave_room;
pub mod poll_message;
pub mod send_message;

pub use error::{FetchHistoryError, MembershipError, PollError, SendMessageError};
pub use fetch_history::FetchHistoryUseCase;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use poll_message::PollMessageUseCase;
pub use send_message::SendMessageUseCase;
