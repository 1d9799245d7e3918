//! Shared application state.

use std::{sync::Arc, time::Duration};

use crate::{
    broadcast::Coordinator,
    domain::DurableLog,
    usecase::{
        FetchHistoryUseCase, JoinRoomUseCase, LeaveRoomUseCase, PollMessageUseCase,
        SendMessageUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// JoinRoomUseCase（参加のユースケース）
    pub join_room_usecase: JoinRoomUseCase,
    /// LeaveRoomUseCase（退出のユースケース）
    pub leave_room_usecase: LeaveRoomUseCase,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: SendMessageUseCase,
    /// PollMessageUseCase（ロングポーリング受信のユースケース）
    pub poll_message_usecase: PollMessageUseCase,
    /// FetchHistoryUseCase（履歴取得のユースケース）
    pub fetch_history_usecase: FetchHistoryUseCase,
}

impl AppState {
    /// Wire every use case to the given coordinator and log
    ///
    /// `poll_timeout` is the long-poll window applied to `/messages`.
    pub fn new(
        coordinator: Coordinator,
        log: Arc<dyn DurableLog>,
        poll_timeout: Duration,
    ) -> Self {
        Self {
            join_room_usecase: JoinRoomUseCase::new(coordinator.clone()),
            leave_room_usecase: LeaveRoomUseCase::new(coordinator.clone()),
            send_message_usecase: SendMessageUseCase::new(coordinator.clone()),
            poll_message_usecase: PollMessageUseCase::new(coordinator.clone(), poll_timeout),
            fetch_history_usecase: FetchHistoryUseCase::new(coordinator, log),
        }
    }
}
