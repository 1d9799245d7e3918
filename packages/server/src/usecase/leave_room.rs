//! UseCase: ルーム退出処理

use crate::{broadcast::Coordinator, domain::ClientId};

use super::error::MembershipError;

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    coordinator: Coordinator,
}

impl LeaveRoomUseCase {
    pub fn new(coordinator: Coordinator) -> Self {
        Self { coordinator }
    }

    /// 退出を実行
    ///
    /// 参加していない ID の退出は何もせず成功する。
    pub async fn execute(&self, raw_client_id: String) -> Result<(), MembershipError> {
        let client_id = ClientId::new(raw_client_id).map_err(MembershipError::InvalidClientId)?;

        let removed = self
            .coordinator
            .unregister_client(client_id.clone())
            .await
            .map_err(|_| MembershipError::Unavailable)?;
        if !removed {
            tracing::debug!("Leave requested for unknown client '{}'", client_id);
        }

        Ok(())
    }
}
