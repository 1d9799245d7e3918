//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - クライアント ID の検証と Coordinator への登録
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規参加、同じ ID での再参加、長い ID
//! - 異常系：空の ID、停止済みの Coordinator

use crate::{broadcast::Coordinator, domain::ClientId};

use super::error::MembershipError;

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    coordinator: Coordinator,
}

impl JoinRoomUseCase {
    pub fn new(coordinator: Coordinator) -> Self {
        Self { coordinator }
    }

    /// 参加を実行
    ///
    /// 同じ ID で既に参加している場合はメールボックスがリセットされる。
    pub async fn execute(&self, raw_client_id: String) -> Result<ClientId, MembershipError> {
        let client_id = ClientId::new(raw_client_id).map_err(MembershipError::InvalidClientId)?;

        self.coordinator
            .register_client(client_id.clone())
            .await
            .map_err(|_| MembershipError::Unavailable)?;

        Ok(client_id)
    }
}
