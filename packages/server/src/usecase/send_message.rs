//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 送信者 ID と本文の検証、Coordinator へのブロードキャスト依頼
//!
//! ### なぜこのテストが必要か
//! - 送信者自身を含む全参加者に配信されることを保証
//! - 未参加の送信者でも配信・記録されることを確認（送信者の参加は要求しない）
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者への配信
//! - 異常系：空の ID、空の本文
//! - エッジケース：参加者ゼロでの送信（履歴にだけ残る）

use crate::{
    broadcast::Coordinator,
    domain::{ClientId, MessageText},
};

use super::error::SendMessageError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    coordinator: Coordinator,
}

impl SendMessageUseCase {
    pub fn new(coordinator: Coordinator) -> Self {
        Self { coordinator }
    }

    /// メッセージ送信を実行
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 配信先のクライアント数
    /// * `Err(SendMessageError)` - 入力が不正、または Coordinator が停止済み
    pub async fn execute(
        &self,
        raw_client_id: String,
        raw_message: String,
    ) -> Result<usize, SendMessageError> {
        let sender = ClientId::new(raw_client_id).map_err(SendMessageError::InvalidClientId)?;
        let text = MessageText::new(raw_message).map_err(SendMessageError::InvalidMessage)?;

        self.coordinator
            .broadcast_message(sender, text)
            .await
            .map_err(|_| SendMessageError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use super::*;
    use crate::{
        broadcast::CoordinatorConfig,
        domain::{DurableLog, ValueObjectError},
        infrastructure::log::InMemoryLog,
    };

    fn client(id: &str) -> ClientId {
        ClientId::new(id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_send_reaches_every_registered_client_including_sender() {
        // テスト項目: 送信者を含む全参加者に "送信者: 本文" が届く
        // given (前提条件):
        let coordinator =
            Coordinator::spawn(Arc::new(InMemoryLog::new()), CoordinatorConfig::default());
        coordinator.register_client(client("alice")).await.unwrap();
        coordinator.register_client(client("bob")).await.unwrap();
        let usecase = SendMessageUseCase::new(coordinator.clone());

        // when (操作):
        let recipients = usecase
            .execute("alice".to_string(), "hi".to_string())
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(recipients, 2);
        for id in ["alice", "bob"] {
            let received = coordinator
                .retrieve_message(&client(id), Duration::from_millis(100))
                .await
                .unwrap();
            assert_eq!(received, Some("alice: hi".to_string()));
        }
    }

    #[tokio::test]
    async fn test_send_without_recipients_is_still_logged() {
        // テスト項目: 参加者がいなくても送信は成功し、履歴に残る
        // given (前提条件):
        let log = Arc::new(InMemoryLog::new());
        let coordinator = Coordinator::spawn(log.clone(), CoordinatorConfig::default());
        let usecase = SendMessageUseCase::new(coordinator.clone());

        // when (操作):
        let recipients = usecase
            .execute("bob".to_string(), "anyone?".to_string())
            .await
            .unwrap();
        coordinator.flush_log().await.unwrap();

        // then (期待する結果):
        assert_eq!(recipients, 0);
        let history = log.list_all_messages().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].sender, "bob");
    }

    #[tokio::test]
    async fn test_send_rejects_empty_fields() {
        // テスト項目: 空の ID・空の本文はそれぞれのエラーになる
        // given (前提条件):
        let coordinator =
            Coordinator::spawn(Arc::new(InMemoryLog::new()), CoordinatorConfig::default());
        let usecase = SendMessageUseCase::new(coordinator);

        // when (操作):
        let no_id = usecase.execute(String::new(), "hi".to_string()).await;
        let no_message = usecase.execute("alice".to_string(), String::new()).await;

        // then (期待する結果):
        assert_eq!(
            no_id,
            Err(SendMessageError::InvalidClientId(
                ValueObjectError::EmptyClientId
            ))
        );
        assert_eq!(
            no_message,
            Err(SendMessageError::InvalidMessage(
                ValueObjectError::EmptyMessage
            ))
        );
    }
}
