//! UseCase: メッセージ受信（ロングポーリング）
//!
//! 設定されたタイムアウトまで、クライアントのメールボックスに届く次のメッセージを待ちます。

use std::time::Duration;

use crate::{broadcast::Coordinator, domain::ClientId};

use super::error::PollError;

/// メッセージ受信のユースケース
pub struct PollMessageUseCase {
    coordinator: Coordinator,
    timeout: Duration,
}

impl PollMessageUseCase {
    pub fn new(coordinator: Coordinator, timeout: Duration) -> Self {
        Self {
            coordinator,
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// 受信を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Some(text))` - メッセージを受信
    /// * `Ok(None)` - タイムアウト、または待機中に退出した
    /// * `Err(PollError::ClientNotFound)` - 参加していない
    pub async fn execute(&self, raw_client_id: String) -> Result<Option<String>, PollError> {
        let client_id = ClientId::new(raw_client_id).map_err(PollError::InvalidClientId)?;

        let message = self
            .coordinator
            .retrieve_message(&client_id, self.timeout)
            .await?;
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        broadcast::CoordinatorConfig,
        domain::{MessageText, ValueObjectError},
        infrastructure::log::InMemoryLog,
    };

    fn client(id: &str) -> ClientId {
        ClientId::new(id.to_string()).unwrap()
    }

    fn setup(timeout: Duration) -> (PollMessageUseCase, Coordinator) {
        let coordinator =
            Coordinator::spawn(Arc::new(InMemoryLog::new()), CoordinatorConfig::default());
        (
            PollMessageUseCase::new(coordinator.clone(), timeout),
            coordinator,
        )
    }

    #[tokio::test]
    async fn test_poll_returns_pending_message() {
        // テスト項目: メールボックスにあるメッセージがすぐに返る
        // given (前提条件):
        let (usecase, coordinator) = setup(Duration::from_secs(5));
        coordinator.register_client(client("bob")).await.unwrap();
        coordinator
            .broadcast_message(client("alice"), MessageText::new("hi".to_string()).unwrap())
            .await
            .unwrap();

        // when (操作):
        let result = usecase.execute("bob".to_string()).await;

        // then (期待する結果):
        assert_eq!(result, Ok(Some("alice: hi".to_string())));
    }

    #[tokio::test]
    async fn test_poll_times_out_with_none() {
        // テスト項目: メッセージが無ければ設定したタイムアウト後に None が返る
        // given (前提条件):
        let (usecase, coordinator) = setup(Duration::from_millis(100));
        coordinator.register_client(client("bob")).await.unwrap();

        // when (操作):
        let result = usecase.execute("bob".to_string()).await;

        // then (期待する結果):
        assert_eq!(result, Ok(None));
    }

    #[tokio::test]
    async fn test_poll_unknown_client_is_not_found() {
        // テスト項目: 参加していない ID は ClientNotFound になる
        // given (前提条件):
        let (usecase, _coordinator) = setup(Duration::from_secs(5));

        // when (操作):
        let result = usecase.execute("ghost".to_string()).await;

        // then (期待する結果):
        assert_eq!(result, Err(PollError::ClientNotFound("ghost".to_string())));
    }

    #[tokio::test]
    async fn test_poll_invalid_id_and_stopped_coordinator() {
        // テスト項目: 空の ID は InvalidClientId、停止後は Unavailable になる
        // given (前提条件):
        let (usecase, coordinator) = setup(Duration::from_secs(5));

        // when (操作):
        let invalid = usecase.execute(String::new()).await;
        coordinator.shutdown().await.unwrap();
        let stopped = usecase.execute("bob".to_string()).await;

        // then (期待する結果):
        assert_eq!(
            invalid,
            Err(PollError::InvalidClientId(ValueObjectError::EmptyClientId))
        );
        assert_eq!(stopped, Err(PollError::Unavailable));
    }
}
