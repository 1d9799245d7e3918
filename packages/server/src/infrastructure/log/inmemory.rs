//! InMemory Durable Log 実装
//!
//! HashMap と Vec をインメモリ DB として使用します。プロセス終了で内容は失われます。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use kairan_shared::time::{Clock, SystemClock};
use tokio::sync::Mutex;

use crate::domain::{ClientId, DurableLog, HistoryEntry, LogError, MessageText};

#[derive(Default)]
struct LogState {
    clients: HashMap<ClientId, bool>,
    messages: Vec<HistoryEntry>,
}

pub struct InMemoryLog {
    state: Mutex<LogState>,
    clock: Arc<dyn Clock>,
}

impl InMemoryLog {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(LogState::default()),
            clock,
        }
    }

    /// クライアントの active フラグ（未登録なら `None`）
    pub async fn is_active(&self, client_id: &ClientId) -> Option<bool> {
        self.state.lock().await.clients.get(client_id).copied()
    }
}

impl Default for InMemoryLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DurableLog for InMemoryLog {
    async fn record_client(&self, client_id: &ClientId) -> Result<(), LogError> {
        let mut state = self.state.lock().await;
        state.clients.insert(client_id.clone(), true);
        Ok(())
    }

    async fn mark_inactive(&self, client_id: &ClientId) -> Result<(), LogError> {
        let mut state = self.state.lock().await;
        if let Some(active) = state.clients.get_mut(client_id) {
            *active = false;
        }
        Ok(())
    }

    async fn append_message(
        &self,
        sender: &ClientId,
        text: &MessageText,
    ) -> Result<(), LogError> {
        let entry = HistoryEntry {
            sender: sender.to_string(),
            message: text.to_string(),
            created_at: self.clock.now_rfc3339(),
        };
        self.state.lock().await.messages.push(entry);
        Ok(())
    }

    async fn list_all_messages(&self) -> Result<Vec<HistoryEntry>, LogError> {
        let mut messages = self.state.lock().await.messages.clone();
        // 安定ソートなので同時刻は挿入順のまま
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use kairan_shared::time::FixedClock;

    use super::*;

    fn client(id: &str) -> ClientId {
        ClientId::new(id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_membership_flags() {
        // テスト項目: 登録で active、解除で inactive、未登録の解除は何もしない
        // given (前提条件):
        let log = InMemoryLog::new();

        // when (操作):
        log.record_client(&client("alice")).await.unwrap();
        log.mark_inactive(&client("alice")).await.unwrap();
        log.mark_inactive(&client("ghost")).await.unwrap();

        // then (期待する結果):
        assert_eq!(log.is_active(&client("alice")).await, Some(false));
        assert_eq!(log.is_active(&client("ghost")).await, None);
    }

    #[tokio::test]
    async fn test_history_is_stamped_with_clock() {
        // テスト項目: 履歴に注入した時計の時刻が記録される
        // given (前提条件):
        let log = InMemoryLog::with_clock(Arc::new(FixedClock::new(1672498800000)));

        // when (操作):
        log.append_message(
            &client("alice"),
            &MessageText::new("hi".to_string()).unwrap(),
        )
        .await
        .unwrap();

        // then (期待する結果):
        let history = log.list_all_messages().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].sender, "alice");
        assert_eq!(history[0].created_at, "2023-01-01T00:00:00.000+09:00");
    }
}
