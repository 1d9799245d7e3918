//! UseCase: 履歴取得
//!
//! Durable Log に記録された全メッセージを作成時刻順に返します。
//! 読み出し前に保留中の書き込みを反映させるので、直前に送信したメッセージも含まれます。

use std::sync::Arc;

use crate::{
    broadcast::Coordinator,
    domain::{DurableLog, HistoryEntry},
};

use super::error::FetchHistoryError;

/// 履歴取得のユースケース
pub struct FetchHistoryUseCase {
    coordinator: Coordinator,
    log: Arc<dyn DurableLog>,
}

impl FetchHistoryUseCase {
    pub fn new(coordinator: Coordinator, log: Arc<dyn DurableLog>) -> Self {
        Self { coordinator, log }
    }

    pub async fn execute(&self) -> Result<Vec<HistoryEntry>, FetchHistoryError> {
        // 停止済みでも、書き込み済みの履歴は読める
        if let Err(e) = self.coordinator.flush_log().await {
            tracing::debug!("Skipping log flush before history read: {}", e);
        }

        let entries = self.log.list_all_messages().await?;
        Ok(entries)
    }
}
