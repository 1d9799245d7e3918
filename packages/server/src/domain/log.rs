//! Durable Log trait 定義
//!
//! メッセージ履歴とメンバーシップ表を永続化する外部ストアへのインターフェース。
//! Coordinator はこの trait にのみ依存し、SQLite などの具体実装には依存しない
//! （依存性の逆転）。
//!
//! 書き込みは「助言的」な永続化として扱われ、失敗してもメモリ上の操作は
//! 失敗しない。より厳格な実装に差し替える場合もこの trait を実装すればよい。

use async_trait::async_trait;

use super::{ClientId, HistoryEntry, LogError, MessageText};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DurableLog: Send + Sync {
    /// クライアントを登録し active にする
    async fn record_client(&self, client_id: &ClientId) -> Result<(), LogError>;

    /// クライアントを inactive にする（未登録の ID は何もしない）
    async fn mark_inactive(&self, client_id: &ClientId) -> Result<(), LogError>;

    /// メッセージを履歴の末尾に追加
    async fn append_message(
        &self,
        sender: &ClientId,
        text: &MessageText,
    ) -> Result<(), LogError>;

    /// 全履歴を作成時刻の昇順で取得
    async fn list_all_messages(&self) -> Result<Vec<HistoryEntry>, LogError>;
}
