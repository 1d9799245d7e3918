//! メッセージイベントと履歴エントリ

use super::value_object::{ClientId, MessageText};

/// ブロードキャスト中のメッセージ
///
/// broadcast 呼び出しからメールボックス投入・ログ追記までの間だけ存在する。
/// Coordinator 自身は保持しない（記録は Durable Log の責務）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    pub sender: ClientId,
    pub text: MessageText,
}

impl MessageEvent {
    pub fn new(sender: ClientId, text: MessageText) -> Self {
        Self { sender, text }
    }

    /// 配信用の文字列 `"{sender}: {text}"`
    pub fn formatted(&self) -> String {
        format!("{}: {}", self.sender, self.text)
    }
}

/// Durable Log から読み出した履歴 1 件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub sender: String,
    pub message: String,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_event_formatted() {
        // テスト項目: 配信文字列が "送信者: 本文" の形式になる
        // given (前提条件):
        let event = MessageEvent::new(
            ClientId::new("alice".to_string()).unwrap(),
            MessageText::new("hi".to_string()).unwrap(),
        );

        // when (操作):
        let formatted = event.formatted();

        // then (期待する結果):
        assert_eq!(formatted, "alice: hi");
    }
}
