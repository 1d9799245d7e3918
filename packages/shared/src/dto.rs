//! HTTP API data transfer objects.
//!
//! Both the server's transport adapter and the CLI client (de)serialize these.

use serde::{Deserialize, Serialize};

/// Body of a successful `/messages` poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollResponseDto {
    pub message: String,
}

/// One row of `/history`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntryDto {
    pub sender: String,
    pub message: String,
    pub created_at: String,
}

/// Error body returned for non-2xx responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBodyDto {
    pub error: ErrorDetailDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetailDto {
    pub code: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_entry_field_names() {
        // テスト項目: 履歴エントリが sender / message / created_at のキーで出力される
        // given (前提条件):
        let entry = HistoryEntryDto {
            sender: "alice".to_string(),
            message: "hi".to_string(),
            created_at: "2023-01-01T00:00:00.000+09:00".to_string(),
        };

        // when (操作):
        let json = serde_json::to_value(&entry).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            serde_json::json!({
                "sender": "alice",
                "message": "hi",
                "created_at": "2023-01-01T00:00:00.000+09:00",
            })
        );
    }
}
