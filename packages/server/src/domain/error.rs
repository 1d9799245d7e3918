//! ドメイン層のエラー型

use thiserror::Error;

/// 値オブジェクトの検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("client id must not be empty")]
    EmptyClientId,

    #[error("message must not be empty")]
    EmptyMessage,
}

/// Durable Log の操作エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogError {
    #[error("database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("log unavailable: {0}")]
    Unavailable(String),
}
