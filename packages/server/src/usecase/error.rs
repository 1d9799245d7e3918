//! UseCase 層のエラー型

use thiserror::Error;

use crate::{
    broadcast::CoordinatorError,
    domain::{LogError, ValueObjectError},
};

/// 参加・退出のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MembershipError {
    #[error("invalid client id: {0}")]
    InvalidClientId(ValueObjectError),

    #[error("broadcast coordinator is unavailable")]
    Unavailable,
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error("invalid client id: {0}")]
    InvalidClientId(ValueObjectError),

    #[error("invalid message: {0}")]
    InvalidMessage(ValueObjectError),

    #[error("broadcast coordinator is unavailable")]
    Unavailable,
}

/// メッセージ受信（ロングポーリング）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    #[error("invalid client id: {0}")]
    InvalidClientId(ValueObjectError),

    #[error("client '{0}' is not registered")]
    ClientNotFound(String),

    #[error("broadcast coordinator is unavailable")]
    Unavailable,
}

/// 履歴取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchHistoryError {
    #[error("failed to read history: {0}")]
    Store(#[from] LogError),
}

impl From<CoordinatorError> for PollError {
    fn from(e: CoordinatorError) -> Self {
        match e {
            CoordinatorError::ClientNotFound(id) => PollError::ClientNotFound(id),
            CoordinatorError::Stopped => PollError::Unavailable,
        }
    }
}
