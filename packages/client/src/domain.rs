//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use crate::{api::PollOutcome, error::ClientError};

/// What the poll loop does after one `/messages` round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollAction {
    /// Print the received message, then poll again
    Display(String),
    /// Nothing arrived within the poll window
    PollAgain,
    /// The server forgot us (restart or mailbox reset); join again
    Rejoin,
    /// Transient failure; back off and poll again
    Retry,
    /// Stop the session
    GiveUp,
}

/// Check if the client should exit immediately based on the error type.
///
/// A rejected request means the client id itself is invalid, so retrying
/// cannot help.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::BadRequest(_))
}

/// Check if the client should retry after a failed request.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - Consecutive failures so far (0-indexed)
/// * `max_attempts` - The maximum number of retries allowed
pub fn should_attempt_retry(error: &ClientError, current_attempt: u32, max_attempts: u32) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}

/// Decide the next step of the poll loop
pub fn next_poll_action(
    result: Result<PollOutcome, ClientError>,
    failures: u32,
    max_attempts: u32,
) -> PollAction {
    match result {
        Ok(PollOutcome::Message(text)) => PollAction::Display(text),
        Ok(PollOutcome::Empty) => PollAction::PollAgain,
        Err(ClientError::NotJoined(_)) => PollAction::Rejoin,
        Err(e) if should_attempt_retry(&e, failures, max_attempts) => PollAction::Retry,
        Err(_) => PollAction::GiveUp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection_error() -> ClientError {
        ClientError::ConnectionError("network error".to_string())
    }

    #[test]
    fn test_should_exit_immediately_with_bad_request() {
        // テスト項目: BadRequest エラーの場合、即座に終了すべきと判定される
        // given (前提条件):
        let error = ClientError::BadRequest("Missing client ID".to_string());

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_exit_immediately_with_connection_error() {
        // テスト項目: ConnectionError の場合、即座に終了すべきではないと判定される
        // given (前提条件):
        let error = connection_error();

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_attempt_retry_within_limit() {
        // テスト項目: 失敗回数が上限未満なら再試行し、上限に達したら再試行しない
        // given (前提条件):
        let error = connection_error();

        // when (操作):
        let first = should_attempt_retry(&error, 0, 5);
        let one_before_limit = should_attempt_retry(&error, 4, 5);
        let at_limit = should_attempt_retry(&error, 5, 5);

        // then (期待する結果):
        assert!(first);
        assert!(one_before_limit);
        assert!(!at_limit);
    }

    #[test]
    fn test_should_attempt_retry_with_bad_request() {
        // テスト項目: BadRequest は回数に関わらず再試行しない
        // given (前提条件):
        let error = ClientError::BadRequest("client id must not be empty".to_string());

        // when (操作):
        let result = should_attempt_retry(&error, 0, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_next_poll_action_for_responses() {
        // テスト項目: 200 は表示、204 は再ポーリング、404 は再参加になる
        // given (前提条件):
        let message = Ok(PollOutcome::Message("alice: hi".to_string()));
        let empty = Ok(PollOutcome::Empty);
        let not_joined = Err(ClientError::NotJoined("alice".to_string()));

        // when (操作):
        // then (期待する結果):
        assert_eq!(
            next_poll_action(message, 0, 5),
            PollAction::Display("alice: hi".to_string())
        );
        assert_eq!(next_poll_action(empty, 0, 5), PollAction::PollAgain);
        assert_eq!(next_poll_action(not_joined, 5, 5), PollAction::Rejoin);
    }

    #[test]
    fn test_next_poll_action_for_failures() {
        // テスト項目: 通信エラーは上限まで Retry、上限到達で GiveUp になる
        // given (前提条件):
        // when (操作):
        let retry = next_poll_action(Err(connection_error()), 2, 5);
        let give_up = next_poll_action(Err(connection_error()), 5, 5);
        let unavailable = next_poll_action(
            Err(ClientError::Unavailable("shutting down".to_string())),
            0,
            5,
        );

        // then (期待する結果):
        assert_eq!(retry, PollAction::Retry);
        assert_eq!(give_up, PollAction::GiveUp);
        assert_eq!(unavailable, PollAction::Retry);
    }
}
