//! ApiClient tests against a real server bound to an ephemeral port.

use std::{sync::Arc, time::Duration};

use kairan_client::{
    api::{ApiClient, PollOutcome},
    error::ClientError,
};
use kairan_server::{
    broadcast::{Coordinator, CoordinatorConfig},
    domain::DurableLog,
    infrastructure::log::InMemoryLog,
    ui::{AppState, router},
};

async fn spawn_server() -> ApiClient {
    let log: Arc<dyn DurableLog> = Arc::new(InMemoryLog::new());
    let coordinator = Coordinator::spawn(log.clone(), CoordinatorConfig::default());
    let state = Arc::new(AppState::new(coordinator, log, Duration::from_millis(300)));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });

    ApiClient::new(format!("http://{}/", addr))
}

#[tokio::test]
async fn test_join_send_and_poll() {
    // テスト項目: 参加した 2 クライアント間でメッセージが届く
    // given (前提条件):
    let api = spawn_server().await;
    api.join("alice").await.unwrap();
    api.join("bob").await.unwrap();

    // when (操作):
    api.send("alice", "hi").await.unwrap();
    let polled = api.poll("bob").await;

    // then (期待する結果):
    assert_eq!(polled, Ok(PollOutcome::Message("alice: hi".to_string())));
}

#[tokio::test]
async fn test_poll_times_out_empty() {
    // テスト項目: メッセージが無ければ Empty が返る
    // given (前提条件):
    let api = spawn_server().await;
    api.join("alice").await.unwrap();

    // when (操作):
    let polled = api.poll("alice").await;

    // then (期待する結果):
    assert_eq!(polled, Ok(PollOutcome::Empty));
}

#[tokio::test]
async fn test_poll_after_leave_is_not_joined() {
    // テスト項目: 退出後のポーリングは NotJoined になる
    // given (前提条件):
    let api = spawn_server().await;
    api.join("alice").await.unwrap();
    api.leave("alice").await.unwrap();

    // when (操作):
    let polled = api.poll("alice").await;

    // then (期待する結果):
    assert_eq!(polled, Err(ClientError::NotJoined("alice".to_string())));
}

#[tokio::test]
async fn test_empty_id_is_bad_request() {
    // テスト項目: 空の ID はサーバのメッセージ付きで BadRequest になる
    // given (前提条件):
    let api = spawn_server().await;

    // when (操作):
    let result = api.join("").await;

    // then (期待する結果):
    assert_eq!(
        result,
        Err(ClientError::BadRequest("Missing client ID".to_string()))
    );
}

#[tokio::test]
async fn test_long_id_can_join() {
    // テスト項目: 51 文字の ID でも参加できる
    // given (前提条件):
    let api = spawn_server().await;

    // when (操作):
    let result = api.join(&"a".repeat(51)).await;

    // then (期待する結果):
    assert_eq!(result, Ok(()));
}

#[tokio::test]
async fn test_history_returns_sent_messages() {
    // テスト項目: 送信したメッセージが履歴として取得できる
    // given (前提条件):
    let api = spawn_server().await;
    api.send("alice", "first").await.unwrap();
    api.send("bob", "second").await.unwrap();

    // when (操作):
    let history = api.history().await.unwrap();

    // then (期待する結果):
    let messages: Vec<&str> = history.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, vec!["first", "second"]);
}

#[tokio::test]
async fn test_unreachable_server_is_connection_error() {
    // テスト項目: 接続できないサーバへの要求は ConnectionError になる
    // given (前提条件):
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let api = ApiClient::new(format!("http://{}", addr));

    // when (操作):
    let result = api.join("alice").await;

    // then (期待する結果):
    assert!(matches!(result, Err(ClientError::ConnectionError(_))));
}
