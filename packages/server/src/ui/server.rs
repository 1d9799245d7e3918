//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::broadcast::Coordinator;

use super::{
    handler::{
        fetch_history, health_check, join_room, leave_room, poll_message, send_message,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Build the HTTP router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // ブロードキャスト API
        .route("/join", get(join_room).post(join_room))
        .route("/leave", get(leave_room).post(leave_room))
        .route("/send", get(send_message).post(send_message))
        .route("/messages", get(poll_message).post(poll_message))
        .route("/history", get(fetch_history).post(fetch_history))
        // HTTP エンドポイント
        .route("/api/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// HTTP long-poll broadcast server
///
/// # Example
///
/// ```ignore
/// let coordinator = Coordinator::spawn(log.clone(), CoordinatorConfig::default());
/// let state = Arc::new(AppState::new(coordinator.clone(), log, Duration::from_secs(10)));
/// Server::new(state, coordinator).run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    /// 終了時に停止させる Coordinator
    coordinator: Coordinator,
}

impl Server {
    pub fn new(state: Arc<AppState>, coordinator: Coordinator) -> Self {
        Self { state, coordinator }
    }

    /// Run the server until Ctrl+C or SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = router(self.state);

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("Broadcast server listening on {}", listener.local_addr()?);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // 待機中のロングポーリングを起こすため、シグナル受信時に Coordinator を先に止める
        let coordinator = self.coordinator.clone();
        let shutdown = async move {
            shutdown_signal().await;
            if let Err(e) = coordinator.shutdown().await {
                tracing::warn!("Coordinator shutdown: {}", e);
            }
        };

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
