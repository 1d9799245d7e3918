//! Client execution logic.

use crate::{api::ApiClient, domain::should_exit_immediately};

use super::session::run_client_session;

/// Run the chat client against the server at `url`
pub async fn run_client(
    url: String,
    client_id: String,
    show_history: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Connecting to {} as '{}'", url, client_id);

    let api = ApiClient::new(url);
    match run_client_session(api, client_id.clone(), show_history).await {
        Ok(()) => {
            tracing::info!("Client session ended normally");
            Ok(())
        }
        Err(e) => {
            if should_exit_immediately(&e) {
                tracing::error!("Client ID '{}' was rejected by the server", client_id);
            }
            Err(Box::new(e))
        }
    }
}
