//! Long-poll client session management.

use std::time::Duration;

use kairan_shared::time::get_jst_timestamp;
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

use crate::{
    api::ApiClient,
    domain::{PollAction, next_poll_action, should_attempt_retry},
    error::ClientError,
};

use super::{formatter::MessageFormatter, ui::redisplay_prompt};

pub const MAX_RETRY_ATTEMPTS: u32 = 5;
const RETRY_INTERVAL_SECS: u64 = 2;

/// Run one client session: join, poll and send until the user exits
///
/// The client always leaves before returning, even when polling failed.
pub async fn run_client_session(
    api: ApiClient,
    client_id: String,
    show_history: bool,
) -> Result<(), ClientError> {
    api.join(&client_id).await?;
    tracing::info!("Joined as '{}'", client_id);
    print!("{}", MessageFormatter::format_joined(&client_id, api.base_url()));

    if show_history {
        match api.history().await {
            Ok(entries) => print!("{}", MessageFormatter::format_history(&entries)),
            Err(e) => tracing::warn!("Failed to fetch history: {}", e),
        }
    }

    let mut poll_task = tokio::spawn(poll_loop(api.clone(), client_id.clone()));

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let prompt = format!("{}> ", client_id);
    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    let sender = api.clone();
    let sender_id = client_id.clone();
    let mut send_task = tokio::spawn(async move {
        while let Some(line) = input_rx.recv().await {
            match sender.send(&sender_id, &line).await {
                Ok(()) => {
                    let formatted = MessageFormatter::format_sent_confirmation(get_jst_timestamp());
                    print!("{}", formatted);
                }
                Err(e) => tracing::warn!("Failed to send message: {}", e),
            }
            redisplay_prompt(&sender_id);
        }
    });

    // If either task completes, abort the other
    let result = tokio::select! {
        poll_result = &mut poll_task => {
            send_task.abort();
            poll_result.unwrap_or_else(|e| Err(ClientError::ConnectionError(e.to_string())))
        }
        _ = &mut send_task => {
            poll_task.abort();
            Ok(())
        }
    };

    if let Err(e) = api.leave(&client_id).await {
        tracing::warn!("Failed to leave: {}", e);
    } else {
        tracing::info!("Left as '{}'", client_id);
    }

    result
}

/// Long-poll `/messages` until the retries run out
async fn poll_loop(api: ApiClient, client_id: String) -> Result<(), ClientError> {
    let mut failures = 0;

    loop {
        let result = api.poll(&client_id).await;
        let last_error = result.as_ref().err().cloned();

        match next_poll_action(result, failures, MAX_RETRY_ATTEMPTS) {
            PollAction::Display(text) => {
                failures = 0;
                print!("{}", MessageFormatter::format_received(&text));
                redisplay_prompt(&client_id);
            }
            PollAction::PollAgain => failures = 0,
            PollAction::Rejoin => {
                tracing::warn!("Server does not know '{}', joining again", client_id);
                if let Err(e) = api.join(&client_id).await {
                    if !should_attempt_retry(&e, failures, MAX_RETRY_ATTEMPTS) {
                        return Err(e);
                    }
                    failures += 1;
                    tokio::time::sleep(Duration::from_secs(RETRY_INTERVAL_SECS)).await;
                }
            }
            PollAction::Retry => {
                failures += 1;
                tracing::warn!(
                    "Polling failed, retrying in {} seconds... (attempt {}/{})",
                    RETRY_INTERVAL_SECS,
                    failures,
                    MAX_RETRY_ATTEMPTS
                );
                tokio::time::sleep(Duration::from_secs(RETRY_INTERVAL_SECS)).await;
            }
            PollAction::GiveUp => {
                let error = last_error
                    .unwrap_or_else(|| ClientError::ConnectionError("polling failed".to_string()));
                tracing::error!(
                    "Giving up polling after {} attempts: {}",
                    failures,
                    error
                );
                return Err(error);
            }
        }
    }
}
