//! Message formatting utilities for client display.

use kairan_shared::{
    dto::HistoryEntryDto,
    time::{rfc3339_to_jst_clock, timestamp_to_jst_rfc3339},
};

const RULE: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the banner shown right after joining
    pub fn format_joined(client_id: &str, base_url: &str) -> String {
        format!(
            "\nJoined {} as '{}'. Type messages and press Enter to send. Press Ctrl+C to exit.\n",
            base_url, client_id
        )
    }

    /// Format the stored history
    ///
    /// Each entry is shown as `[HH:MM:SS] sender: message` (JST). Entries whose
    /// timestamp cannot be parsed show the raw value instead.
    pub fn format_history(entries: &[HistoryEntryDto]) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n{}\n", RULE));
        output.push_str("History:\n");

        if entries.is_empty() {
            output.push_str("(No messages)\n");
        } else {
            for entry in entries {
                let time = rfc3339_to_jst_clock(&entry.created_at)
                    .unwrap_or_else(|| entry.created_at.clone());
                output.push_str(&format!("[{}] {}: {}\n", time, entry.sender, entry.message));
            }
        }

        output.push_str(&format!("{}\n", RULE));
        output
    }

    /// Format a message received from `/messages`
    ///
    /// The server already renders it as `sender: text`.
    pub fn format_received(text: &str) -> String {
        format!("\n← {}\n", text)
    }

    /// Format a confirmation message after sending
    ///
    /// # Arguments
    ///
    /// * `sent_at` - Unix timestamp when the message was sent (milliseconds)
    pub fn format_sent_confirmation(sent_at: i64) -> String {
        let timestamp_str = timestamp_to_jst_rfc3339(sent_at);
        format!("sent at {}\n", timestamp_str)
    }
}
