//! Long-poll chat client.
//!
//! Joins the broadcaster, prints every message addressed to this client and
//! sends each line typed at the prompt. Polling failures are retried a few
//! times before giving up.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kairan-client -- --client-id alice
//! cargo run --bin kairan-client -- -c bob --history
//! ```

use clap::Parser;
use kairan_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "kairan-client")]
#[command(about = "Chat client for the Kairan long-poll broadcaster", long_about = None)]
struct Args {
    /// Client ID to join as (a random guest ID when omitted)
    #[arg(short = 'c', long)]
    client_id: Option<String>,

    /// Server URL
    #[arg(short = 'u', long, default_value = "http://127.0.0.1:8080")]
    url: String,

    /// Print the stored history after joining
    #[arg(long)]
    history: bool,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let client_id = args.client_id.unwrap_or_else(|| {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        format!("guest-{}", &suffix[..8])
    });

    // Run the client
    if let Err(e) = kairan_client::run_client(args.url, client_id, args.history).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
