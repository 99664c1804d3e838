//! Inkpot terminal chat client.
//!
//! Joins a room, sends each typed line as a message and shows who is typing.
//! Reconnects on connection loss (max 5 attempts with 5 second interval) and
//! re-joins the last room; a rejected token exits immediately.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin inkpot-client -- --token <jwt> --room general
//! INKPOT_TOKEN=<jwt> cargo run --bin inkpot-client -- -u ws://127.0.0.1:8080/ws
//! ```

use clap::Parser;
use inkpot_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "inkpot-client")]
#[command(about = "Terminal client for Inkpot chat rooms", long_about = None)]
struct Args {
    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// Token issued by the server; connect anonymously when absent
    #[arg(short = 't', long, env = "INKPOT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Room to join once connected
    #[arg(short = 'r', long)]
    room: Option<String>,
}

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    setup_logger(env!("CARGO_PKG_NAME"), env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = inkpot_client::run_client(args.url, args.token, args.room).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
