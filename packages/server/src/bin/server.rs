//! Inkpot chat server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin inkpot-server -- --jwt-secret dev-secret
//! cargo run --bin inkpot-server -- --host 0.0.0.0 --port 3000 --typing-ttl-ms 5000
//! cargo run --bin inkpot-server -- --jwt-secret dev-secret token --user-id 1 --username alice
//! ```

use std::{num::NonZeroUsize, time::Duration};

use clap::{Parser, Subcommand};
use inkpot_server::{
    config::ServerConfig,
    domain::{Identity, UserId, Username},
    infrastructure::auth::JwtAuthenticator,
    ui::{AppState, Server},
};
use inkpot_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "inkpot-server")]
#[command(about = "Real-time chat room server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "INKPOT_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "INKPOT_PORT", default_value = "8080")]
    port: u16,

    /// Secret used to sign and verify connection tokens
    #[arg(long, env = "INKPOT_JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// How long a typing indicator lives without a fresh signal
    #[arg(long, default_value = "3000")]
    typing_ttl_ms: u64,

    /// Outbound queue length per connection; overflowing events are dropped
    #[arg(long, default_value = "64")]
    outbound_capacity: NonZeroUsize,

    /// Maximum number of stored messages per room
    #[arg(long, default_value = "10000")]
    room_message_capacity: NonZeroUsize,

    /// Do not announce typing indicators that expire on their own
    #[arg(long)]
    no_expiry_broadcast: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a signed token for local testing and exit
    Token {
        #[arg(long)]
        user_id: i64,

        #[arg(long)]
        username: String,

        #[arg(long, default_value = "86400")]
        ttl_secs: u64,
    },
}

impl Args {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            jwt_secret: self.jwt_secret.clone(),
            typing_ttl: Duration::from_millis(self.typing_ttl_ms),
            broadcast_typing_expiry: !self.no_expiry_broadcast,
            outbound_capacity: self.outbound_capacity,
            room_message_capacity: self.room_message_capacity,
        }
    }
}

fn issue_token(
    secret: &str,
    user_id: i64,
    username: String,
    ttl: Duration,
) -> Result<String, Box<dyn std::error::Error>> {
    let identity = Identity::new(UserId::new(user_id), Username::new(username)?);
    Ok(JwtAuthenticator::new(secret).issue(&identity, ttl)?)
}

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    setup_logger(env!("CARGO_PKG_NAME"), env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    if let Some(Command::Token {
        user_id,
        username,
        ttl_secs,
    }) = &args.command
    {
        match issue_token(
            &args.jwt_secret,
            *user_id,
            username.clone(),
            Duration::from_secs(*ttl_secs),
        ) {
            Ok(token) => println!("{}", token),
            Err(e) => {
                tracing::error!("Failed to issue token: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let config = args.server_config();
    tracing::info!(
        "Typing TTL {:?}, outbound queue {}, room capacity {}",
        config.typing_ttl,
        config.outbound_capacity,
        config.room_message_capacity
    );

    let server = Server::new(AppState::from_config(&config));
    if let Err(e) = server.run(&config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
