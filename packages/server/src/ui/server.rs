//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::{
    handler::{
        delete_message, get_room, get_room_messages, get_rooms, health_check, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket chat server
///
/// ```ignore
/// let server = Server::new(AppState::from_config(&config));
/// server.run(&config.host, config.port).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/ws", get(websocket_handler))
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room))
            .route("/api/rooms/{room_id}/messages", get(get_room_messages))
            .route("/api/messages/{message_id}", delete(delete_message))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Bind `host:port` and serve until a shutdown signal arrives
    pub async fn run(self, host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let listener = TcpListener::bind(format!("{}:{}", host, port)).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener (used by tests with port 0)
    pub async fn serve(self, listener: TcpListener) -> Result<(), Box<dyn std::error::Error>> {
        let addr = listener.local_addr()?;
        tracing::info!("Inkpot chat server listening on {}", addr);
        tracing::info!("Connect to: ws://{}/ws", addr);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}
