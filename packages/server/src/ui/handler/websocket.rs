//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use serde::Deserialize;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{ConnectionId, ErrorCode, Identity, MessageBody, RoomId, ServerEvent},
    infrastructure::dto::websocket::ClientMessage,
    ui::state::AppState,
    usecase::{AttachIdentityError, SendMessageError, TypingError},
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub token: Option<String>,
}

/// Upgrade handler. A present but invalid token is refused with 401; no token
/// at all opens an anonymous connection.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let identity = match query.token.as_deref().map(str::trim) {
        Some(token) if !token.is_empty() => match state.authenticator.authenticate(token) {
            Ok(identity) => Some(identity),
            Err(e) => {
                tracing::warn!("Rejecting WebSocket upgrade: {}", e);
                return Err(StatusCode::UNAUTHORIZED);
            }
        },
        _ => None,
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, identity)))
}

/// Forward queued frames to the socket until the queue or the socket closes
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, identity: Option<Identity>) {
    let (tx, rx) = mpsc::channel(state.outbound_capacity.get());
    let connection_id = state.connect_client_usecase.execute(tx, identity).await;

    let (sender, mut receiver) = socket.split();
    let mut send_task = pusher_loop(rx, sender);

    let recv_state = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received from '{}': {}", connection_id, text.as_str());
                    if let Some(reply) = dispatch(&recv_state, &connection_id, text.as_str()).await
                    {
                        if let Err(e) = recv_state
                            .message_pusher
                            .push_to(&connection_id, &reply)
                            .await
                        {
                            tracing::warn!("Failed to reply to '{}': {}", connection_id, e);
                        }
                    }
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state.disconnect_client_usecase.execute(&connection_id).await;
}

/// Run one client request. Returns the error event to send back, if any.
async fn dispatch(
    state: &AppState,
    connection_id: &ConnectionId,
    text: &str,
) -> Option<ServerEvent> {
    let request = match serde_json::from_str::<ClientMessage>(text) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!("Unparseable frame from '{}': {}", connection_id, e);
            return Some(ServerEvent::error(
                ErrorCode::InvalidMessage,
                format!("unrecognised request: {}", e),
            ));
        }
    };

    match request {
        ClientMessage::Authenticate { token } => state
            .authenticate_client_usecase
            .execute(connection_id, &token)
            .await
            .err()
            .and_then(|e| attach_identity_reply(connection_id, e)),

        ClientMessage::JoinRoom { room_id } => {
            let room_id = match RoomId::new(room_id) {
                Ok(room_id) => room_id,
                Err(e) => return Some(ServerEvent::error(ErrorCode::InvalidRoom, e.to_string())),
            };
            if let Err(e) = state.join_room_usecase.execute(connection_id, room_id).await {
                tracing::warn!("Join failed for '{}': {}", connection_id, e);
            }
            None
        }

        ClientMessage::LeaveRoom => {
            state.leave_room_usecase.execute(connection_id).await;
            None
        }

        ClientMessage::SendMessage { room_id, message } => {
            let room_id = match RoomId::new(room_id) {
                Ok(room_id) => room_id,
                Err(e) => return Some(ServerEvent::error(ErrorCode::InvalidRoom, e.to_string())),
            };
            let body = match MessageBody::new(message) {
                Ok(body) => body,
                Err(e) => {
                    return Some(ServerEvent::error(ErrorCode::InvalidMessage, e.to_string()));
                }
            };
            state
                .send_message_usecase
                .execute(connection_id, room_id, body)
                .await
                .err()
                .and_then(|e| send_message_reply(connection_id, e))
        }

        ClientMessage::Typing { room_id } => typing(state, connection_id, room_id, true).await,

        ClientMessage::StopTyping { room_id } => typing(state, connection_id, room_id, false).await,
    }
}

async fn typing(
    state: &AppState,
    connection_id: &ConnectionId,
    room_id: String,
    is_typing: bool,
) -> Option<ServerEvent> {
    let room_id = match RoomId::new(room_id) {
        Ok(room_id) => room_id,
        Err(e) => return Some(ServerEvent::error(ErrorCode::InvalidRoom, e.to_string())),
    };
    match state
        .update_typing_usecase
        .execute(connection_id, room_id, is_typing)
        .await
    {
        Ok(_) => None,
        Err(e @ TypingError::NotInRoom(_)) => {
            Some(ServerEvent::error(ErrorCode::NotInRoom, e.to_string()))
        }
        Err(e @ TypingError::Unauthenticated) => {
            Some(ServerEvent::error(ErrorCode::Unauthenticated, e.to_string()))
        }
        Err(e @ TypingError::ConnectionNotFound(_)) => {
            tracing::warn!("Typing signal from '{}' dropped: {}", connection_id, e);
            None
        }
    }
}

fn send_message_reply(
    connection_id: &ConnectionId,
    error: SendMessageError,
) -> Option<ServerEvent> {
    let code = match &error {
        SendMessageError::NotInRoom(_) => ErrorCode::NotInRoom,
        SendMessageError::Unauthenticated => ErrorCode::Unauthenticated,
        SendMessageError::Persistence(_) => ErrorCode::PersistenceFailed,
        SendMessageError::ConnectionNotFound(_) => {
            tracing::warn!("Message from '{}' dropped: {}", connection_id, error);
            return None;
        }
    };
    Some(ServerEvent::error(code, error.to_string()))
}

fn attach_identity_reply(
    connection_id: &ConnectionId,
    error: AttachIdentityError,
) -> Option<ServerEvent> {
    match error {
        AttachIdentityError::Auth(e) => {
            tracing::warn!("Authentication failed for '{}': {}", connection_id, e);
            Some(ServerEvent::error(ErrorCode::AuthFailed, e.to_string()))
        }
        AttachIdentityError::Repository(e) => {
            tracing::warn!("Authentication for '{}' dropped: {}", connection_id, e);
            None
        }
    }
}
