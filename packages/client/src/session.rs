//! WebSocket client session management.
//!
//! One session is one WebSocket connection. Frames from the server, lines
//! from the terminal and a periodic tick (for expiring typing indicators)
//! are handled in a single loop that owns the socket.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt, stream::SplitSink};
use inkpot_server::infrastructure::dto::websocket::{ClientMessage, ServerMessage};
use inkpot_shared::time::get_timestamp_millis;
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{self, http::StatusCode, protocol::Message},
};

use crate::{
    command::{self, Command, HELP},
    error::ClientError,
    formatter::MessageFormatter,
    state::ChatState,
    ui::print_block,
};

type WsWrite = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

const TYPING_TICK: Duration = Duration::from_millis(500);

/// Run one WebSocket session.
///
/// Returns `Ok(())` when the user quits and an error when the connection
/// could not be opened or was lost.
pub async fn run_client_session(
    url: &str,
    token: Option<&str>,
    state: &mut ChatState,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let url = match token {
        Some(token) => format!("{}?token={}", url, token),
        None => url.to_string(),
    };

    let (ws_stream, _) = match connect_async(&url).await {
        Ok(result) => result,
        Err(tungstenite::Error::Http(response))
            if response.status() == StatusCode::UNAUTHORIZED =>
        {
            return Err(ClientError::Unauthorized);
        }
        Err(e) => return Err(ClientError::ConnectionError(e.to_string())),
    };
    tracing::info!("Connected to chat server!");

    let (mut write, mut read) = ws_stream.split();
    let mut ticker = tokio::time::interval(TYPING_TICK);

    loop {
        tokio::select! {
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    handle_frame(&mut write, state, text.as_str()).await?;
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("Server closed the connection");
                    state.disconnect();
                    return Err(ClientError::ConnectionError("Connection lost".to_string()));
                }
                Some(Err(e)) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    state.disconnect();
                    return Err(ClientError::ConnectionError(e.to_string()));
                }
                Some(Ok(_)) => {}
            },
            line = input_rx.recv() => {
                let Some(line) = line else {
                    // Terminal closed (Ctrl+C / Ctrl+D)
                    write.send(Message::Close(None)).await.ok();
                    return Ok(());
                };
                if !handle_line(&mut write, state, &line).await? {
                    write.send(Message::Close(None)).await.ok();
                    return Ok(());
                }
            },
            _ = ticker.tick() => {
                if state.expire_typing(get_timestamp_millis()) {
                    let line = state
                        .typing_line()
                        .unwrap_or_else(|| "nobody is typing".to_string());
                    print_block(&MessageFormatter::format_typing_line(&line));
                }
            },
        }
    }
}

async fn send(
    write: &mut WsWrite,
    state: &mut ChatState,
    message: &ClientMessage,
) -> Result<(), ClientError> {
    let json = serde_json::to_string(message)
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    if let Err(e) = write.send(Message::Text(json.into())).await {
        tracing::warn!("Failed to send message: {}", e);
        state.disconnect();
        return Err(ClientError::ConnectionError(e.to_string()));
    }
    Ok(())
}

/// Returns `false` when the user asked to quit
async fn handle_line(
    write: &mut WsWrite,
    state: &mut ChatState,
    line: &str,
) -> Result<bool, ClientError> {
    let command = match command::parse(line) {
        Ok(command) => command,
        Err(e) => {
            print_block(&MessageFormatter::format_notice(&e.to_string()));
            return Ok(true);
        }
    };

    let room = state.current_room().map(str::to_string);
    let request = match (command, room) {
        (Command::Quit, _) => return Ok(false),
        (Command::Help, _) => {
            print_block(&MessageFormatter::format_notice(HELP));
            return Ok(true);
        }
        (Command::Join(room_id), _) => ClientMessage::JoinRoom { room_id },
        (Command::Leave, _) => ClientMessage::LeaveRoom,
        (Command::Typing, Some(room_id)) => ClientMessage::Typing { room_id },
        (Command::StopTyping, Some(room_id)) => ClientMessage::StopTyping { room_id },
        (Command::Say(message), Some(room_id)) => {
            state.queue_own_message(message.clone());
            ClientMessage::SendMessage { room_id, message }
        }
        (_, None) => {
            print_block(&MessageFormatter::format_notice(
                "Join a room first with /join <room>",
            ));
            return Ok(true);
        }
    };

    send(write, state, &request).await?;
    Ok(true)
}

async fn handle_frame(
    write: &mut WsWrite,
    state: &mut ChatState,
    text: &str,
) -> Result<(), ClientError> {
    let message = match serde_json::from_str::<ServerMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::debug!("Unrecognised frame: {}", e);
            print_block(&MessageFormatter::format_raw_message(text));
            return Ok(());
        }
    };

    state.apply(&message, get_timestamp_millis());

    match &message {
        ServerMessage::Connected { username, .. } => {
            let who = username.as_deref().unwrap_or("anonymous");
            print_block(&MessageFormatter::format_notice(&format!(
                "You are '{}'. Type /help for commands.",
                who
            )));
            if let Some(room_id) = state.take_rejoin_room() {
                send(write, state, &ClientMessage::JoinRoom { room_id }).await?;
            }
        }
        ServerMessage::Authenticated { username, .. } => {
            print_block(&MessageFormatter::format_notice(&format!(
                "Authenticated as '{}'",
                username
            )));
        }
        ServerMessage::RoomJoined { room_id, members } => {
            let me = state.identity().map(|i| i.user_id);
            print_block(&MessageFormatter::format_room_joined(room_id, members, me));
        }
        ServerMessage::RoomLeft { room_id } => {
            print_block(&MessageFormatter::format_room_left(room_id));
        }
        ServerMessage::UserJoined {
            connection_id,
            username,
            timestamp,
            ..
        } => {
            print_block(&MessageFormatter::format_member_joined(
                username.as_deref(),
                connection_id,
                *timestamp,
            ));
        }
        ServerMessage::UserLeft {
            connection_id,
            username,
            timestamp,
            ..
        } => {
            print_block(&MessageFormatter::format_member_left(
                username.as_deref(),
                connection_id,
                *timestamp,
            ));
        }
        ServerMessage::ReceiveMessage {
            username,
            message,
            timestamp,
            ..
        } => {
            print_block(&MessageFormatter::format_chat_message(
                username, message, *timestamp,
            ));
        }
        ServerMessage::MessageSent { id, timestamp, .. } => {
            print_block(&MessageFormatter::format_sent_confirmation(*id, *timestamp));
        }
        ServerMessage::UserTyping { .. } | ServerMessage::UserStopTyping { .. } => {
            let line = state
                .typing_line()
                .unwrap_or_else(|| "nobody is typing".to_string());
            print_block(&MessageFormatter::format_typing_line(&line));
        }
        ServerMessage::Error { code, message } => {
            let code = serde_json::to_value(code)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            print_block(&MessageFormatter::format_error(&code, message));
        }
    }
    Ok(())
}
