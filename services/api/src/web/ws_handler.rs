//! services/api/src/web/ws_handler.rs
//!
//! This is the main entry point and control loop for a WebSocket connection.
//! Each connection owns one chat session for its whole lifetime; messages are
//! handled one at a time, in the order they arrive.

use crate::web::{
    protocol::{ClientMessage, ServerMessage},
    rest::{MessageResponse, PlatformResponse},
    state::AppState,
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{
    stream::{SplitSink, StreamExt},
    SinkExt,
};
use social_assistant_core::{platform, SessionController};
use std::sync::Arc;
use tracing::{error, info, warn};

/// The handler for upgrading HTTP requests to WebSocket connections.
pub async fn ws_handler(ws: WebSocketUpgrade, State(app_state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, app_state))
}

async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let mut session = app_state.new_controller();
    info!("New WebSocket session {}", session.id());

    // --- 1. Greeting ---
    let started = ServerMessage::SessionStarted {
        session_id: session.id(),
        title: session.title(),
        active_platform: session.active_platform().into(),
        platforms: platform::all().iter().copied().map(PlatformResponse::from).collect(),
    };
    if send_message(&mut sender, &started).await.is_err() {
        return;
    }

    // --- 2. Main Message Loop ---
    while let Some(Ok(msg)) = receiver.next().await {
        match msg {
            Message::Text(text) => {
                let client_msg = match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(client_msg) => client_msg,
                    Err(e) => {
                        warn!("Failed to deserialize client message: {}", e);
                        let reply = ServerMessage::Error {
                            message: format!("Unrecognized message: {}", e),
                        };
                        if send_message(&mut sender, &reply).await.is_err() {
                            break;
                        }
                        continue;
                    }
                };

                if starts_generation(&client_msg)
                    && send_message(&mut sender, &ServerMessage::GenerationStarted)
                        .await
                        .is_err()
                {
                    break;
                }

                let mut closed = false;
                for reply in apply_client_message(&mut session, client_msg).await {
                    if send_message(&mut sender, &reply).await.is_err() {
                        closed = true;
                        break;
                    }
                }
                if closed {
                    break;
                }
            }
            Message::Close(_) => {
                info!("Client sent close message.");
                break;
            }
            _ => {}
        }
    }

    // --- 3. Cleanup ---
    info!("WebSocket session {} closed.", session.id());
}

/// Whether handling `msg` will call the model.
fn starts_generation(msg: &ClientMessage) -> bool {
    matches!(msg, ClientMessage::SubmitText { content } if !content.trim().is_empty())
}

/// Runs one client action against the session and returns the replies to send, in order.
pub async fn apply_client_message(
    session: &mut SessionController,
    msg: ClientMessage,
) -> Vec<ServerMessage> {
    match msg {
        ClientMessage::SelectPlatform { platform } => match session.select_platform(&platform) {
            Ok(profile) => vec![ServerMessage::PlatformSelected {
                title: session.title(),
                platform: profile.into(),
            }],
            Err(e) => vec![ServerMessage::Error {
                message: e.to_string(),
            }],
        },
        ClientMessage::SubmitText { content } => match session.submit_text(&content).await {
            Ok(turn) => vec![
                ServerMessage::MessageAppended {
                    message: MessageResponse::from(&turn.user_message),
                },
                ServerMessage::MessageAppended {
                    message: MessageResponse::from(&turn.assistant_message),
                },
                ServerMessage::GenerationEnded {
                    failed: turn.outcome.is_failure(),
                },
            ],
            Err(e) => vec![ServerMessage::Error {
                message: e.to_string(),
            }],
        },
        ClientMessage::SubmitRating { value } => match session.submit_rating(value) {
            Ok(rating) => vec![ServerMessage::RatingRecorded {
                value: rating.value(),
                analytics: session.analytics().into(),
            }],
            Err(e) => vec![ServerMessage::Error {
                message: e.to_string(),
            }],
        },
        ClientMessage::Reset => {
            if session.reset() {
                vec![ServerMessage::ConversationReset {
                    analytics: session.analytics().into(),
                }]
            } else {
                vec![ServerMessage::Error {
                    message: "Nothing to clear".to_string(),
                }]
            }
        }
    }
}

async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
) -> Result<(), ()> {
    let json = serde_json::to_string(msg).map_err(|e| {
        error!("Failed to serialize server message: {}", e);
    })?;
    sender.send(Message::Text(json.into())).await.map_err(|e| {
        error!("Failed to send message to client: {}", e);
    })
}
