//! services/api/src/web/ws_handler.rs
//!
//! This is the main entry point and control loop for a WebSocket reading session.
//! It owns the session state and delegates chapter and verse loads to spawned tasks.

use crate::web::{
    protocol::{ClientMessage, ServerMessage},
    reading_task::{explain_verse, load_chapter, navigate},
    state::{AppState, SessionState},
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
use gita_core::{domain::is_valid_chapter, TOTAL_CHAPTERS};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

/// The sending half of a socket, shared between the control loop and its tasks.
pub type WsSender = Arc<Mutex<SplitSink<WebSocket, Message>>>;

/// The handler for upgrading HTTP requests to WebSocket connections.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, app_state))
}

/// Serializes and sends one message. Returns `false` if the client is gone.
pub async fn send_message(ws_sender: &WsSender, message: &ServerMessage) -> bool {
    let json = match serde_json::to_string(message) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize server message: {}", e);
            return false;
        }
    };
    ws_sender
        .lock()
        .await
        .send(Message::Text(json.into()))
        .await
        .is_ok()
}

async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>) {
    let connection_id = Uuid::new_v4();
    let span = tracing::info_span!("reading_session", %connection_id);

    async move {
        info!("New WebSocket connection established.");

        let (sender, mut receiver) = socket.split();
        let ws_sender: WsSender = Arc::new(Mutex::new(sender));
        let session_state_lock = Arc::new(Mutex::new(SessionState::new()));

        while let Some(frame) = receiver.next().await {
            match frame {
                Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(message) => {
                        handle_client_message(
                            message,
                            &app_state,
                            &session_state_lock,
                            &ws_sender,
                        )
                        .await
                    }
                    Err(e) => {
                        warn!("Ignoring unparseable client message: {}", e);
                        send_message(&ws_sender, &ServerMessage::error("Unrecognized message."))
                            .await;
                    }
                },
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!("WebSocket receive error: {}", e);
                    break;
                }
            }
        }

        info!("WebSocket connection closed.");
    }
    .instrument(span)
    .await
}

async fn handle_client_message(
    message: ClientMessage,
    app_state: &Arc<AppState>,
    session_state_lock: &Arc<Mutex<SessionState>>,
    ws_sender: &WsSender,
) {
    match message {
        ClientMessage::SelectChapter { chapter } => {
            if !is_valid_chapter(chapter) {
                let reply = ServerMessage::error(format!(
                    "Chapter must be between 1 and {}.",
                    TOTAL_CHAPTERS
                ));
                send_message(ws_sender, &reply).await;
                return;
            }

            let token = {
                let mut session = session_state_lock.lock().await;
                session.open = None;
                session.chapter_requests.issue()
            };
            send_message(ws_sender, &ServerMessage::ChapterLoading { chapter }).await;

            let app_state = app_state.clone();
            let session_state_lock = session_state_lock.clone();
            let ws_sender = ws_sender.clone();
            tokio::spawn(
                async move {
                    if let Err(e) = load_chapter(
                        app_state,
                        session_state_lock,
                        ws_sender.clone(),
                        chapter,
                        token,
                    )
                    .await
                    {
                        error!("Failed to load chapter {}: {}", chapter, e);
                        let reply =
                            ServerMessage::error(format!("Could not load Chapter {}.", chapter));
                        send_message(&ws_sender, &reply).await;
                    }
                }
                .in_current_span(),
            );
        }

        ClientMessage::NextPage | ClientMessage::PreviousPage | ClientMessage::GoToPage { .. } => {
            let reply = {
                let mut session = session_state_lock.lock().await;
                navigate(&mut session, &message)
            };
            send_message(ws_sender, &reply).await;
        }

        ClientMessage::ExplainVerse { verse_number } => {
            let lookup = {
                let session = session_state_lock.lock().await;
                session
                    .verse(verse_number)
                    .map(|(chapter, _)| chapter)
                    .zip(session.chapter_requests.current())
            };
            let Some((chapter, token)) = lookup else {
                let reply = ServerMessage::error(format!(
                    "Verse {} is not part of the open chapter.",
                    verse_number
                ));
                send_message(ws_sender, &reply).await;
                return;
            };

            let app_state = app_state.clone();
            let session_state_lock = session_state_lock.clone();
            let ws_sender = ws_sender.clone();
            tokio::spawn(
                async move {
                    if let Err(e) = explain_verse(
                        app_state,
                        session_state_lock,
                        ws_sender.clone(),
                        chapter,
                        verse_number,
                        token,
                    )
                    .await
                    {
                        error!("Failed to explain verse {}.{}: {}", chapter, verse_number, e);
                        let reply = ServerMessage::error("Unable to generate explanation at this time.");
                        send_message(&ws_sender, &reply).await;
                    }
                }
                .in_current_span(),
            );
        }
    }
}
