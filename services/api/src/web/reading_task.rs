//! services/api/src/web/reading_task.rs
//!
//! The asynchronous "worker" functions of a reading session: loading a chapter,
//! explaining a verse, and moving between pages.
//!
//! Loads run as spawned tasks and are never aborted. Each one carries the token
//! issued when it was requested, and its result is dropped if the reader has
//! selected another chapter in the meantime.

use crate::web::{
    protocol::{ClientMessage, ServerMessage},
    state::{AppState, SessionState},
    ws_handler::{send_message, WsSender},
};
use gita_core::{
    ports::PortResult, retrieval::Retrieved, Chapter, ContentRequest, RequestToken,
    TOTAL_CHAPTERS,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// Loads `chapter` and, if the selection is still current, opens it at page 1.
pub async fn load_chapter(
    app_state: Arc<AppState>,
    session_state_lock: Arc<Mutex<SessionState>>,
    ws_sender: WsSender,
    chapter: u32,
    token: RequestToken,
) -> PortResult<()> {
    let retrieved = app_state.content.chapter(chapter).await?;

    let page = {
        let mut session = session_state_lock.lock().await;
        apply_chapter(&mut session, token, retrieved)
    };

    match page {
        Some(page) => {
            send_message(&ws_sender, &page).await;
            if chapter < TOTAL_CHAPTERS {
                app_state
                    .content
                    .prefetch(ContentRequest::Chapter { chapter: chapter + 1 });
            }
        }
        None => info!(
            "Discarding chapter {} (request {}), superseded by a newer selection.",
            chapter,
            token.id()
        ),
    }
    Ok(())
}

/// Opens a loaded chapter unless `token` has been superseded.
/// Returns the first page to show, or `None` for a stale load.
pub fn apply_chapter(
    session: &mut SessionState,
    token: RequestToken,
    retrieved: Retrieved<Chapter>,
) -> Option<ServerMessage> {
    if !session.chapter_requests.is_current(token) {
        return None;
    }
    session.open_chapter(retrieved.value, retrieved.source);
    session.open.as_ref().map(ServerMessage::page)
}

/// Explains a verse of the open chapter, dropping the answer if the chapter changed.
pub async fn explain_verse(
    app_state: Arc<AppState>,
    session_state_lock: Arc<Mutex<SessionState>>,
    ws_sender: WsSender,
    chapter: u32,
    verse_number: u32,
    token: RequestToken,
) -> PortResult<()> {
    if let Some(message) =
        explanation_message(&app_state, &session_state_lock, chapter, verse_number, token)
            .await?
    {
        send_message(&ws_sender, &message).await;
    }
    Ok(())
}

/// Builds the explanation reply, or `None` if `token` was superseded meanwhile.
///
/// The verse text is resolved by the retrieval service, so an explanation
/// generated for a placeholder chapter is not served once the live chapter loads.
pub async fn explanation_message(
    app_state: &AppState,
    session_state_lock: &Mutex<SessionState>,
    chapter: u32,
    verse_number: u32,
    token: RequestToken,
) -> PortResult<Option<ServerMessage>> {
    let retrieved = app_state
        .content
        .verse_explanation(chapter, verse_number)
        .await?;

    let current = session_state_lock
        .lock()
        .await
        .chapter_requests
        .is_current(token);
    if !current {
        info!(
            "Discarding explanation of verse {}.{} after a chapter change.",
            chapter, verse_number
        );
        return Ok(None);
    }

    Ok(Some(ServerMessage::VerseExplanation {
        chapter_number: chapter,
        verse_number,
        explanation: retrieved.value,
        source: retrieved.source,
    }))
}

/// Applies a page navigation message. Moves past either end are ignored and
/// the unchanged page is sent again.
pub fn navigate(session: &mut SessionState, message: &ClientMessage) -> ServerMessage {
    let Some(open) = session.open.as_mut() else {
        return ServerMessage::error("No chapter is open.");
    };

    match message {
        ClientMessage::NextPage => {
            open.progress.next();
        }
        ClientMessage::PreviousPage => {
            open.progress.previous();
        }
        ClientMessage::GoToPage { page } => {
            open.progress.go_to(*page);
        }
        _ => {}
    }
    ServerMessage::page(open)
}
