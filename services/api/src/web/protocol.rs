//! services/api/src/web/protocol.rs
//!
//! Defines the WebSocket message protocol between the browser client and the API server
//! for a reading session.

use crate::web::state::OpenChapter;
use gita_core::{retrieval::ContentSource, Verse};
use serde::{Deserialize, Serialize};

//=========================================================================================
// Messages Sent FROM the Client (Browser) TO the Server
//=========================================================================================

/// Represents the structured text messages a client can send to the server.
#[derive(Deserialize, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Opens a chapter at page 1. Supersedes any chapter still loading.
    SelectChapter { chapter: u32 },

    NextPage,

    PreviousPage,

    /// Jumps to a page. Pages outside the chapter are ignored.
    GoToPage { page: usize },

    /// Asks for an explanation of a verse of the open chapter.
    ExplainVerse { verse_number: u32 },
}

//=========================================================================================
// Messages Sent FROM the Server TO the Client (Browser)
//=========================================================================================

/// Represents the structured text messages the server can send to the client.
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The chapter has been requested; a `Page` follows once it is available.
    ChapterLoading { chapter: u32 },

    /// The verses of the current page and the reader's progress through the chapter.
    Page {
        chapter_number: u32,
        title: String,
        summary: String,
        page: usize,
        total_pages: usize,
        progress: f64,
        verses: Vec<Verse>,
        source: ContentSource,
    },

    VerseExplanation {
        chapter_number: u32,
        verse_number: u32,
        explanation: String,
        source: ContentSource,
    },

    /// Reports an error to the client, which should display an error message.
    Error { message: String },
}

impl ServerMessage {
    /// The current page of an open chapter.
    pub fn page(open: &OpenChapter) -> Self {
        ServerMessage::Page {
            chapter_number: open.chapter.chapter_number,
            title: open.chapter.title.clone(),
            summary: open.chapter.summary.clone(),
            page: open.progress.page(),
            total_pages: open.progress.total_pages(),
            progress: open.progress.progress(),
            verses: open.progress.visible(&open.chapter).to_vec(),
            source: open.source,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_are_tagged_by_type() {
        let message: ClientMessage =
            serde_json::from_str(r#"{"type": "select_chapter", "chapter": 5}"#).unwrap();
        assert_eq!(message, ClientMessage::SelectChapter { chapter: 5 });

        let message: ClientMessage = serde_json::from_str(r#"{"type": "next_page"}"#).unwrap();
        assert_eq!(message, ClientMessage::NextPage);
    }

    #[test]
    fn server_messages_serialize_with_snake_case_tags() {
        let json = serde_json::to_value(ServerMessage::ChapterLoading { chapter: 2 }).unwrap();
        assert_eq!(json["type"], "chapter_loading");

        let json = serde_json::to_value(ServerMessage::VerseExplanation {
            chapter_number: 1,
            verse_number: 1,
            explanation: "e".to_string(),
            source: ContentSource::Fallback,
        })
        .unwrap();
        assert_eq!(json["source"], "fallback");
    }
}
