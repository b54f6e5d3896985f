//! services/api/src/web/state.rs
//!
//! Defines the application's shared and session-specific states.

use gita_core::{
    pagination::ReadingProgress, retrieval::ContentSource, Chapter, ContentRetrievalService,
    RequestTracker, Verse,
};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub content: Arc<ContentRetrievalService>,
}

//=========================================================================================
// SessionState (Specific to One WebSocket Connection)
//=========================================================================================

/// A chapter the reader has open, with where they are in it.
pub struct OpenChapter {
    pub chapter: Chapter,
    pub source: ContentSource,
    pub progress: ReadingProgress,
}

/// The state for a single, active WebSocket connection.
#[derive(Default)]
pub struct SessionState {
    pub open: Option<OpenChapter>,
    /// Every chapter selection issues a token; only the latest may be applied.
    pub chapter_requests: RequestTracker,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `chapter` the open chapter, starting again from page 1.
    pub fn open_chapter(&mut self, chapter: Chapter, source: ContentSource) {
        let progress = ReadingProgress::for_chapter(&chapter);
        self.open = Some(OpenChapter {
            chapter,
            source,
            progress,
        });
    }

    pub fn verse(&self, verse_number: u32) -> Option<(u32, Verse)> {
        let open = self.open.as_ref()?;
        let verse = open.chapter.verse(verse_number)?.clone();
        Some((open.chapter.chapter_number, verse))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter(number: u32, verses: u32) -> Chapter {
        Chapter {
            chapter_number: number,
            title: format!("Chapter {}", number),
            summary: String::new(),
            verses: (1..=verses)
                .map(|n| Verse {
                    verse_number: n,
                    sanskrit: "ॐ".to_string(),
                    translation: format!("Verse {}", n),
                })
                .collect(),
        }
    }

    #[test]
    fn switching_chapters_resets_to_page_one() {
        let mut session = SessionState::new();
        session.open_chapter(chapter(2, 9), ContentSource::Live);
        session.open.as_mut().unwrap().progress.go_to(3);

        session.open_chapter(chapter(5, 4), ContentSource::Live);
        let open = session.open.as_ref().unwrap();
        assert_eq!(open.chapter.chapter_number, 5);
        assert_eq!(open.progress.page(), 1);
        assert_eq!(open.progress.total_pages(), 2);
    }

    #[test]
    fn verse_lookup_uses_the_open_chapter() {
        let mut session = SessionState::new();
        assert!(session.verse(1).is_none());

        session.open_chapter(chapter(4, 3), ContentSource::Fallback);
        let (chapter_number, verse) = session.verse(2).unwrap();
        assert_eq!(chapter_number, 4);
        assert_eq!(verse.translation, "Verse 2");
        assert!(session.verse(9).is_none());
    }
}
