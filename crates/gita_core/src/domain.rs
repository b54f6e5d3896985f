//! crates/gita_core/src/domain.rs
//!
//! Defines the core data structures for the application: the scripture's
//! chapters and verses, the extracted wisdom quotes, and the identities used
//! to request and cache each kind of content.

use crate::ports::{PortError, PortResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Number of chapters in the Ashtavakra Gita.
pub const TOTAL_CHAPTERS: u32 = 20;

/// Returns `true` if `chapter` names one of the scripture's chapters.
pub fn is_valid_chapter(chapter: u32) -> bool {
    (1..=TOTAL_CHAPTERS).contains(&chapter)
}

//=========================================================================================
// Scripture Content
//=========================================================================================

/// A single verse: the original Sanskrit and its English translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub verse_number: u32,
    pub sanskrit: String,
    pub translation: String,
}

/// A full chapter with its ordered verses.
///
/// A chapter handed out by the retrieval service always has at least one verse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub chapter_number: u32,
    pub title: String,
    pub summary: String,
    pub verses: Vec<Verse>,
}

impl Chapter {
    /// Checks that this chapter is a complete answer for `expected_chapter`.
    ///
    /// Zero verses is a failure, never an empty chapter. Verse numbers must be
    /// positive and unique but need not be contiguous.
    pub fn validate(&self, expected_chapter: u32) -> PortResult<()> {
        if self.chapter_number != expected_chapter {
            return Err(PortError::Validation(format!(
                "expected chapter {} but received chapter {}",
                expected_chapter, self.chapter_number
            )));
        }
        if self.verses.is_empty() {
            return Err(PortError::Validation(format!(
                "chapter {} contained no verses",
                expected_chapter
            )));
        }

        let mut seen = HashSet::with_capacity(self.verses.len());
        for verse in &self.verses {
            if verse.verse_number == 0 {
                return Err(PortError::Validation(
                    "verse numbers must start at 1".to_string(),
                ));
            }
            if !seen.insert(verse.verse_number) {
                return Err(PortError::Validation(format!(
                    "verse {} appears more than once",
                    verse.verse_number
                )));
            }
            if verse.sanskrit.trim().is_empty() || verse.translation.trim().is_empty() {
                return Err(PortError::Validation(format!(
                    "verse {} is missing its text",
                    verse.verse_number
                )));
            }
        }
        Ok(())
    }

    /// Looks up a verse by its number.
    pub fn verse(&self, verse_number: u32) -> Option<&Verse> {
        self.verses.iter().find(|v| v.verse_number == verse_number)
    }
}

/// A single teaching extracted from a chapter, independent of the chapter text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WisdomQuote {
    pub quote: String,
    pub explanation: String,
}

impl WisdomQuote {
    pub fn validate(&self) -> PortResult<()> {
        if self.quote.trim().is_empty() || self.explanation.trim().is_empty() {
            return Err(PortError::Validation(
                "wisdom quote and explanation must both be present".to_string(),
            ));
        }
        Ok(())
    }
}

/// Playback hints handed to the external speech capability with a narration script.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NarrationSettings {
    pub lang: &'static str,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for NarrationSettings {
    fn default() -> Self {
        Self {
            lang: "en-US",
            rate: 0.85,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

/// A narration script for a chapter, ready for text-to-speech playback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioScript {
    pub chapter_number: u32,
    /// The chapter title the narration was written for.
    pub title: String,
    pub text: String,
    pub narration: NarrationSettings,
}

//=========================================================================================
// Content Requests and Cache Identity
//=========================================================================================

/// The five kinds of content the application can retrieve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Wisdom,
    Chapter,
    Preview,
    AudioScript,
    VerseExplanation,
}

impl ContentKind {
    fn key_prefix(self) -> &'static str {
        match self {
            ContentKind::Wisdom => "wisdom",
            ContentKind::Chapter => "chapter",
            ContentKind::Preview => "preview",
            ContentKind::AudioScript => "audio",
            ContentKind::VerseExplanation => "explain",
        }
    }

    /// Kinds generated from a chapter's own title or verse text.
    pub fn derives_from_chapter(self) -> bool {
        matches!(self, ContentKind::AudioScript | ContentKind::VerseExplanation)
    }
}

/// The cache identity of a content request: kind + chapter (+ verse).
///
/// Keys of different kinds never compare equal, so `wisdom:3` and `chapter:3`
/// can never see each other's cached values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentRequestKey {
    pub kind: ContentKind,
    pub chapter: u32,
    pub verse: Option<u32>,
}

impl fmt::Display for ContentRequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.verse {
            Some(verse) => write!(f, "{}:{}:{}", self.kind.key_prefix(), self.chapter, verse),
            None => write!(f, "{}:{}", self.kind.key_prefix(), self.chapter),
        }
    }
}

/// A request for one piece of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentRequest {
    Wisdom { chapter: u32 },
    Chapter { chapter: u32 },
    Preview { chapter: u32 },
    /// The title is woven into the narration; it does not affect the cache key.
    AudioScript { chapter: u32, title: String },
    VerseExplanation { chapter: u32, verse: Verse },
}

impl ContentRequest {
    pub fn kind(&self) -> ContentKind {
        match self {
            ContentRequest::Wisdom { .. } => ContentKind::Wisdom,
            ContentRequest::Chapter { .. } => ContentKind::Chapter,
            ContentRequest::Preview { .. } => ContentKind::Preview,
            ContentRequest::AudioScript { .. } => ContentKind::AudioScript,
            ContentRequest::VerseExplanation { .. } => ContentKind::VerseExplanation,
        }
    }

    pub fn chapter(&self) -> u32 {
        match self {
            ContentRequest::Wisdom { chapter }
            | ContentRequest::Chapter { chapter }
            | ContentRequest::Preview { chapter }
            | ContentRequest::AudioScript { chapter, .. }
            | ContentRequest::VerseExplanation { chapter, .. } => *chapter,
        }
    }

    pub fn key(&self) -> ContentRequestKey {
        let verse = match self {
            ContentRequest::VerseExplanation { verse, .. } => Some(verse.verse_number),
            _ => None,
        };
        ContentRequestKey {
            kind: self.kind(),
            chapter: self.chapter(),
            verse,
        }
    }

    /// Rejects requests that can never name real content.
    pub fn validate(&self) -> PortResult<()> {
        let chapter = self.chapter();
        if !is_valid_chapter(chapter) {
            return Err(PortError::InvalidRequest(format!(
                "chapter must be between 1 and {}, got {}",
                TOTAL_CHAPTERS, chapter
            )));
        }
        if let ContentRequest::VerseExplanation { verse, .. } = self {
            if verse.verse_number == 0 {
                return Err(PortError::InvalidRequest(
                    "verse numbers start at 1".to_string(),
                ));
            }
            if verse.translation.trim().is_empty() || verse.sanskrit.trim().is_empty() {
                return Err(PortError::InvalidRequest(
                    "a verse to explain must carry its text".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Content of any kind, as produced by a provider and held in the cache.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Wisdom(WisdomQuote),
    Chapter(Chapter),
    Preview(String),
    AudioScript(String),
    VerseExplanation(String),
}

impl Content {
    pub fn kind(&self) -> ContentKind {
        match self {
            Content::Wisdom(_) => ContentKind::Wisdom,
            Content::Chapter(_) => ContentKind::Chapter,
            Content::Preview(_) => ContentKind::Preview,
            Content::AudioScript(_) => ContentKind::AudioScript,
            Content::VerseExplanation(_) => ContentKind::VerseExplanation,
        }
    }
}
