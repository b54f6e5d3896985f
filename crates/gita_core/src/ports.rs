//! crates/gita_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like a hosted LLM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::domain::{Chapter, Content, ContentRequest, Verse, WisdomQuote};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., network, quota).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// No live provider is configured. A routing condition, not a fault.
    #[error("No live content provider is configured")]
    ProviderUnavailable,
    #[error("Content provider call failed: {0}")]
    ProviderCallFailed(String),
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
    #[error("Content failed validation: {0}")]
    Validation(String),
    #[error("Content provider did not answer within {0:?}")]
    Timeout(Duration),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// The request is well formed but names content that does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// External Generation Capability
//=========================================================================================

/// Which class of model should serve a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    /// Fast model for exploratory content.
    Standard,
    /// Stronger model where fidelity to the canonical text matters.
    HighFidelity,
}

/// A declared output shape the provider must constrain its answer to.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    pub name: &'static str,
    pub description: &'static str,
    pub schema: serde_json::Value,
}

/// One call to the external generation capability.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    /// `None` requests plain text.
    pub output_schema: Option<OutputSchema>,
    /// In `[0, 1]`; higher is more exploratory.
    pub temperature: f32,
    pub tier: ModelTier,
}

#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Generates raw text (or a JSON document when a schema is declared) for the request.
    async fn generate(&self, request: &GenerationRequest) -> PortResult<String>;
}

//=========================================================================================
// Content Providers
//=========================================================================================

/// A source of fresh content, one operation per content kind.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    async fn wisdom(&self, chapter: u32) -> PortResult<WisdomQuote>;

    async fn chapter(&self, chapter: u32) -> PortResult<Chapter>;

    async fn preview(&self, chapter: u32) -> PortResult<String>;

    async fn audio_script(&self, chapter: u32, title: &str) -> PortResult<String>;

    async fn verse_explanation(&self, chapter: u32, verse: &Verse) -> PortResult<String>;

    /// `false` for providers that only serve locally defined content.
    fn is_live(&self) -> bool {
        true
    }

    /// Dispatches a request to the matching per-kind operation.
    async fn fetch(&self, request: &ContentRequest) -> PortResult<Content> {
        match request {
            ContentRequest::Wisdom { chapter } => self.wisdom(*chapter).await.map(Content::Wisdom),
            ContentRequest::Chapter { chapter } => {
                self.chapter(*chapter).await.map(Content::Chapter)
            }
            ContentRequest::Preview { chapter } => {
                self.preview(*chapter).await.map(Content::Preview)
            }
            ContentRequest::AudioScript { chapter, title } => self
                .audio_script(*chapter, title)
                .await
                .map(Content::AudioScript),
            ContentRequest::VerseExplanation { chapter, verse } => self
                .verse_explanation(*chapter, verse)
                .await
                .map(Content::VerseExplanation),
        }
    }
}

//=========================================================================================
// Time
//=========================================================================================

/// A source of the current time, so expiry can be driven in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
