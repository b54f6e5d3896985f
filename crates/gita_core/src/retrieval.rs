//! crates/gita_core/src/retrieval.rs
//!
//! The content retrieval service. Every request, whatever its kind, goes through
//! the same steps: cache check, live attempt (when a live provider is
//! configured), deterministic fallback on any failure, cache write.
//!
//! For valid requests the service always returns usable content. Provider
//! failures are logged and replaced with fallback content, which is cached like
//! any other result until its TTL runs out. This holds for full chapters too.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::cache::ContentCache;
use crate::domain::{
    AudioScript, Chapter, Content, ContentKind, ContentRequest, NarrationSettings, WisdomQuote,
};
use crate::ports::{ContentProvider, PortError, PortResult};
use crate::provider::DeterministicProvider;

/// Upper bound on a single live call.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Where a retrieved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentSource {
    Cache,
    Live,
    Fallback,
}

/// A retrieved value tagged with its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Retrieved<T> {
    pub value: T,
    pub source: ContentSource,
}

impl<T> Retrieved<T> {
    fn map<U>(self, f: impl FnOnce(T) -> U) -> Retrieved<U> {
        Retrieved {
            value: f(self.value),
            source: self.source,
        }
    }
}

pub struct ContentRetrievalService {
    provider: Arc<dyn ContentProvider>,
    fallback: DeterministicProvider,
    cache: Arc<ContentCache>,
    timeout: Duration,
}

impl ContentRetrievalService {
    /// Creates a service around the provider chosen by the caller.
    pub fn new(provider: Arc<dyn ContentProvider>, cache: Arc<ContentCache>) -> Self {
        if provider.is_live() {
            info!("Content retrieval using a live provider with deterministic fallback.");
        } else {
            info!("Content retrieval using deterministic content only.");
        }
        Self {
            provider,
            fallback: DeterministicProvider::new(),
            cache,
            timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    /// Creates a service with no live provider.
    pub fn with_fallback_only(cache: Arc<ContentCache>) -> Self {
        Self::new(Arc::new(DeterministicProvider::new()), cache)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cache(&self) -> &Arc<ContentCache> {
        &self.cache
    }

    /// Retrieves content for any request.
    ///
    /// Errors only for requests that can never name real content.
    pub async fn retrieve(&self, request: &ContentRequest) -> PortResult<Retrieved<Content>> {
        request.validate()?;
        let key = request.key();

        if let Some(value) = self.cache.get(&key) {
            debug!(%key, "cache hit");
            return Ok(Retrieved {
                value,
                source: ContentSource::Cache,
            });
        }
        debug!(%key, "cache miss");

        let retrieved = if self.provider.is_live() {
            match self.fetch_live(request).await {
                Ok(value) => Retrieved {
                    value,
                    source: ContentSource::Live,
                },
                Err(e) => {
                    warn!(%key, error = %e, "Live content unavailable, serving fallback.");
                    self.fallback_for(request)
                }
            }
        } else {
            self.fallback_for(request)
        };

        if request.kind() == ContentKind::Chapter && retrieved.source == ContentSource::Live {
            self.invalidate_derived(request.chapter());
        }
        self.cache.set(key, retrieved.value.clone());
        Ok(retrieved)
    }

    async fn fetch_live(&self, request: &ContentRequest) -> PortResult<Content> {
        let content = tokio::time::timeout(self.timeout, self.provider.fetch(request))
            .await
            .map_err(|_| PortError::Timeout(self.timeout))??;

        if content.kind() != request.kind() {
            return Err(PortError::MalformedResponse(format!(
                "asked for {:?} content but received {:?}",
                request.kind(),
                content.kind()
            )));
        }
        Ok(content)
    }

    fn fallback_for(&self, request: &ContentRequest) -> Retrieved<Content> {
        Retrieved {
            value: self.fallback.content_for(request),
            source: ContentSource::Fallback,
        }
    }

    /// Warms the cache for `request` in the background. Failures are ignored.
    pub fn prefetch(self: &Arc<Self>, request: ContentRequest) {
        if request.validate().is_err() || self.cache.contains(&request.key()) {
            return;
        }
        let service = Arc::clone(self);
        tokio::spawn(async move {
            let _ = service.retrieve(&request).await;
        });
    }

    //=====================================================================================
    // Typed Operations
    //=====================================================================================

    pub async fn wisdom(&self, chapter: u32) -> PortResult<Retrieved<WisdomQuote>> {
        let request = ContentRequest::Wisdom { chapter };
        let retrieved = self.retrieve(&request).await?;
        match retrieved.value {
            Content::Wisdom(wisdom) => Ok(Retrieved {
                value: wisdom,
                source: retrieved.source,
            }),
            other => Err(kind_mismatch(&request, &other)),
        }
    }

    pub async fn chapter(&self, chapter: u32) -> PortResult<Retrieved<Chapter>> {
        let request = ContentRequest::Chapter { chapter };
        let retrieved = self.retrieve(&request).await?;
        match retrieved.value {
            Content::Chapter(content) => Ok(Retrieved {
                value: content,
                source: retrieved.source,
            }),
            other => Err(kind_mismatch(&request, &other)),
        }
    }

    pub async fn preview(&self, chapter: u32) -> PortResult<Retrieved<String>> {
        let request = ContentRequest::Preview { chapter };
        let retrieved = self.retrieve(&request).await?;
        match retrieved.value {
            Content::Preview(text) => Ok(Retrieved {
                value: text,
                source: retrieved.source,
            }),
            other => Err(kind_mismatch(&request, &other)),
        }
    }

    /// A narration script for `chapter`, written for the title of the chapter
    /// as it is currently retrieved.
    pub async fn audio_script(&self, chapter: u32) -> PortResult<Retrieved<AudioScript>> {
        let title = self.chapter(chapter).await?.value.title;
        let request = ContentRequest::AudioScript {
            chapter,
            title: title.clone(),
        };
        let retrieved = self.retrieve(&request).await?;
        let text = match retrieved.value {
            Content::AudioScript(text) => Retrieved {
                value: text,
                source: retrieved.source,
            },
            other => return Err(kind_mismatch(&request, &other)),
        };
        Ok(text.map(|text| AudioScript {
            chapter_number: chapter,
            title,
            text,
            narration: NarrationSettings::default(),
        }))
    }

    /// Explains a verse of `chapter`. The verse text is taken from the chapter
    /// as it is currently retrieved, never from the caller.
    pub async fn verse_explanation(
        &self,
        chapter: u32,
        verse_number: u32,
    ) -> PortResult<Retrieved<String>> {
        if verse_number == 0 {
            return Err(PortError::InvalidRequest(
                "verse numbers start at 1".to_string(),
            ));
        }
        let content = self.chapter(chapter).await?.value;
        let verse = content.verse(verse_number).cloned().ok_or_else(|| {
            PortError::NotFound(format!(
                "Chapter {} has no verse {}",
                chapter, verse_number
            ))
        })?;

        let request = ContentRequest::VerseExplanation { chapter, verse };
        let retrieved = self.retrieve(&request).await?;
        match retrieved.value {
            Content::VerseExplanation(text) => Ok(Retrieved {
                value: text,
                source: retrieved.source,
            }),
            other => Err(kind_mismatch(&request, &other)),
        }
    }

    /// Drops narration and explanations generated from an earlier version of
    /// `chapter`, so they are regenerated from the live text.
    fn invalidate_derived(&self, chapter: u32) {
        let removed = self
            .cache
            .remove_where(|key| key.chapter == chapter && key.kind.derives_from_chapter());
        if removed > 0 {
            debug!(chapter, removed, "dropped content derived from a replaced chapter");
        }
    }
}

fn kind_mismatch(request: &ContentRequest, found: &Content) -> PortError {
    PortError::Unexpected(format!(
        "cache entry {} held {:?} content",
        request.key(),
        found.kind()
    ))
}
