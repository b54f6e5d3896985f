pub mod cache;
pub mod companion;
pub mod domain;
pub mod pagination;
pub mod ports;
pub mod provider;
pub mod request_token;
pub mod retrieval;

#[cfg(test)]
mod testing;

pub use cache::{ContentCache, TtlCache};
pub use domain::{
    AudioScript, Chapter, Content, ContentKind, ContentRequest, ContentRequestKey,
    NarrationSettings, Verse, WisdomQuote, TOTAL_CHAPTERS,
};
pub use pagination::{paginate, progress, ReadingProgress, PAGE_SIZE};
pub use ports::{
    Clock, ContentProvider, GenerationRequest, GenerationService, ModelTier, OutputSchema,
    PortError, PortResult, SystemClock,
};
pub use provider::{DeterministicProvider, LiveProvider};
pub use request_token::{RequestToken, RequestTracker};
pub use retrieval::{ContentRetrievalService, ContentSource, Retrieved};
