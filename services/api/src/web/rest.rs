//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::{error::ApiError, web::state::AppState};
use axum::{
    extract::{Path, State},
    response::Json,
};
use gita_core::{
    companion::{commentary_for, share_text},
    pagination::{paginate, progress},
    retrieval::ContentSource,
    Verse,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        wisdom_handler,
        chapter_handler,
        preview_handler,
        audio_script_handler,
        verse_explanation_handler,
        page_handler,
        commentary_handler,
    ),
    components(
        schemas(
            Source,
            VerseBody,
            WisdomResponse,
            ChapterResponse,
            PreviewResponse,
            AudioScriptResponse,
            VerseExplanationResponse,
            PageResponse,
            CommentaryResponse,
        )
    ),
    tags(
        (name = "Ashtavakra Gita API", description = "Chapter text, quotes, previews, narration scripts and verse explanations.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// Where the content in a response came from.
#[derive(Serialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Cache,
    Live,
    /// Locally defined stand-in content.
    Fallback,
}

impl From<ContentSource> for Source {
    fn from(source: ContentSource) -> Self {
        match source {
            ContentSource::Cache => Source::Cache,
            ContentSource::Live => Source::Live,
            ContentSource::Fallback => Source::Fallback,
        }
    }
}

/// A verse as returned by the API.
#[derive(Serialize, ToSchema, Debug, Clone, PartialEq)]
pub struct VerseBody {
    pub verse_number: u32,
    pub sanskrit: String,
    pub translation: String,
}

impl From<Verse> for VerseBody {
    fn from(verse: Verse) -> Self {
        Self {
            verse_number: verse.verse_number,
            sanskrit: verse.sanskrit,
            translation: verse.translation,
        }
    }
}

#[derive(Serialize, ToSchema, Debug)]
pub struct WisdomResponse {
    pub chapter_number: u32,
    pub quote: String,
    pub explanation: String,
    pub source: Source,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct ChapterResponse {
    pub chapter_number: u32,
    pub title: String,
    pub summary: String,
    pub verses: Vec<VerseBody>,
    pub share_text: String,
    pub source: Source,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct PreviewResponse {
    pub chapter_number: u32,
    pub preview: String,
    pub source: Source,
}

/// A narration script plus the playback settings for the speech engine.
#[derive(Serialize, ToSchema, Debug)]
pub struct AudioScriptResponse {
    pub chapter_number: u32,
    pub title: String,
    pub text: String,
    pub lang: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    pub source: Source,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct VerseExplanationResponse {
    pub chapter_number: u32,
    pub verse_number: u32,
    pub explanation: String,
    pub source: Source,
}

/// One page of a chapter's verses.
#[derive(Serialize, ToSchema, Debug)]
pub struct PageResponse {
    pub chapter_number: u32,
    pub title: String,
    pub page: usize,
    pub total_pages: usize,
    /// Percent of the chapter read once this page is shown.
    pub progress: f64,
    pub verses: Vec<VerseBody>,
    pub source: Source,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct CommentaryResponse {
    pub chapter_number: u32,
    pub video_id: String,
    pub embed_url: String,
}

type HandlerResult<T> = Result<Json<T>, ApiError>;

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Get a single quote and explanation from a chapter.
#[utoipa::path(
    get,
    path = "/chapters/{chapter}/wisdom",
    responses(
        (status = 200, description = "A wisdom quote", body = WisdomResponse),
        (status = 400, description = "Chapter out of range")
    ),
    params(("chapter" = u32, Path, description = "Chapter number, 1 to 20."))
)]
pub async fn wisdom_handler(
    State(app_state): State<Arc<AppState>>,
    Path(chapter): Path<u32>,
) -> HandlerResult<WisdomResponse> {
    let retrieved = app_state.content.wisdom(chapter).await?;
    Ok(Json(WisdomResponse {
        chapter_number: chapter,
        quote: retrieved.value.quote,
        explanation: retrieved.value.explanation,
        source: retrieved.source.into(),
    }))
}

/// Get the full text of a chapter.
#[utoipa::path(
    get,
    path = "/chapters/{chapter}",
    responses(
        (status = 200, description = "The chapter with all of its verses", body = ChapterResponse),
        (status = 400, description = "Chapter out of range")
    ),
    params(("chapter" = u32, Path, description = "Chapter number, 1 to 20."))
)]
pub async fn chapter_handler(
    State(app_state): State<Arc<AppState>>,
    Path(chapter): Path<u32>,
) -> HandlerResult<ChapterResponse> {
    let retrieved = app_state.content.chapter(chapter).await?;
    let content = retrieved.value;
    Ok(Json(ChapterResponse {
        chapter_number: content.chapter_number,
        share_text: share_text(content.chapter_number, &content.title),
        title: content.title,
        summary: content.summary,
        verses: content.verses.into_iter().map(VerseBody::from).collect(),
        source: retrieved.source.into(),
    }))
}

/// Get a short preview of a chapter.
#[utoipa::path(
    get,
    path = "/chapters/{chapter}/preview",
    responses(
        (status = 200, description = "A preview of the chapter", body = PreviewResponse),
        (status = 400, description = "Chapter out of range")
    ),
    params(("chapter" = u32, Path, description = "Chapter number, 1 to 20."))
)]
pub async fn preview_handler(
    State(app_state): State<Arc<AppState>>,
    Path(chapter): Path<u32>,
) -> HandlerResult<PreviewResponse> {
    let retrieved = app_state.content.preview(chapter).await?;
    Ok(Json(PreviewResponse {
        chapter_number: chapter,
        preview: retrieved.value,
        source: retrieved.source.into(),
    }))
}

/// Get a narration script for a chapter, for playback by a speech engine.
///
/// The script is written for the chapter's own title.
#[utoipa::path(
    get,
    path = "/chapters/{chapter}/audio",
    responses(
        (status = 200, description = "A narration script", body = AudioScriptResponse),
        (status = 400, description = "Chapter out of range")
    ),
    params(("chapter" = u32, Path, description = "Chapter number, 1 to 20."))
)]
pub async fn audio_script_handler(
    State(app_state): State<Arc<AppState>>,
    Path(chapter): Path<u32>,
) -> HandlerResult<AudioScriptResponse> {
    let retrieved = app_state.content.audio_script(chapter).await?;
    let script = retrieved.value;
    Ok(Json(AudioScriptResponse {
        chapter_number: script.chapter_number,
        title: script.title,
        text: script.text,
        lang: script.narration.lang.to_string(),
        rate: script.narration.rate,
        pitch: script.narration.pitch,
        volume: script.narration.volume,
        source: retrieved.source.into(),
    }))
}

/// Explain a verse.
///
/// The verse is looked up in the chapter as the service currently holds it.
#[utoipa::path(
    post,
    path = "/chapters/{chapter}/verses/{verse}/explanation",
    responses(
        (status = 200, description = "An explanation of the verse", body = VerseExplanationResponse),
        (status = 400, description = "Chapter out of range or verse 0"),
        (status = 404, description = "The chapter has no such verse")
    ),
    params(
        ("chapter" = u32, Path, description = "Chapter number, 1 to 20."),
        ("verse" = u32, Path, description = "Verse number within the chapter.")
    )
)]
pub async fn verse_explanation_handler(
    State(app_state): State<Arc<AppState>>,
    Path((chapter, verse_number)): Path<(u32, u32)>,
) -> HandlerResult<VerseExplanationResponse> {
    let retrieved = app_state
        .content
        .verse_explanation(chapter, verse_number)
        .await?;
    Ok(Json(VerseExplanationResponse {
        chapter_number: chapter,
        verse_number,
        explanation: retrieved.value,
        source: retrieved.source.into(),
    }))
}

/// Get one page of a chapter's verses, with reading progress.
///
/// Pages outside the chapter return no verses.
#[utoipa::path(
    get,
    path = "/chapters/{chapter}/pages/{page}",
    responses(
        (status = 200, description = "The verses on the page", body = PageResponse),
        (status = 400, description = "Chapter out of range")
    ),
    params(
        ("chapter" = u32, Path, description = "Chapter number, 1 to 20."),
        ("page" = usize, Path, description = "Page number, starting at 1.")
    )
)]
pub async fn page_handler(
    State(app_state): State<Arc<AppState>>,
    Path((chapter, page)): Path<(u32, usize)>,
) -> HandlerResult<PageResponse> {
    let retrieved = app_state.content.chapter(chapter).await?;
    let content = retrieved.value;
    let (verses, total_pages) = paginate(&content, page);
    let verses = verses.iter().cloned().map(VerseBody::from).collect();
    Ok(Json(PageResponse {
        chapter_number: content.chapter_number,
        title: content.title.clone(),
        page,
        total_pages,
        progress: progress(page, total_pages),
        verses,
        source: retrieved.source.into(),
    }))
}

/// Get the video commentary for a chapter.
#[utoipa::path(
    get,
    path = "/chapters/{chapter}/commentary",
    responses(
        (status = 200, description = "The commentary video", body = CommentaryResponse),
        (status = 404, description = "No commentary for this chapter")
    ),
    params(("chapter" = u32, Path, description = "Chapter number, 1 to 20."))
)]
pub async fn commentary_handler(Path(chapter): Path<u32>) -> HandlerResult<CommentaryResponse> {
    let commentary = commentary_for(chapter).ok_or_else(|| {
        ApiError::NotFound(format!(
            "No video commentary available for Chapter {}",
            chapter
        ))
    })?;
    Ok(Json(CommentaryResponse {
        chapter_number: commentary.chapter_number,
        video_id: commentary.video_id.to_string(),
        embed_url: commentary.embed_url,
    }))
}
