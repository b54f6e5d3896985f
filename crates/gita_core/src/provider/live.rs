//! crates/gita_core/src/provider/live.rs
//!
//! The live content provider. It builds one prompt per content kind, calls the
//! external generation capability through the `GenerationService` port, and
//! parses and validates what comes back. It has no side effects beyond that call.

const WISDOM_PROMPT: &str = "Generate a single profound quote and a modern explanation from Chapter {chapter} of the Ashtavakra Gita. Focus on a key theme of the chapter.";

const CHAPTER_PROMPT: &str = "Provide the full content for Chapter {chapter} of the Ashtavakra Gita. Include the chapter number, title, a brief summary, and a complete list of all verses. It is crucial that the 'verses' array in the JSON output contains EVERY SINGLE verse from the chapter, not just one or a sample. For each verse, include its verse number, original Sanskrit (in Devanagari script), and an English translation.";

const PREVIEW_PROMPT: &str = "Write a short preview (2 to 3 sentences) of Chapter {chapter} of the Ashtavakra Gita for a reader about to begin it. Describe its central theme and what the reader will discover, in plain modern English. Respond with the preview text only.";

const AUDIO_SCRIPT_PROMPT: &str = "Write a narration script explaining Chapter {chapter} ({title}) of the Ashtavakra Gita, to be read aloud by a text-to-speech voice. Speak directly to the listener in a calm, warm tone. Cover the chapter's main teachings and why they matter today, in about 300 words of flowing prose. Do not use headings, lists, markdown, or stage directions.";

const VERSE_EXPLANATION_PROMPT: &str = r#"Explain the following verse from Chapter {chapter} of the Ashtavakra Gita.

Verse {verse_number}
Sanskrit: {sanskrit}
Translation: {translation}

In one short paragraph, explain what the verse means, how it fits the teaching of non-dual awareness, and how a reader might reflect on it today. Respond with the explanation only."#;

/// Exploratory content.
pub const CREATIVE_TEMPERATURE: f32 = 0.7;
/// Full chapter text, where fabricated verses are the main risk.
pub const FIDELITY_TEMPERATURE: f32 = 0.3;

use async_trait::async_trait;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::{Arc, LazyLock};

use crate::domain::{Chapter, Verse, WisdomQuote};
use crate::ports::{
    ContentProvider, GenerationRequest, GenerationService, ModelTier, OutputSchema, PortError,
    PortResult,
};

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^```[a-zA-Z]*\s*(.*?)\s*```$").expect("code fence pattern is valid")
});

/// The declared shape of a wisdom quote.
pub fn wisdom_schema() -> OutputSchema {
    OutputSchema {
        name: "gita_wisdom",
        description: "A single quote from an Ashtavakra Gita chapter with a modern explanation.",
        schema: json!({
            "type": "object",
            "properties": {
                "quote": {
                    "type": "string",
                    "description": "A profound and insightful quote from the Ashtavakra Gita chapter, in English."
                },
                "explanation": {
                    "type": "string",
                    "description": "A simple, modern explanation of the quote's meaning and relevance."
                }
            },
            "required": ["quote", "explanation"],
            "additionalProperties": false
        }),
    }
}

/// The declared shape of a full chapter.
pub fn chapter_schema() -> OutputSchema {
    OutputSchema {
        name: "gita_chapter",
        description: "The complete text of one Ashtavakra Gita chapter.",
        schema: json!({
            "type": "object",
            "properties": {
                "chapter_number": { "type": "integer" },
                "title": { "type": "string" },
                "summary": { "type": "string" },
                "verses": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "verse_number": { "type": "integer" },
                            "sanskrit": {
                                "type": "string",
                                "description": "The verse in Sanskrit (Devanagari script)."
                            },
                            "translation": {
                                "type": "string",
                                "description": "The English translation of the verse."
                            }
                        },
                        "required": ["verse_number", "sanskrit", "translation"],
                        "additionalProperties": false
                    }
                }
            },
            "required": ["chapter_number", "title", "summary", "verses"],
            "additionalProperties": false
        }),
    }
}

/// Removes surrounding whitespace and a Markdown code fence, if the model added one.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    CODE_FENCE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map_or(trimmed, |body| body.as_str())
}

/// Parses a schema-constrained response into a typed record.
pub fn parse_structured<T: DeserializeOwned>(raw: &str) -> PortResult<T> {
    serde_json::from_str(strip_code_fence(raw))
        .map_err(|e| PortError::MalformedResponse(e.to_string()))
}

/// Accepts a free-text response as long as something is left after trimming.
pub fn parse_text(raw: &str) -> PortResult<String> {
    let text = strip_code_fence(raw);
    if text.is_empty() {
        return Err(PortError::MalformedResponse(
            "provider returned an empty response".to_string(),
        ));
    }
    Ok(text.to_string())
}

//=========================================================================================
// The Main Provider Struct
//=========================================================================================

/// A `ContentProvider` backed by a generative model.
#[derive(Clone)]
pub struct LiveProvider {
    generator: Arc<dyn GenerationService>,
}

impl LiveProvider {
    pub fn new(generator: Arc<dyn GenerationService>) -> Self {
        Self { generator }
    }

    async fn generate_text(&self, prompt: String) -> PortResult<String> {
        let request = GenerationRequest {
            prompt,
            output_schema: None,
            temperature: CREATIVE_TEMPERATURE,
            tier: ModelTier::Standard,
        };
        let raw = self.generator.generate(&request).await?;
        parse_text(&raw)
    }
}

//=========================================================================================
// `ContentProvider` Trait Implementation
//=========================================================================================

#[async_trait]
impl ContentProvider for LiveProvider {
    async fn wisdom(&self, chapter: u32) -> PortResult<WisdomQuote> {
        let request = GenerationRequest {
            prompt: WISDOM_PROMPT.replace("{chapter}", &chapter.to_string()),
            output_schema: Some(wisdom_schema()),
            temperature: CREATIVE_TEMPERATURE,
            tier: ModelTier::Standard,
        };
        let raw = self.generator.generate(&request).await?;
        let wisdom: WisdomQuote = parse_structured(&raw)?;
        wisdom.validate()?;
        Ok(wisdom)
    }

    async fn chapter(&self, chapter: u32) -> PortResult<Chapter> {
        let request = GenerationRequest {
            prompt: CHAPTER_PROMPT.replace("{chapter}", &chapter.to_string()),
            output_schema: Some(chapter_schema()),
            temperature: FIDELITY_TEMPERATURE,
            tier: ModelTier::HighFidelity,
        };
        let raw = self.generator.generate(&request).await?;
        let content: Chapter = parse_structured(&raw)?;
        content.validate(chapter)?;
        Ok(content)
    }

    async fn preview(&self, chapter: u32) -> PortResult<String> {
        self.generate_text(PREVIEW_PROMPT.replace("{chapter}", &chapter.to_string()))
            .await
    }

    async fn audio_script(&self, chapter: u32, title: &str) -> PortResult<String> {
        let title = if title.trim().is_empty() {
            format!("Chapter {}", chapter)
        } else {
            title.trim().to_string()
        };
        let prompt = AUDIO_SCRIPT_PROMPT
            .replace("{chapter}", &chapter.to_string())
            .replace("{title}", &title);
        self.generate_text(prompt).await
    }

    async fn verse_explanation(&self, chapter: u32, verse: &Verse) -> PortResult<String> {
        let prompt = VERSE_EXPLANATION_PROMPT
            .replace("{chapter}", &chapter.to_string())
            .replace("{verse_number}", &verse.verse_number.to_string())
            .replace("{sanskrit}", &verse.sanskrit)
            .replace("{translation}", &verse.translation);
        self.generate_text(prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedGenerator;

    const TWO_VERSES: &str = r#"{
        "chapter_number": 2,
        "title": "Janaka's Joy",
        "summary": "Janaka describes his awakening.",
        "verses": [
            { "verse_number": 1, "sanskrit": "अहो निरञ्जनः शान्तो", "translation": "I am spotless and tranquil." },
            { "verse_number": 2, "sanskrit": "यथा प्रकाशयाम्येको", "translation": "As I alone reveal this body, so I reveal the world." }
        ]
    }"#;

    fn provider(generator: ScriptedGenerator) -> (LiveProvider, Arc<ScriptedGenerator>) {
        let generator = Arc::new(generator);
        (LiveProvider::new(generator.clone()), generator)
    }

    #[tokio::test]
    async fn wisdom_declares_schema_and_creative_temperature() {
        let (live, generator) = provider(
            ScriptedGenerator::new()
                .answering(r#"{"quote": "You are free.", "explanation": "Bondage is a belief."}"#),
        );

        let wisdom = live.wisdom(4).await.unwrap();
        assert_eq!(wisdom.quote, "You are free.");

        let request = &generator.requests()[0];
        assert!(request.prompt.contains("Chapter 4"));
        assert_eq!(request.output_schema, Some(wisdom_schema()));
        assert_eq!(request.temperature, CREATIVE_TEMPERATURE);
    }

    #[tokio::test]
    async fn chapter_uses_low_temperature_and_asks_for_every_verse() {
        let (live, generator) = provider(ScriptedGenerator::new().answering(TWO_VERSES));

        let chapter = live.chapter(2).await.unwrap();
        assert_eq!(chapter.verses.len(), 2);

        let request = &generator.requests()[0];
        assert!(request.prompt.contains("EVERY SINGLE verse"));
        assert_eq!(request.temperature, FIDELITY_TEMPERATURE);
        assert_eq!(request.tier, ModelTier::HighFidelity);
        assert_eq!(request.output_schema, Some(chapter_schema()));
    }

    #[tokio::test]
    async fn fenced_json_is_accepted() {
        let fenced = format!("```json\n{}\n```", TWO_VERSES);
        let (live, _) = provider(ScriptedGenerator::new().answering(fenced));
        assert!(live.chapter(2).await.is_ok());
    }

    #[tokio::test]
    async fn chapter_with_no_verses_is_an_error() {
        let (live, _) = provider(ScriptedGenerator::new().answering(
            r#"{"chapter_number": 2, "title": "t", "summary": "s", "verses": []}"#,
        ));
        assert!(matches!(live.chapter(2).await, Err(PortError::Validation(_))));
    }

    #[tokio::test]
    async fn unparseable_wisdom_is_malformed() {
        let (live, _) = provider(ScriptedGenerator::new().answering("The Self is all."));
        assert!(matches!(
            live.wisdom(1).await,
            Err(PortError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn free_text_kinds_request_plain_text() {
        let (live, generator) = provider(
            ScriptedGenerator::new()
                .answering("A preview.")
                .answering("  A narration.  ")
                .answering("An explanation."),
        );
        let verse = Verse {
            verse_number: 3,
            sanskrit: "सत्यम्".to_string(),
            translation: "Truth.".to_string(),
        };

        assert_eq!(live.preview(9).await.unwrap(), "A preview.");
        assert_eq!(live.audio_script(9, "Detachment").await.unwrap(), "A narration.");
        assert_eq!(live.verse_explanation(9, &verse).await.unwrap(), "An explanation.");

        let requests = generator.requests();
        assert!(requests.iter().all(|r| r.output_schema.is_none()));
        assert!(requests.iter().all(|r| r.temperature == CREATIVE_TEMPERATURE));
        assert!(requests[1].prompt.contains("Detachment"));
        assert!(requests[2].prompt.contains("Truth."));
    }

    #[tokio::test]
    async fn blank_text_is_malformed() {
        let (live, _) = provider(ScriptedGenerator::new().answering("   \n"));
        assert!(matches!(
            live.preview(1).await,
            Err(PortError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn provider_errors_pass_through() {
        let (live, _) = provider(
            ScriptedGenerator::new().failing(PortError::ProviderCallFailed("quota".to_string())),
        );
        assert!(matches!(
            live.preview(1).await,
            Err(PortError::ProviderCallFailed(_))
        ));
    }
}
