//! services/api/src/adapters/content_llm.rs
//!
//! This module contains the adapter for the content-generating LLM.
//! It implements the `GenerationService` port from the `core` crate.

const SYSTEM_INSTRUCTIONS: &str = "You are a careful scholar of the Ashtavakra Gita. Stay faithful to the traditional text, write in clear modern English, and never invent verses. When a JSON schema is given, answer with a single JSON document that matches it exactly.";

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat, ResponseFormatJsonSchema,
    },
    Client,
};
use async_trait::async_trait;
use gita_core::ports::{
    GenerationRequest, GenerationService, ModelTier, OutputSchema, PortError, PortResult,
};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `GenerationService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiContentAdapter {
    client: Client<OpenAIConfig>,
    content_model: String,
    chapter_model: String,
}

impl OpenAiContentAdapter {
    /// Creates a new `OpenAiContentAdapter`.
    ///
    /// `chapter_model` serves high-fidelity requests; `content_model` serves the rest.
    pub fn new(client: Client<OpenAIConfig>, content_model: String, chapter_model: String) -> Self {
        Self {
            client,
            content_model,
            chapter_model,
        }
    }

    fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Standard => &self.content_model,
            ModelTier::HighFidelity => &self.chapter_model,
        }
    }
}

/// Translates a declared output schema into OpenAI's strict JSON-schema response format.
fn response_format(schema: &OutputSchema) -> ResponseFormat {
    ResponseFormat::JsonSchema {
        json_schema: ResponseFormatJsonSchema {
            description: Some(schema.description.to_string()),
            name: schema.name.to_string(),
            schema: Some(schema.schema.clone()),
            strict: Some(true),
        },
    }
}

//=========================================================================================
// `GenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl GenerationService for OpenAiContentAdapter {
    async fn generate(&self, request: &GenerationRequest) -> PortResult<String> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(request.prompt.as_str())
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model_for(request.tier))
            .messages(messages)
            .temperature(request.temperature.clamp(0.0, 1.0))
            .n(1);
        if let Some(schema) = &request.output_schema {
            args.response_format(response_format(schema));
        }
        let chat_request = args
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .map_err(|e: OpenAIError| PortError::ProviderCallFailed(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::MalformedResponse(
                    "Content LLM response contained no text content.".to_string(),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gita_core::provider::live::{chapter_schema, wisdom_schema};

    fn adapter() -> OpenAiContentAdapter {
        let client = Client::with_config(OpenAIConfig::new().with_api_key("test-key"));
        OpenAiContentAdapter::new(client, "small".to_string(), "large".to_string())
    }

    #[test]
    fn chapter_requests_use_the_fidelity_model() {
        let adapter = adapter();
        assert_eq!(adapter.model_for(ModelTier::HighFidelity), "large");
        assert_eq!(adapter.model_for(ModelTier::Standard), "small");
    }

    #[test]
    fn schemas_become_strict_json_schema_formats() {
        for schema in [wisdom_schema(), chapter_schema()] {
            match response_format(&schema) {
                ResponseFormat::JsonSchema { json_schema } => {
                    assert_eq!(json_schema.name, schema.name);
                    assert_eq!(json_schema.strict, Some(true));
                    assert_eq!(json_schema.schema, Some(schema.schema.clone()));
                }
                other => panic!("unexpected response format: {:?}", other),
            }
        }
    }
}
