//! OpenAI-compatible chat client.
//!
//! Works with OpenAI and any compatible endpoint (Groq by default).

use std::time::Instant;

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
        CreateChatCompletionResponse,
    },
    Client,
};
use tracing::{debug, info};
use wellness_core::GenerationError;

/// Token usage and timing metrics from an LLM call.
#[derive(Debug, Clone, Default)]
pub struct LlmMetrics {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub elapsed_ms: u64,
}

/// Complete response from an LLM call.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub metrics: LlmMetrics,
}

fn invalid(e: impl ToString) -> GenerationError {
    GenerationError::InvalidRequest(e.to_string())
}

fn upstream(e: impl ToString) -> GenerationError {
    GenerationError::Upstream(e.to_string())
}

/// Builds the message list: system prompt, prior context (if any), then the query.
pub(crate) fn build_messages(
    system_prompt: &str,
    context: &str,
    user_input: &str,
) -> Result<Vec<ChatCompletionRequestMessage>, GenerationError> {
    let mut messages = vec![ChatCompletionRequestMessage::System(
        ChatCompletionRequestSystemMessageArgs::default()
            .content(system_prompt)
            .build()
            .map_err(invalid)?,
    )];

    if !context.is_empty() {
        messages.push(ChatCompletionRequestMessage::System(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(format!("Previous context:\n{context}"))
                .build()
                .map_err(invalid)?,
        ));
    }

    messages.push(ChatCompletionRequestMessage::User(
        ChatCompletionRequestUserMessageArgs::default()
            .content(user_input)
            .build()
            .map_err(invalid)?,
    ));

    Ok(messages)
}

/// Extracts content and metrics from a completion response.
fn extract_response(
    response: CreateChatCompletionResponse,
    elapsed_ms: u64,
) -> Result<LlmResponse, GenerationError> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or(GenerationError::EmptyResponse)?;

    let (input_tokens, output_tokens) = response
        .usage
        .map(|u| (u.prompt_tokens, u.completion_tokens))
        .unwrap_or((0, 0));

    info!("LLM: {}ms, tokens: {}/{} (in/out)", elapsed_ms, input_tokens, output_tokens);

    Ok(LlmResponse {
        content,
        metrics: LlmMetrics { input_tokens, output_tokens, elapsed_ms },
    })
}

/// Client for OpenAI-compatible chat completion APIs.
pub struct LlmClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl LlmClient {
    /// Creates a client for `model` at `api_base`, authenticating with `api_key` when given.
    pub fn new(model: &str, api_base: &str, api_key: Option<&str>) -> Self {
        let mut config = OpenAIConfig::new().with_api_base(api_base);
        if let Some(key) = api_key {
            config = config.with_api_key(key);
        }

        Self {
            client: Client::with_config(config),
            model: model.to_string(),
        }
    }

    /// Returns the model this client targets.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends a chat request and returns the complete response.
    pub async fn chat(
        &self,
        system_prompt: &str,
        context: &str,
        user_input: &str,
        temperature: f32,
    ) -> Result<LlmResponse, GenerationError> {
        let start = Instant::now();
        let messages = build_messages(system_prompt, context, user_input)?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .temperature(temperature)
            .messages(messages)
            .build()
            .map_err(invalid)?;

        debug!("LLM: sending request to {}", self.model);
        let response = self.client.chat().create(request).await.map_err(upstream)?;
        extract_response(response, start.elapsed().as_millis() as u64)
    }
}
