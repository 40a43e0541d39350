//! Guidance generator backed by an OpenAI-compatible model.

use async_trait::async_trait;
use tracing::info;
use wellness_config::{AppConfig, DomainDescriptor};
use wellness_core::{Domain, GenerationError, GuidanceGenerator};

use crate::client::LlmClient;

/// Generates guidance for one domain using its descriptor's prompt, model, and temperature.
pub struct LlmGenerator {
    domain: Domain,
    client: LlmClient,
    prompt: String,
    temperature: f32,
}

impl LlmGenerator {
    /// Creates a generator for `descriptor` against the configured endpoint.
    pub fn new(descriptor: &DomainDescriptor, config: &AppConfig) -> Self {
        let model = descriptor.model_or(&config.default_model);
        Self {
            domain: descriptor.domain,
            client: LlmClient::new(model, &config.llm_api_base, config.llm_api_key.as_deref()),
            prompt: descriptor.prompt.clone(),
            temperature: descriptor.temperature,
        }
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }
}

#[async_trait]
impl GuidanceGenerator for LlmGenerator {
    async fn generate(&self, query: &str, context: &str) -> Result<String, GenerationError> {
        info!("{} generator: calling {}", self.domain, self.client.model());
        let response = self
            .client
            .chat(&self.prompt, context, query, self.temperature)
            .await?;
        Ok(response.content)
    }
}
