//! LLM-backed guidance generation for the wellness router.
//!
//! - [`LlmClient`] — OpenAI-compatible chat completions (Groq by default)
//! - [`LlmGenerator`] — [`GuidanceGenerator`](wellness_core::GuidanceGenerator) for one domain
//!
//! # Example
//!
//! ```rust,ignore
//! use wellness_config::{AppConfig, DomainDescriptor};
//! use wellness_core::{Domain, GuidanceGenerator};
//! use wellness_llm::LlmGenerator;
//!
//! let config = AppConfig::from_env()?;
//! let generator = LlmGenerator::new(&DomainDescriptor::builtin(Domain::Diet), &config);
//! let text = generator.generate("What should I eat before a run?", "").await?;
//! ```

mod client;
mod generator;

pub use client::{LlmClient, LlmMetrics, LlmResponse};
pub use generator::LlmGenerator;
