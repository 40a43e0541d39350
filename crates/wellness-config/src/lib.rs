//! Service configuration and domain descriptor registry.
//!
//! - [`AppConfig`] — Runtime settings read from environment variables
//! - [`DomainDescriptor`] — Per-domain generator settings (name, prompt, model, temperature)
//! - [`DomainRegistry`] — Built-in descriptors plus optional JSON overrides
//!
//! # Loading
//!
//! ```rust,ignore
//! use wellness_config::{AppConfig, DomainRegistry};
//!
//! let config = AppConfig::from_env()?;
//! let mut registry = DomainRegistry::with_defaults();
//! registry.load_overrides_from_dir(&config.presets_dir)?;
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use wellness_core::Domain;

/// Errors that can occur when loading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Failed to read a configuration file or directory.
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a JSON descriptor file.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A setting has an unusable value.
    #[error("Invalid value for '{key}': {message}")]
    Invalid { key: String, message: String },
}

impl ConfigError {
    /// Creates an IO error with path context.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Creates an invalid-value error.
    pub fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid { key: key.into(), message: message.into() }
    }
}

pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Runtime settings for the service.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub llm_api_base: String,
    pub llm_api_key: Option<String>,
    pub default_model: String,
    pub max_users: usize,
    pub max_messages: usize,
    pub context_window: usize,
    /// `None` disables the dispatch deadline.
    pub dispatch_timeout: Option<Duration>,
    pub presets_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
            llm_api_base: DEFAULT_API_BASE.into(),
            llm_api_key: None,
            default_model: DEFAULT_MODEL.into(),
            max_users: 100,
            max_messages: 20,
            context_window: 5,
            dispatch_timeout: Some(Duration::from_secs(30)),
            presets_dir: PathBuf::from("presets"),
        }
    }
}

impl AppConfig {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let timeout_secs: u64 = parse_or(&lookup, "DISPATCH_TIMEOUT_SECS", 30);
        let config = Self {
            host: lookup("WELLNESS_HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "WELLNESS_PORT", defaults.port),
            llm_api_base: lookup("LLM_API_BASE").unwrap_or(defaults.llm_api_base),
            llm_api_key: lookup("LLM_API_KEY").or_else(|| lookup("GROQ_API_KEY")),
            default_model: lookup("LLM_DEFAULT_MODEL").unwrap_or(defaults.default_model),
            max_users: parse_or(&lookup, "MEMORY_MAX_USERS", defaults.max_users),
            max_messages: parse_or(&lookup, "MEMORY_MAX_MESSAGES", defaults.max_messages),
            context_window: parse_or(&lookup, "MEMORY_CONTEXT_WINDOW", defaults.context_window),
            dispatch_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            presets_dir: lookup("DOMAIN_PRESETS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.presets_dir),
        };

        config.validate()?;
        Ok(config)
    }

    /// Rejects zero capacities.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_users == 0 {
            return Err(ConfigError::invalid("MEMORY_MAX_USERS", "must be at least 1"));
        }
        if self.max_messages == 0 {
            return Err(ConfigError::invalid("MEMORY_MAX_MESSAGES", "must be at least 1"));
        }
        Ok(())
    }

    /// Returns the `host:port` bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(e) => {
            warn!("Invalid value '{}' for {}: {}. Using default.", raw, key, e);
            default
        }
    }
}

const SYMPTOM_PROMPT: &str = "You are a wellness symptom assessment specialist. Your role is to:
1. Understand the user's reported symptoms
2. Provide general wellness suggestions
3. Identify when professional medical advice is needed
4. NEVER diagnose medical conditions

Format your response with:
- Symptom summary
- General wellness suggestions (3-5 items, one per line starting with \"- \")
- When to seek professional help

Always state: \"This is general wellness guidance, not medical advice.\"";

const LIFESTYLE_PROMPT: &str = "You are a lifestyle and wellness habits coach. Your expertise covers sleep hygiene, \
stress management, daily routines, mental wellness practices, and work-life balance.

When responding:
- Suggest 3-5 practical, actionable lifestyle changes
- Consider individual preferences and constraints
- Keep recommendations evidence-based

Format as:
- Current pattern analysis
- Recommended changes
- Implementation tips, one per line starting with \"- \"";

const DIET_PROMPT: &str = "You are a wellness nutritionist giving general dietary guidance. \
Provide balanced nutrition information, nutrient-rich food suggestions, and meal planning approaches.

Guidelines:
- NEVER prescribe specific medical diets
- Say when a registered dietitian is needed
- Favor whole, nutrient-dense foods and respect cultural preferences

Format as:
- Assessment of the nutritional goal
- General principles
- Specific food suggestions (5-7), one per line starting with \"- \"
- Implementation strategy";

const FITNESS_PROMPT: &str = "You are a fitness wellness coach giving general exercise guidance. \
Cover exercise principles, beginner-friendly workouts, injury prevention, and goal setting.

Guidelines:
- Start with safety considerations
- Suggest modifications for different fitness levels
- Include both cardio and strength work
- Recommend professionals for specific conditions

Format as:
- Assessment of the fitness goal
- Safety considerations
- Exercise recommendations (3-5), one per line starting with \"- \"
- Progression for weeks 1, 2, and 3";

/// Generator settings for one wellness domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainDescriptor {
    pub domain: Domain,
    /// Agent name reported on results.
    pub name: String,
    /// System prompt sent to the model.
    pub prompt: String,
    /// Model override; the service default is used when `None`.
    #[serde(default)]
    pub model: Option<String>,
    pub temperature: f32,
    /// Confidence assigned to every successful result.
    pub confidence: f64,
    /// Extracted recommendations must be longer than this many characters.
    #[serde(default)]
    pub min_recommendation_len: usize,
}

impl DomainDescriptor {
    /// Returns the built-in descriptor for a domain. Built-ins leave the
    /// model unset so the service default applies.
    pub fn builtin(domain: Domain) -> Self {
        let (name, prompt, temperature, confidence, min_len) = match domain {
            Domain::Symptom => ("Symptom Assessment", SYMPTOM_PROMPT, 0.3, 0.85, 0),
            Domain::Lifestyle => ("Lifestyle Coach", LIFESTYLE_PROMPT, 0.4, 0.82, 10),
            Domain::Diet => ("Nutrition Guide", DIET_PROMPT, 0.3, 0.80, 8),
            Domain::Fitness => ("Fitness Coach", FITNESS_PROMPT, 0.4, 0.81, 8),
        };
        Self {
            domain,
            name: name.into(),
            prompt: prompt.into(),
            model: None,
            temperature,
            confidence,
            min_recommendation_len: min_len,
        }
    }

    /// Returns the model to use, falling back to `default`.
    pub fn model_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.model.as_deref().unwrap_or(default)
    }
}

/// Partial descriptor read from a preset file.
#[derive(Debug, Clone, Deserialize)]
pub struct DescriptorOverride {
    pub domain: Domain,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub min_recommendation_len: Option<usize>,
}

impl DescriptorOverride {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(ConfigError::invalid(
                    format!("{}.temperature", self.domain),
                    format!("{} is outside 0.0..=2.0", t),
                ));
            }
        }
        if let Some(c) = self.confidence {
            if !(0.0..=1.0).contains(&c) {
                return Err(ConfigError::invalid(
                    format!("{}.confidence", self.domain),
                    format!("{} is outside 0.0..=1.0", c),
                ));
            }
        }
        Ok(())
    }
}

/// Descriptors for all four domains.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainRegistry {
    symptom: DomainDescriptor,
    lifestyle: DomainDescriptor,
    diet: DomainDescriptor,
    fitness: DomainDescriptor,
}

impl Default for DomainRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl DomainRegistry {
    /// Creates a registry with the built-in descriptors.
    pub fn with_defaults() -> Self {
        Self {
            symptom: DomainDescriptor::builtin(Domain::Symptom),
            lifestyle: DomainDescriptor::builtin(Domain::Lifestyle),
            diet: DomainDescriptor::builtin(Domain::Diet),
            fitness: DomainDescriptor::builtin(Domain::Fitness),
        }
    }

    /// Gets the descriptor for a domain.
    pub fn get(&self, domain: Domain) -> &DomainDescriptor {
        match domain {
            Domain::Symptom => &self.symptom,
            Domain::Lifestyle => &self.lifestyle,
            Domain::Diet => &self.diet,
            Domain::Fitness => &self.fitness,
        }
    }

    fn get_mut(&mut self, domain: Domain) -> &mut DomainDescriptor {
        match domain {
            Domain::Symptom => &mut self.symptom,
            Domain::Lifestyle => &mut self.lifestyle,
            Domain::Diet => &mut self.diet,
            Domain::Fitness => &mut self.fitness,
        }
    }

    /// Returns all descriptors in invocation order.
    pub fn list(&self) -> Vec<&DomainDescriptor> {
        Domain::ALL.iter().map(|d| self.get(*d)).collect()
    }

    /// Applies one override on top of the current descriptor.
    pub fn apply(&mut self, patch: DescriptorOverride) -> Result<(), ConfigError> {
        patch.validate()?;
        let target = self.get_mut(patch.domain);
        if let Some(name) = patch.name {
            target.name = name;
        }
        if let Some(prompt) = patch.prompt {
            target.prompt = prompt;
        }
        if let Some(model) = patch.model {
            target.model = Some(model);
        }
        if let Some(temperature) = patch.temperature {
            target.temperature = temperature;
        }
        if let Some(confidence) = patch.confidence {
            target.confidence = confidence;
        }
        if let Some(min_len) = patch.min_recommendation_len {
            target.min_recommendation_len = min_len;
        }
        Ok(())
    }

    /// Loads every `.json` override in `dir`. A missing directory is not an error.
    ///
    /// Returns the number of overrides applied.
    pub fn load_overrides_from_dir(&mut self, dir: &Path) -> Result<usize, ConfigError> {
        if !dir.is_dir() {
            info!("No domain presets directory at {}", dir.display());
            return Ok(0);
        }

        let entries = fs::read_dir(dir).map_err(|e| ConfigError::io(dir.display().to_string(), e))?;

        let mut paths: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        for path in &paths {
            let content = fs::read_to_string(path)
                .map_err(|e| ConfigError::io(path.display().to_string(), e))?;
            let patch: DescriptorOverride = serde_json::from_str(&content)?;
            info!("Applying {} descriptor override from {}", patch.domain, path.display());
            self.apply(patch)?;
        }

        Ok(paths.len())
    }
}
