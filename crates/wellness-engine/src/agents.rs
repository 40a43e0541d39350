//! Domain agents: a generator plus the descriptor that shapes its result.

use std::sync::Arc;

use wellness_config::{DomainDescriptor, DomainRegistry};
use wellness_core::{Domain, GenerationError, GeneratorResult, GuidanceGenerator};

/// Most recommendations kept from one generator's output.
pub const MAX_EXTRACTED_RECOMMENDATIONS: usize = 5;

const BULLETS: [char; 3] = ['•', '-', '*'];

/// Pulls bulleted lines out of free-form guidance text.
///
/// A line qualifies when, after trimming, it starts with `•`, `-` or `*`. The
/// leading bullets and spaces are stripped and the remainder is kept only if it
/// is longer than `min_len` characters.
pub fn extract_recommendations(content: &str, min_len: usize) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with(BULLETS))
        .map(|line| line.trim_start_matches(|c: char| BULLETS.contains(&c) || c == ' '))
        .filter(|rec| !rec.is_empty() && rec.chars().count() > min_len)
        .take(MAX_EXTRACTED_RECOMMENDATIONS)
        .map(String::from)
        .collect()
}

/// One wellness domain: descriptor settings around a guidance generator.
#[derive(Clone)]
pub struct DomainAgent {
    descriptor: DomainDescriptor,
    generator: Arc<dyn GuidanceGenerator>,
}

impl std::fmt::Debug for DomainAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainAgent")
            .field("domain", &self.descriptor.domain)
            .field("name", &self.descriptor.name)
            .finish()
    }
}

impl DomainAgent {
    pub fn new(descriptor: DomainDescriptor, generator: Arc<dyn GuidanceGenerator>) -> Self {
        Self { descriptor, generator }
    }

    pub fn domain(&self) -> Domain {
        self.descriptor.domain
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn descriptor(&self) -> &DomainDescriptor {
        &self.descriptor
    }

    /// Runs the generator and packages its text as a result.
    pub async fn assess(&self, query: &str, context: &str) -> Result<GeneratorResult, GenerationError> {
        let content = self.generator.generate(query, context).await?;
        let recommendations = extract_recommendations(&content, self.descriptor.min_recommendation_len);

        Ok(GeneratorResult::new(&self.descriptor.name, content)
            .with_confidence(self.descriptor.confidence)
            .with_recommendations(recommendations))
    }
}

/// The four domain agents, one per variant.
#[derive(Debug, Clone)]
pub struct AgentSet {
    symptom: DomainAgent,
    lifestyle: DomainAgent,
    diet: DomainAgent,
    fitness: DomainAgent,
}

impl AgentSet {
    pub fn new(symptom: DomainAgent, lifestyle: DomainAgent, diet: DomainAgent, fitness: DomainAgent) -> Self {
        Self { symptom, lifestyle, diet, fitness }
    }

    /// Builds one agent per registry descriptor, using `make` to create each generator.
    pub fn from_registry<F>(registry: &DomainRegistry, mut make: F) -> Self
    where
        F: FnMut(&DomainDescriptor) -> Arc<dyn GuidanceGenerator>,
    {
        let mut agent = |domain: Domain| {
            let descriptor = registry.get(domain).clone();
            let generator = make(&descriptor);
            DomainAgent::new(descriptor, generator)
        };

        Self {
            symptom: agent(Domain::Symptom),
            lifestyle: agent(Domain::Lifestyle),
            diet: agent(Domain::Diet),
            fitness: agent(Domain::Fitness),
        }
    }

    pub fn get(&self, domain: Domain) -> &DomainAgent {
        match domain {
            Domain::Symptom => &self.symptom,
            Domain::Lifestyle => &self.lifestyle,
            Domain::Diet => &self.diet,
            Domain::Fitness => &self.fitness,
        }
    }

    /// Agents in invocation order.
    pub fn iter(&self) -> impl Iterator<Item = &DomainAgent> {
        Domain::ALL.into_iter().map(move |domain| self.get(domain))
    }
}
