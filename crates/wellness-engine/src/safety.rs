//! Emergency-language screening.
//!
//! Two independent checks run on each request. The pre-check looks at every
//! query before classification; the gate looks only at symptom queries, with a
//! longer phrase list.

use wellness_core::Intent;

/// Phrases that force an emergency response for symptom queries.
pub const CRITICAL_SYMPTOMS: &[&str] = &[
    "chest pain",
    "difficulty breathing",
    "severe bleeding",
    "loss of consciousness",
    "seizure",
    "suicidal",
    "self-harm",
    "harm myself",
];

/// Phrases that force an emergency response regardless of intent.
pub const EMERGENCY_PHRASES: &[&str] = &["chest pain", "can't breathe", "suicidal"];

/// Warning attached when the symptom gate trips.
pub const CRITICAL_WARNING: &str = "CRITICAL: Seek emergency medical care immediately (911)";

/// Guidance returned when the pre-check trips.
pub const EMERGENCY_GUIDANCE: &str = "CRITICAL: Seek emergency medical help immediately (911)";

/// Warning returned when the pre-check trips.
pub const EMERGENCY_WARNING: &str = "EMERGENCY REQUIRED";

/// Outcome of the symptom gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SafetyVerdict {
    Safe,
    Unsafe {
        warning: &'static str,
        matched: &'static str,
    },
}

impl SafetyVerdict {
    pub fn is_safe(&self) -> bool {
        matches!(self, SafetyVerdict::Safe)
    }

    pub fn warning(&self) -> Option<&'static str> {
        match self {
            SafetyVerdict::Safe => None,
            SafetyVerdict::Unsafe { warning, .. } => Some(warning),
        }
    }
}

fn normalize(text: &str) -> String {
    text.to_lowercase().replace('\u{2019}', "'")
}

fn first_match(text: &str, phrases: &[&'static str]) -> Option<&'static str> {
    let normalized = normalize(text);
    phrases.iter().copied().find(|phrase| normalized.contains(phrase))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SafetyGate;

impl SafetyGate {
    pub fn new() -> Self {
        Self
    }

    /// Screens symptom queries for critical phrases. Other intents always pass.
    pub fn check(&self, intent: Intent, text: &str) -> SafetyVerdict {
        if intent != Intent::Symptom {
            return SafetyVerdict::Safe;
        }
        match first_match(text, CRITICAL_SYMPTOMS) {
            Some(matched) => SafetyVerdict::Unsafe { warning: CRITICAL_WARNING, matched },
            None => SafetyVerdict::Safe,
        }
    }

    /// Returns the matched phrase if the raw text needs an immediate emergency response.
    pub fn emergency_precheck(&self, text: &str) -> Option<&'static str> {
        first_match(text, EMERGENCY_PHRASES)
    }
}
