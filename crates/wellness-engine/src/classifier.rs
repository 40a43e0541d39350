//! Keyword-scored intent classification.

use wellness_core::Intent;

const SYMPTOM_KEYWORDS: &[&str] = &[
    "symptom", "ache", "pain", "tired", "fatigue", "sick", "illness", "feel", "hurt", "sore",
    "dizzy", "nausea", "cough", "fever", "headache",
];

const LIFESTYLE_KEYWORDS: &[&str] = &[
    "sleep", "stress", "anxiety", "routine", "habit", "relax", "tired", "fatigue", "meditation",
    "work-life", "balance", "energy", "mood", "mental",
];

const DIET_KEYWORDS: &[&str] = &[
    "food", "eat", "diet", "nutrition", "meal", "cook", "recipe", "calorie", "protein", "healthy",
    "weight", "appetite", "digest", "stomach",
];

const FITNESS_KEYWORDS: &[&str] = &[
    "exercise", "workout", "gym", "run", "walk", "strength", "cardio", "fit", "activity", "sport",
    "train", "muscle", "flexibility", "endurance",
];

/// Scores queries against per-intent keyword lists.
///
/// Matching is substring-based on the lowercased text, so "eat" also matches
/// "great" and "fit" matches "benefit". Each keyword counts at most once.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    fn keywords(intent: Intent) -> &'static [&'static str] {
        match intent {
            Intent::Symptom => SYMPTOM_KEYWORDS,
            Intent::Lifestyle => LIFESTYLE_KEYWORDS,
            Intent::Diet => DIET_KEYWORDS,
            Intent::Fitness => FITNESS_KEYWORDS,
            Intent::General => &[],
        }
    }

    /// Per-intent keyword hit counts, in declaration order. `General` is omitted.
    pub fn scores(&self, text: &str) -> Vec<(Intent, usize)> {
        let lowered = text.to_lowercase();
        Intent::ALL
            .into_iter()
            .filter(|intent| *intent != Intent::General)
            .map(|intent| {
                let hits = Self::keywords(intent)
                    .iter()
                    .filter(|kw| lowered.contains(*kw))
                    .count();
                (intent, hits)
            })
            .collect()
    }

    /// Picks the intent with the strictly greatest score. Ties go to the
    /// earlier-declared intent; no hits at all yields `General`.
    pub fn classify(&self, text: &str) -> Intent {
        let mut best = (Intent::General, 0);
        for (intent, score) in self.scores(text) {
            if score > best.1 {
                best = (intent, score);
            }
        }
        best.0
    }
}
