//! Turns generator results into one guidance document and a recommendation list.

use std::collections::HashSet;
use std::fmt::Write as _;

use tracing::debug;
use wellness_core::{Domain, GeneratorResult, Intent, SynthesizedResponse, DISCLAIMER};

/// Results below this confidence are dropped, unless that would drop all of them.
pub const MIN_CONFIDENCE: f64 = 0.65;
/// Results at or below this confidence are left out of the general overview.
pub const GENERAL_CONFIDENCE: f64 = 0.7;
pub const PRIMARY_RECOMMENDATION_LIMIT: usize = 7;
pub const GENERAL_RECOMMENDATION_LIMIT: usize = 6;
pub const GENERAL_EXCERPT_CHARS: usize = 200;
pub const GENERAL_MAX_SECTIONS: usize = 4;
pub const WRAP_WIDTH: usize = 80;
/// Recommendations sharing this many leading characters (case-insensitive) are duplicates.
pub const DEDUP_PREFIX_CHARS: usize = 50;

/// Collects recommendations across results in order, skipping near-duplicates.
pub fn unify_recommendations(results: &[GeneratorResult], limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut unified = Vec::new();

    for rec in results.iter().flat_map(|r| r.recommendations.iter()) {
        if unified.len() >= limit {
            break;
        }
        let key: String = rec.to_lowercase().chars().take(DEDUP_PREFIX_CHARS).collect();
        if seen.insert(key) {
            unified.push(rec.clone());
        }
    }

    unified
}

/// Fixed guidance used when no generator produced anything.
pub fn fallback_guidance(intent: Intent) -> &'static str {
    match intent {
        Intent::Symptom => "Unable to assess symptoms at this time. Please consult a healthcare provider.",
        Intent::Lifestyle => "Unable to provide lifestyle guidance. Consider consulting a wellness coach.",
        Intent::Diet => "Unable to provide nutrition guidance. Consult a registered dietitian.",
        Intent::Fitness => "Unable to provide fitness guidance. Consult a fitness professional.",
        Intent::General => "Unable to process your query. Please rephrase and try again.",
    }
}

/// First `max_chars` characters of `content` with "..." appended, collapsed
/// onto single spaces and wrapped.
fn excerpt(content: &str, max_chars: usize) -> String {
    let mut text: String = content.chars().take(max_chars).collect();
    text.push_str("...");
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    textwrap::fill(&normalized, WRAP_WIDTH)
}

#[derive(Debug, Clone, Copy)]
enum RecStyle {
    Numbered,
    Bulleted,
}

/// Section layout for a single-domain response.
#[derive(Debug, Clone, Copy)]
struct Template {
    heading: &'static str,
    framing: &'static str,
    excerpt_title: &'static str,
    excerpt_chars: usize,
    recs_title: &'static str,
    recs_limit: usize,
    recs_style: RecStyle,
    closing_title: &'static str,
    closing: &'static str,
}

impl Template {
    fn for_domain(domain: Domain) -> Self {
        match domain {
            Domain::Symptom => Template {
                heading: "Symptom Assessment",
                framing: "Your concern",
                excerpt_title: "Initial Assessment",
                excerpt_chars: 300,
                recs_title: "Key Recommendations",
                recs_limit: 4,
                recs_style: RecStyle::Numbered,
                closing_title: "Important Note",
                closing: "This is general wellness perspective. If symptoms persist, worsen, or are severe, please consult a healthcare provider.",
            },
            Domain::Lifestyle => Template {
                heading: "Lifestyle & Wellness Guidance",
                framing: "Your question",
                excerpt_title: "Recommended Approach",
                excerpt_chars: 250,
                recs_title: "Action Items",
                recs_limit: 5,
                recs_style: RecStyle::Bulleted,
                closing_title: "Implementation Strategy",
                closing: "Start with 1-2 recommendations that resonate most with you. Build momentum gradually.",
            },
            Domain::Diet => Template {
                heading: "Nutrition & Diet Guidance",
                framing: "Your question",
                excerpt_title: "Nutritional Perspective",
                excerpt_chars: 250,
                recs_title: "Food Suggestions",
                recs_limit: 5,
                recs_style: RecStyle::Bulleted,
                closing_title: "Dietary Note",
                closing: "For specific medical dietary needs, consult a registered dietitian.",
            },
            Domain::Fitness => Template {
                heading: "Fitness & Exercise Guidance",
                framing: "Your question",
                excerpt_title: "Exercise Recommendation",
                excerpt_chars: 250,
                recs_title: "Suggested Activities",
                recs_limit: 5,
                recs_style: RecStyle::Bulleted,
                closing_title: "Safety Note",
                closing: "Start gradually and listen to your body. Stop if you experience pain. Consult healthcare provider before starting new programs.",
            },
        }
    }

    fn render(&self, query: &str, primary: &GeneratorResult) -> String {
        let mut doc = String::new();
        let _ = writeln!(doc, "## {}\n", self.heading);
        let _ = writeln!(doc, "**{}:** {}\n", self.framing, query);
        let _ = writeln!(doc, "**{}:**", self.excerpt_title);
        let _ = writeln!(doc, "{}\n", excerpt(&primary.content, self.excerpt_chars));
        let _ = writeln!(doc, "**{}:**", self.recs_title);

        for (i, rec) in primary.recommendations.iter().take(self.recs_limit).enumerate() {
            match self.recs_style {
                RecStyle::Numbered => {
                    let _ = write!(doc, "\n{}. {}", i + 1, rec);
                }
                RecStyle::Bulleted => {
                    let _ = write!(doc, "\n• {}", rec);
                }
            }
        }

        let _ = writeln!(doc, "\n\n**{}:**", self.closing_title);
        doc.push_str(self.closing);
        doc.push('\n');
        doc
    }
}

fn render_general(query: &str, results: &[GeneratorResult]) -> String {
    let mut doc = String::new();
    let _ = writeln!(doc, "## Comprehensive Wellness Perspective\n");
    let _ = writeln!(doc, "**Your question:** {}\n", query);
    let _ = writeln!(doc, "**Multi-Dimensional Assessment:**");

    for result in results
        .iter()
        .take(GENERAL_MAX_SECTIONS)
        .filter(|r| r.confidence > GENERAL_CONFIDENCE)
    {
        let _ = write!(
            doc,
            "\n\n**{}:**\n{}",
            result.agent_name,
            excerpt(&result.content, GENERAL_EXCERPT_CHARS)
        );
    }

    doc.push_str("\n\n**Integrated Recommendations:**\n");
    for (i, rec) in unify_recommendations(results, GENERAL_RECOMMENDATION_LIMIT).iter().enumerate() {
        let _ = write!(doc, "\n{}. {}", i + 1, rec);
    }
    doc
}

/// Builds the final response from whatever results the dispatcher collected.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseSynthesizer;

impl ResponseSynthesizer {
    pub fn new() -> Self {
        Self
    }

    /// Keeps results at or above [`MIN_CONFIDENCE`], or all of them if none qualify.
    pub fn filter_confident(results: Vec<GeneratorResult>) -> Vec<GeneratorResult> {
        if results.iter().any(|r| r.confidence >= MIN_CONFIDENCE) {
            results.into_iter().filter(|r| r.confidence >= MIN_CONFIDENCE).collect()
        } else {
            results
        }
    }

    /// Renders the guidance document for `intent`. The first result is the primary one.
    pub fn guidance(&self, intent: Intent, query: &str, results: &[GeneratorResult]) -> String {
        let Some(primary) = results.first() else {
            return fallback_guidance(intent).to_string();
        };

        match intent.domain() {
            Some(domain) => Template::for_domain(domain).render(query, primary),
            None => render_general(query, results),
        }
    }

    pub fn synthesize(
        &self,
        user_id: &str,
        query: &str,
        intent: Intent,
        results: Vec<GeneratorResult>,
    ) -> SynthesizedResponse {
        let received = results.len();
        let results = Self::filter_confident(results);
        debug!("SYNTHESIZER: {} of {} result(s) kept for {}", results.len(), received, intent);

        let synthesized_guidance = self.guidance(intent, query, &results);
        let primary_recommendations = unify_recommendations(&results, PRIMARY_RECOMMENDATION_LIMIT);

        SynthesizedResponse {
            user_id: user_id.to_string(),
            query: query.to_string(),
            intent,
            agent_responses: results,
            synthesized_guidance,
            primary_recommendations,
            disclaimer: DISCLAIMER.to_string(),
            warning: None,
            requires_emergency: false,
        }
    }
}
