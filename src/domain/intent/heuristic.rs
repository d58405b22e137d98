//! Keyword rules used when no trained classifier is available
//!
//! The rules are checked in order against the lower-cased query and the first
//! match wins. Every rule reports the same fixed confidence.

use super::entity::{Intent, IntentResult, HEURISTIC_MODEL_VERSION};

/// Confidence reported for every heuristic classification
pub const HEURISTIC_CONFIDENCE: f32 = 0.85;

/// Ordered intent rules; evaluated top to bottom
const INTENT_RULES: &[(Intent, &[&str])] = &[
    (Intent::ConceptLearning, &["define", "what is", "explain"]),
    (
        Intent::ProblemSolving,
        &["how to", "code for", "implement", "error", "bug"],
    ),
    (
        Intent::InterviewPreparation,
        &["interview", "question", "mock"],
    ),
    (Intent::QuickRevision, &["summary", "recap", "review"]),
];

const CONFUSION_KEYWORDS: &[&str] = &["don't understand", "im lost", "confusing", "hard"];

/// Pick an intent for an already lower-cased query
pub fn match_intent(query_lower: &str) -> Intent {
    INTENT_RULES
        .iter()
        .find(|(_, keywords)| contains_any(query_lower, keywords))
        .map(|(intent, _)| *intent)
        .unwrap_or(Intent::ExploratoryQuestion)
}

/// Whether an already lower-cased query signals that the student is confused
pub fn detect_confusion(query_lower: &str) -> bool {
    contains_any(query_lower, CONFUSION_KEYWORDS)
}

/// Classify a raw query with the keyword rules
pub fn classify(query: &str) -> IntentResult {
    let lowered = query.to_lowercase();

    IntentResult::new(
        match_intent(&lowered),
        HEURISTIC_CONFIDENCE,
        detect_confusion(&lowered),
        HEURISTIC_MODEL_VERSION,
    )
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
