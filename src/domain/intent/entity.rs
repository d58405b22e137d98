//! Intent labels and classification results

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Version marker reported when the neural classifier produced the intent
pub const NEURAL_MODEL_VERSION: &str = "v3-distilbert";

/// Version marker reported when the keyword heuristic produced the intent
pub const HEURISTIC_MODEL_VERSION: &str = "v1-heuristic";

/// Pedagogical category of a student query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Student wants a concept defined or explained
    ConceptLearning,
    /// Student is implementing something or fighting an error
    ProblemSolving,
    /// Student is preparing for an interview
    InterviewPreparation,
    /// Student wants a summary or recap
    QuickRevision,
    /// Anything else
    #[default]
    ExploratoryQuestion,
}

impl Intent {
    pub const ALL: [Intent; 5] = [
        Intent::ConceptLearning,
        Intent::ProblemSolving,
        Intent::InterviewPreparation,
        Intent::QuickRevision,
        Intent::ExploratoryQuestion,
    ];

    /// Wire label of the intent
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConceptLearning => "concept_learning",
            Self::ProblemSolving => "problem_solving",
            Self::InterviewPreparation => "interview_preparation",
            Self::QuickRevision => "quick_revision",
            Self::ExploratoryQuestion => "exploratory_question",
        }
    }

    /// Resolve a label, falling back to `ExploratoryQuestion` for unknown labels
    pub fn from_label_or_default(label: &str) -> Self {
        label.parse().unwrap_or(Self::ExploratoryQuestion)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown intent label
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown intent label: {0}")]
pub struct UnknownIntent(pub String);

impl FromStr for Intent {
    type Err = UnknownIntent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intent::ALL
            .iter()
            .copied()
            .find(|intent| intent.as_str() == s.trim())
            .ok_or_else(|| UnknownIntent(s.to_string()))
    }
}

/// Outcome of classifying one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentResult {
    intent: Intent,
    confidence: f32,
    is_confused: bool,
    model_version: String,
}

impl IntentResult {
    /// Create a new result. Confidence is clamped into `[0, 1]`; a non-finite
    /// confidence becomes `0.0`.
    pub fn new(
        intent: Intent,
        confidence: f32,
        is_confused: bool,
        model_version: impl Into<String>,
    ) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            intent,
            confidence,
            is_confused,
            model_version: model_version.into(),
        }
    }

    pub fn intent(&self) -> Intent {
        self.intent
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn is_confused(&self) -> bool {
        self.is_confused
    }

    pub fn model_version(&self) -> &str {
        &self.model_version
    }

    /// Whether the keyword heuristic produced this result
    pub fn is_heuristic(&self) -> bool {
        self.model_version == HEURISTIC_MODEL_VERSION
    }
}
