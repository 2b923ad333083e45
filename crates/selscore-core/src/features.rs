//! The 26-dimensional feature vector and the raw per-source records it is
//! assembled from.

use crate::skill::Skill;
use serde::{Deserialize, Serialize};

/// Ordered names of the 16 linguistic fields, in manifest order.
pub const LINGUISTIC_FIELDS: [&str; 16] = [
    "empathy_markers",
    "problem_solving_language",
    "perseverance_indicators",
    "social_processes",
    "cognitive_processes",
    "positive_sentiment",
    "negative_sentiment",
    "avg_sentence_length",
    "syntactic_complexity",
    "word_count",
    "unique_word_count",
    "readability_score",
    "noun_count",
    "verb_count",
    "adj_count",
    "adv_count",
];

/// Ordered names of the 9 behavioral fields, in manifest order.
pub const BEHAVIORAL_FIELDS: [&str; 9] = [
    "task_completion_rate",
    "time_efficiency",
    "retry_count",
    "recovery_rate",
    "distraction_resistance",
    "focus_duration",
    "collaboration_indicators",
    "leadership_indicators",
    "event_count",
];

/// Total feature vector length: 16 linguistic + 9 behavioral + 1 derived.
pub const FEATURE_VECTOR_LEN: usize = LINGUISTIC_FIELDS.len() + BEHAVIORAL_FIELDS.len() + 1;

/// Raw linguistic feature record for one student, as produced by feature
/// extraction (out of scope here; this crate only consumes it).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct LinguisticFeatures {
    pub empathy_markers: f64,
    pub problem_solving_language: f64,
    pub perseverance_indicators: f64,
    pub social_processes: f64,
    pub cognitive_processes: f64,
    pub positive_sentiment: f64,
    pub negative_sentiment: f64,
    pub avg_sentence_length: f64,
    pub syntactic_complexity: f64,
    pub word_count: f64,
    pub unique_word_count: f64,
    pub readability_score: f64,
    pub noun_count: f64,
    pub verb_count: f64,
    pub adj_count: f64,
    pub adv_count: f64,
}

impl LinguisticFeatures {
    /// Field values in manifest order, matching [`LINGUISTIC_FIELDS`].
    pub fn ordered_values(&self) -> [f64; 16] {
        [
            self.empathy_markers,
            self.problem_solving_language,
            self.perseverance_indicators,
            self.social_processes,
            self.cognitive_processes,
            self.positive_sentiment,
            self.negative_sentiment,
            self.avg_sentence_length,
            self.syntactic_complexity,
            self.word_count,
            self.unique_word_count,
            self.readability_score,
            self.noun_count,
            self.verb_count,
            self.adj_count,
            self.adv_count,
        ]
    }
}

/// Raw behavioral feature record for one student.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BehavioralFeatures {
    pub task_completion_rate: f64,
    pub time_efficiency: f64,
    pub retry_count: f64,
    pub recovery_rate: f64,
    pub distraction_resistance: f64,
    pub focus_duration: f64,
    pub collaboration_indicators: f64,
    pub leadership_indicators: f64,
    pub event_count: f64,
}

impl BehavioralFeatures {
    /// Field values in manifest order, matching [`BEHAVIORAL_FIELDS`].
    pub fn ordered_values(&self) -> [f64; 9] {
        [
            self.task_completion_rate,
            self.time_efficiency,
            self.retry_count,
            self.recovery_rate,
            self.distraction_resistance,
            self.focus_duration,
            self.collaboration_indicators,
            self.leadership_indicators,
            self.event_count,
        ]
    }
}

/// A single skill-specific derived feature formula, expressed as a table
/// entry rather than an open-coded branch (see DESIGN.md).
struct DerivedFeature {
    skill: Skill,
    name: &'static str,
    formula: fn(&LinguisticFeatures, &BehavioralFeatures) -> f64,
}

const DERIVED_FEATURES: [DerivedFeature; 4] = [
    DerivedFeature {
        skill: Skill::Empathy,
        name: "empathy_sentiment_social_product",
        formula: |ling, _beh| ling.positive_sentiment * ling.social_processes,
    },
    DerivedFeature {
        skill: Skill::ProblemSolving,
        name: "problem_solving_cognitive_product",
        formula: |ling, _beh| ling.problem_solving_language * ling.cognitive_processes,
    },
    DerivedFeature {
        skill: Skill::SelfRegulation,
        name: "self_regulation_recovery_focus_product",
        formula: |_ling, beh| beh.recovery_rate * beh.distraction_resistance,
    },
    DerivedFeature {
        skill: Skill::Resilience,
        name: "resilience_perseverance_recovery_product",
        formula: |ling, beh| ling.perseverance_indicators * beh.recovery_rate,
    },
];

/// Name of the derived feature for a skill (the 26th manifest entry).
pub fn derived_feature_name(skill: Skill) -> &'static str {
    DERIVED_FEATURES
        .iter()
        .find(|d| d.skill == skill)
        .map(|d| d.name)
        .expect("every skill has a derived feature entry")
}

/// Compute the skill-specific derived feature value from the raw records.
pub fn derived_feature_value(
    skill: Skill,
    linguistic: &LinguisticFeatures,
    behavioral: &BehavioralFeatures,
) -> f64 {
    let entry = DERIVED_FEATURES
        .iter()
        .find(|d| d.skill == skill)
        .expect("every skill has a derived feature entry");
    (entry.formula)(linguistic, behavioral)
}

/// The ordered manifest of feature names for a skill: 16 linguistic + 9
/// behavioral + 1 derived, always in this order.
pub fn feature_manifest(skill: Skill) -> Vec<String> {
    let mut names: Vec<String> = LINGUISTIC_FIELDS.iter().map(|s| s.to_string()).collect();
    names.extend(BEHAVIORAL_FIELDS.iter().map(|s| s.to_string()));
    names.push(derived_feature_name(skill).to_string());
    names
}

/// A dense, ordered 26-dimensional numeric feature vector.
///
/// Missing inputs are represented as `0.0` ("no signal"), never `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    /// Assemble the feature vector for `skill` from raw records. Either
    /// record may be absent (feature-store miss); absent fields become
    /// `0.0`.
    pub fn assemble(
        skill: Skill,
        linguistic: Option<&LinguisticFeatures>,
        behavioral: Option<&BehavioralFeatures>,
    ) -> Self {
        let ling = linguistic.copied().unwrap_or_default();
        let beh = behavioral.copied().unwrap_or_default();

        let mut values = Vec::with_capacity(FEATURE_VECTOR_LEN);
        values.extend(ling.ordered_values());
        values.extend(beh.ordered_values());
        values.push(derived_feature_value(skill, &ling, &beh));

        debug_assert_eq!(values.len(), FEATURE_VECTOR_LEN);
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Fraction of features that are non-zero, clipped to `[0, 1]`.
    ///
    /// Used directly by the confidence calculation's completeness subscore.
    pub fn completeness(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let nonzero = self.values.iter().filter(|v| **v != 0.0).count();
        (nonzero as f64 / self.values.len() as f64).clamp(0.0, 1.0)
    }
}
