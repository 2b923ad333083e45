//! Fusion weights, the fusion config document, and the fused result type.

use crate::evidence::Evidence;
use crate::skill::Skill;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The fixed, recognized set of fusion source keys. Any other key in a
/// config document is a validation failure.
pub const RECOGNIZED_SOURCES: [&str; 4] = [
    "ml_inference",
    "linguistic_features",
    "behavioral_features",
    "confidence_adjustment",
];

/// Weight tolerance for the "sums to 1.0" invariant.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Per-skill source -> weight map.
pub type SkillWeights = HashMap<String, f64>;

/// A complete, validated fusion configuration: one weight map per skill,
/// plus a version and description for change tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionConfig {
    pub version: String,
    pub description: String,
    pub weights: HashMap<Skill, SkillWeights>,
}

/// Why a fusion config failed validation, with a field path for the error
/// response (`spec.md` §4.4).
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    pub field_path: String,
    pub message: String,
}

impl FusionConfig {
    /// Validate the four rules from `spec.md` §4.4. Returns the first
    /// violation found; the caller's existing config is retained on error.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for skill in Skill::ALL {
            let weights = self.weights.get(&skill).ok_or_else(|| ConfigValidationError {
                field_path: format!("weights.{}", skill.as_str()),
                message: "missing weights for required skill".to_string(),
            })?;

            let mut keys: Vec<&str> = weights.keys().map(|s| s.as_str()).collect();
            keys.sort_unstable();
            let mut expected = RECOGNIZED_SOURCES;
            expected.sort_unstable();
            if keys != expected {
                return Err(ConfigValidationError {
                    field_path: format!("weights.{}", skill.as_str()),
                    message: format!(
                        "source keys must be exactly {:?}, got {:?}",
                        expected, keys
                    ),
                });
            }

            let mut sum = 0.0;
            for (source, weight) in weights {
                if !(0.0..=1.0).contains(weight) {
                    return Err(ConfigValidationError {
                        field_path: format!("weights.{}.{}", skill.as_str(), source),
                        message: format!("weight {} not in [0, 1]", weight),
                    });
                }
                sum += weight;
            }
            if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
                return Err(ConfigValidationError {
                    field_path: format!("weights.{}", skill.as_str()),
                    message: format!("weights sum to {}, expected 1.0 +/- {}", sum, WEIGHT_SUM_TOLERANCE),
                });
            }
        }
        Ok(())
    }

    /// The weights for one skill, if present.
    pub fn weights_for(&self, skill: Skill) -> Option<&SkillWeights> {
        self.weights.get(&skill)
    }
}

/// The outcome of C7: a fused score + confidence for one skill, with the
/// evidence that justified it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusedAssessment {
    pub skill: Skill,
    /// In `[0, 1]`.
    pub fused_score: f64,
    /// In `[CONFIDENCE_MIN, CONFIDENCE_MAX]`.
    pub fused_confidence: f64,
    /// At most 10 items, sorted by relevance descending, ties by
    /// `captured_at` descending.
    pub top_evidence: Vec<Evidence>,
    pub model_version: String,
    /// The weight map actually used to produce this result, captured for
    /// audit/debugging even after a later hot reload changes the active
    /// config.
    pub weights_snapshot: SkillWeights,
    /// `true` when only the model source contributed evidence.
    pub degraded_fusion: bool,
}
