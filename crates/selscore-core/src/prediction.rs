//! The output of a single model prediction, before evidence fusion.

use crate::skill::Skill;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Confidence is clamped to this range; `spec.md` §3 treats 0.3 as "always
/// some residual doubt" and 0.95 as "never claim certainty".
pub const CONFIDENCE_MIN: f64 = 0.3;
pub const CONFIDENCE_MAX: f64 = 0.95;

/// Result of C5.predict + the C6 confidence calculation for one
/// `(student, skill)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub skill: Skill,
    /// Clamped to `[0, 1]`.
    pub raw_score: f64,
    /// Clamped to `[CONFIDENCE_MIN, CONFIDENCE_MAX]`.
    pub confidence: f64,
    /// Per-feature importance, normalized to sum to 1.0 over the feature
    /// set named in the active manifest.
    pub feature_importance: HashMap<String, f64>,
    pub model_version: String,
    pub latency_ms: f64,
}

impl Prediction {
    /// `true` if `raw_score` and `confidence` satisfy the invariants from
    /// `spec.md` §3/§8 (property 2). Used in tests and as a cheap runtime
    /// sanity check at the C6/C7 boundary.
    pub fn satisfies_invariants(&self) -> bool {
        (0.0..=1.0).contains(&self.raw_score)
            && (CONFIDENCE_MIN..=CONFIDENCE_MAX).contains(&self.confidence)
    }
}
