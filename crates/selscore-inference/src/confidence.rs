//! The confidence calculation: a weighted blend of ensemble agreement,
//! prediction extremity, and feature completeness.

use selscore_core::config::{defaults, env};
use selscore_core::prediction::{CONFIDENCE_MAX, CONFIDENCE_MIN};

/// Blend weights for one branch of the calculation.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceWeights {
    pub variance: f64,
    pub extremity: f64,
    pub completeness: f64,
}

impl ConfidenceWeights {
    /// Reads the operator-overridable weights (`SELSCORE_CONFIDENCE_WEIGHT_*`),
    /// falling back to `spec.md`'s defaults when unset.
    pub fn ordinary() -> Self {
        Self {
            variance: env::confidence_weight_variance(),
            extremity: env::confidence_weight_extremity(),
            completeness: env::confidence_weight_completeness(),
        }
    }

    /// Used when the ensemble has at most one effective member: variance
    /// is undefined, so it is weighted down in favor of extremity.
    pub fn degenerate() -> Self {
        Self {
            variance: defaults::DEGENERATE_WEIGHT_VARIANCE,
            extremity: defaults::DEGENERATE_WEIGHT_EXTREMITY,
            completeness: defaults::DEGENERATE_WEIGHT_COMPLETENESS,
        }
    }
}

fn population_std_dev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Compute confidence in `[CONFIDENCE_MIN, CONFIDENCE_MAX]` from ensemble
/// member outputs, the combined raw score, feature completeness, and the
/// reference standard deviation used to normalize ensemble agreement.
pub fn calculate_confidence(
    member_outputs: &[f64],
    raw_score: f64,
    feature_completeness: f64,
    sigma_ref: f64,
) -> f64 {
    let std_dev = if member_outputs.len() < 2 {
        0.0
    } else {
        population_std_dev(member_outputs)
    };

    let (weights, variance_component) = if std_dev < 1e-6 {
        // No agreement signal available (too few members, or an ensemble
        // that agrees exactly): treat as neutral rather than penalizing or
        // rewarding the degenerate case.
        (ConfidenceWeights::degenerate(), 0.5)
    } else {
        let agreement = (1.0 - (std_dev / sigma_ref).min(1.0)).clamp(0.0, 1.0);
        (ConfidenceWeights::ordinary(), agreement)
    };

    let extremity_component = ((raw_score - 0.5).abs() * 2.0).clamp(0.0, 1.0);
    let completeness_component = feature_completeness.clamp(0.0, 1.0);

    let blended = weights.variance * variance_component
        + weights.extremity * extremity_component
        + weights.completeness * completeness_component;

    blended.clamp(CONFIDENCE_MIN, CONFIDENCE_MAX)
}
