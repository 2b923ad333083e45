//! A weighted ensemble of regression trees and the prediction it produces.
//!
//! There is no gradient-boosted-tree training/inference crate among this
//! workspace's dependencies, so the ensemble representation and evaluator
//! are implemented directly: each member is a small decision tree trained
//! offline (outside this crate's scope) and serialized with `bincode`,
//! then summed here at inference time the way a GBDT's boosted rounds
//! would be.

use crate::tree::RegressionTree;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A trained set of regression trees for one skill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ensemble {
    pub members: Vec<RegressionTree>,
    /// Feature names in the order the trees index into, mirroring
    /// `ModelArtifactMeta::feature_manifest`.
    pub feature_names: Vec<String>,
}

/// One prediction pass over the ensemble: the summed score plus enough
/// detail for the confidence calculation and feature-importance report.
#[derive(Debug, Clone)]
pub struct EnsembleOutput {
    /// Clamped to `[0, 1]`.
    pub raw_score: f64,
    /// Normalized to sum to 1.0 (or empty if no splits were visited).
    pub feature_importance: HashMap<String, f64>,
    /// Each member's individual (weighted) contribution, used by the
    /// confidence calculation's variance subscore.
    pub member_outputs: Vec<f64>,
}

impl Ensemble {
    /// Run every member over `features` and combine. `features.len()` must
    /// equal `self.feature_names.len()`; callers check this at the
    /// `selscore-inference` boundary and raise `FeatureShape` otherwise.
    pub fn predict(&self, features: &[f64]) -> EnsembleOutput {
        let mut member_outputs = Vec::with_capacity(self.members.len());
        let mut visit_counts: HashMap<usize, usize> = HashMap::new();
        let mut total_visits = 0usize;

        for tree in &self.members {
            let (value, visited) = tree.evaluate(features);
            member_outputs.push(value);
            for index in visited {
                *visit_counts.entry(index).or_insert(0) += 1;
                total_visits += 1;
            }
        }

        let raw_score = member_outputs.iter().sum::<f64>().clamp(0.0, 1.0);

        let feature_importance = if total_visits == 0 {
            HashMap::new()
        } else {
            visit_counts
                .into_iter()
                .filter_map(|(index, count)| {
                    self.feature_names.get(index).map(|name| {
                        (name.clone(), count as f64 / total_visits as f64)
                    })
                })
                .collect()
        };

        EnsembleOutput {
            raw_score,
            feature_importance,
            member_outputs,
        }
    }
}
