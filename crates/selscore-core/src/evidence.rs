//! Normalized evidence items produced by C7 and consumed by C8.

use crate::fusion::SkillWeights;
use crate::skill::Skill;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The recognized evidence sources. `ConfidenceAdjustment` is a fusion-only
/// weighting slot, not a real evidence source, and never appears as an
/// `Evidence::source` value; see [`FusionSource`] for the distinction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceSource {
    Model,
    LinguisticFeatures,
    BehavioralFeatures,
    TeacherObservation,
    PeerFeedback,
}

impl EvidenceSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceSource::Model => "model",
            EvidenceSource::LinguisticFeatures => "linguistic_features",
            EvidenceSource::BehavioralFeatures => "behavioral_features",
            EvidenceSource::TeacherObservation => "teacher_observation",
            EvidenceSource::PeerFeedback => "peer_feedback",
        }
    }

    /// The `FusionConfig` weight bucket this source's evidence folds into.
    /// `TeacherObservation` and `PeerFeedback` are human-reported behavioral
    /// corroboration and have no dedicated weight key, so they fold into
    /// `behavioral_features`.
    pub fn fusion_bucket(&self) -> &'static str {
        match self {
            EvidenceSource::Model => "ml_inference",
            EvidenceSource::LinguisticFeatures => "linguistic_features",
            EvidenceSource::BehavioralFeatures
            | EvidenceSource::TeacherObservation
            | EvidenceSource::PeerFeedback => "behavioral_features",
        }
    }
}

fn weight_for(source: EvidenceSource, weights: &SkillWeights) -> f64 {
    weights.get(source.fusion_bucket()).copied().unwrap_or(0.0)
}

/// A single normalized signal contributing to a fused score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub source: EvidenceSource,
    pub skill: Skill,
    /// Normalized to `[0, 1]`.
    pub normalized_score: f64,
    /// Normalized to `[0, 1]`.
    pub relevance: f64,
    /// Opaque reference used for citation (e.g. a record id or teacher
    /// observation id); not interpreted by the core.
    pub provenance: String,
    pub captured_at: DateTime<Utc>,
}

/// Top evidence selection (C7 §4.7): sort by `relevance × w_source`
/// descending, ties by `captured_at` descending, then truncate to at most
/// `limit` items.
pub fn sort_and_truncate_evidence(mut evidence: Vec<Evidence>, limit: usize, weights: &SkillWeights) -> Vec<Evidence> {
    evidence.sort_by(|a, b| {
        let rank_a = a.relevance * weight_for(a.source, weights);
        let rank_b = b.relevance * weight_for(b.source, weights);
        rank_b
            .partial_cmp(&rank_a)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.captured_at.cmp(&a.captured_at))
    });
    evidence.truncate(limit);
    evidence
}

/// Rationale evidence ranking (C8 §4.8 step 1): sort by
/// `weight × relevance × source_confidence` descending, ties by
/// `captured_at` descending. Each evidence item's `relevance` doubles as its
/// source_confidence — the normalization rules define them as the same
/// quantity for the model source, and no separate field exists to carry a
/// distinct value for the other sources.
pub fn rank_evidence_for_rationale(mut evidence: Vec<Evidence>, weights: &SkillWeights) -> Vec<Evidence> {
    evidence.sort_by(|a, b| {
        let rank_a = weight_for(a.source, weights) * a.relevance * a.relevance;
        let rank_b = weight_for(b.source, weights) * b.relevance * b.relevance;
        rank_b
            .partial_cmp(&rank_a)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.captured_at.cmp(&a.captured_at))
    });
    evidence
}
