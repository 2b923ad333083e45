//! Parallel evidence collection and skill-specific weighted fusion.

use crate::provider::EvidenceProvider;
use selscore_core::error::{Result, SelError};
use selscore_core::evidence::{sort_and_truncate_evidence, Evidence, EvidenceSource};
use selscore_core::fusion::{FusedAssessment, SkillWeights};
use selscore_core::prediction::{CONFIDENCE_MAX, CONFIDENCE_MIN};
use selscore_core::skill::Skill;
use selscore_fusion_config::FusionConfigStore;
use std::sync::Arc;

const TOP_EVIDENCE_LIMIT: usize = 10;

/// The four fusion weight buckets. `confidence_adjustment` is not an
/// evidence source; it is a synthetic bucket whose score and confidence are
/// both the model's own confidence (§4.7).
const BUCKETS: [&str; 4] = [
    "ml_inference",
    "linguistic_features",
    "behavioral_features",
    "confidence_adjustment",
];

/// Relevance-weighted average of a bucket's evidence scores.
fn bucket_score(evidence: &[Evidence]) -> Option<f64> {
    if evidence.is_empty() {
        return None;
    }
    let relevance_sum: f64 = evidence.iter().map(|e| e.relevance).sum();
    if relevance_sum <= 0.0 {
        let mean = evidence.iter().map(|e| e.normalized_score).sum::<f64>() / evidence.len() as f64;
        return Some(mean);
    }
    let weighted_sum: f64 = evidence
        .iter()
        .map(|e| e.normalized_score * e.relevance)
        .sum();
    Some(weighted_sum / relevance_sum)
}

/// Unweighted average of a bucket's per-item relevance, used as that
/// bucket's `confidence_s` term (relevance doubles as source_confidence,
/// see `selscore_core::evidence::rank_evidence_for_rationale`).
fn bucket_confidence(evidence: &[Evidence]) -> Option<f64> {
    if evidence.is_empty() {
        return None;
    }
    Some(evidence.iter().map(|e| e.relevance).sum::<f64>() / evidence.len() as f64)
}

pub struct EvidenceEngine {
    providers: Vec<Arc<dyn EvidenceProvider>>,
    fusion_config: Arc<FusionConfigStore>,
}

impl EvidenceEngine {
    pub fn new(providers: Vec<Arc<dyn EvidenceProvider>>, fusion_config: Arc<FusionConfigStore>) -> Self {
        Self {
            providers,
            fusion_config,
        }
    }

    /// Collect from every provider concurrently, isolating per-provider
    /// failures (a failed source simply contributes no evidence; it never
    /// fails the whole assessment), then fuse into one [`FusedAssessment`].
    pub async fn assess(&self, student_id: &str, skill: Skill, model_version: String) -> Result<FusedAssessment> {
        let collected = self.collect_all(student_id, skill).await;
        self.fuse_with_weights(collected, skill, model_version)
    }

    /// Same as [`Self::assess`], but folds in `model_evidence` the caller
    /// already has (typically a fresh [`selscore_core::prediction::Prediction`]
    /// converted by the caller) instead of re-running the model provider,
    /// if one happens to be registered. `self.providers` should hold only
    /// the non-model sources when this entry point is used.
    pub async fn assess_with_model_evidence(
        &self,
        student_id: &str,
        skill: Skill,
        model_evidence: Evidence,
        model_version: String,
    ) -> Result<FusedAssessment> {
        let mut collected = self.collect_all(student_id, skill).await;
        collected.push(model_evidence);
        self.fuse_with_weights(collected, skill, model_version)
    }

    async fn collect_all(&self, student_id: &str, skill: Skill) -> Vec<Evidence> {
        let futures = self.providers.iter().map(|provider| {
            let provider = Arc::clone(provider);
            let student_id = student_id.to_string();
            async move {
                match provider.collect(&student_id, skill).await {
                    Ok(evidence) => evidence,
                    Err(err) => {
                        tracing::warn!(
                            source = provider.source().as_str(),
                            error = %err,
                            "evidence source failed, continuing without it"
                        );
                        Vec::new()
                    }
                }
            }
        });

        futures::future::join_all(futures).await.into_iter().flatten().collect()
    }

    fn fuse_with_weights(&self, collected: Vec<Evidence>, skill: Skill, model_version: String) -> Result<FusedAssessment> {
        let weights = self
            .fusion_config
            .get()
            .weights_for(skill)
            .cloned()
            .ok_or_else(|| SelError::InvalidConfig {
                field_path: format!("weights.{}", skill.as_str()),
                message: "no fusion weights configured for this skill".to_string(),
            })?;

        self.fuse(collected, skill, weights, model_version)
    }

    fn fuse(
        &self,
        evidence: Vec<Evidence>,
        skill: Skill,
        weights: SkillWeights,
        model_version: String,
    ) -> Result<FusedAssessment> {
        let model_confidence = evidence
            .iter()
            .find(|e| e.source == EvidenceSource::Model)
            .map(|e| e.relevance);

        // (bucket, score_s, confidence_s). `confidence_adjustment` is
        // synthetic: present only when model evidence is present, and its
        // score/confidence are both the model's own confidence (§4.7).
        let entries: Vec<(&str, Option<f64>, Option<f64>)> = BUCKETS
            .iter()
            .map(|bucket| {
                if *bucket == "confidence_adjustment" {
                    (*bucket, model_confidence, model_confidence)
                } else {
                    let in_bucket: Vec<Evidence> = evidence
                        .iter()
                        .filter(|e| e.source.fusion_bucket() == *bucket)
                        .cloned()
                        .collect();
                    (*bucket, bucket_score(&in_bucket), bucket_confidence(&in_bucket))
                }
            })
            .collect();

        let present_weight: f64 = entries
            .iter()
            .filter(|(_, score, _)| score.is_some())
            .map(|(bucket, _, _)| weights.get(*bucket).copied().unwrap_or(0.0))
            .sum();

        if present_weight <= 0.0 {
            return Err(SelError::InsufficientEvidence {
                skill: skill.as_str().to_string(),
            });
        }

        // Redistribute any absent bucket's weight proportionally across
        // buckets that did produce evidence, for both score and confidence.
        let fused_score: f64 = entries
            .iter()
            .filter_map(|(bucket, score, _)| {
                score.map(|s| s * (weights.get(*bucket).copied().unwrap_or(0.0) / present_weight))
            })
            .sum();

        let fused_confidence: f64 = entries
            .iter()
            .filter_map(|(bucket, score, confidence)| {
                score
                    .and(confidence)
                    .map(|c| c * (weights.get(*bucket).copied().unwrap_or(0.0) / present_weight))
            })
            .sum();

        let only_model = evidence.iter().all(|e| e.source == EvidenceSource::Model);
        let top_evidence = sort_and_truncate_evidence(evidence, TOP_EVIDENCE_LIMIT, &weights);

        Ok(FusedAssessment {
            skill,
            fused_score: fused_score.clamp(0.0, 1.0),
            fused_confidence: fused_confidence.clamp(CONFIDENCE_MIN, CONFIDENCE_MAX),
            top_evidence,
            model_version,
            weights_snapshot: weights,
            degraded_fusion: only_model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;

    struct StubProvider {
        source: EvidenceSource,
        evidence: Vec<Evidence>,
        fail: bool,
    }

    #[async_trait]
    impl EvidenceProvider for StubProvider {
        fn source(&self) -> EvidenceSource {
            self.source
        }
        async fn collect(&self, _student_id: &str, _skill: Skill) -> Result<Vec<Evidence>> {
            if self.fail {
                Err(SelError::UpstreamUnavailable {
                    source_name: "stub".into(),
                    message: "boom".into(),
                })
            } else {
                Ok(self.evidence.clone())
            }
        }
    }

    fn evidence(source: EvidenceSource, score: f64, relevance: f64) -> Evidence {
        Evidence {
            source,
            skill: Skill::Empathy,
            normalized_score: score,
            relevance,
            provenance: "ref".into(),
            captured_at: Utc::now(),
        }
    }

    fn equal_weights() -> SkillWeights {
        HashMap::from([
            ("ml_inference".to_string(), 0.5),
            ("linguistic_features".to_string(), 0.25),
            ("behavioral_features".to_string(), 0.15),
            ("confidence_adjustment".to_string(), 0.10),
        ])
    }

    fn store_with(weights: SkillWeights) -> Arc<FusionConfigStore> {
        let path = std::env::temp_dir().join(format!(
            "selscore-evidence-test-{:?}.toml",
            std::thread::current().id()
        ));
        let config = selscore_core::fusion::FusionConfig {
            version: "1.0.0".into(),
            description: "test".into(),
            weights: Skill::ALL.iter().map(|s| (*s, weights.clone())).collect(),
        };
        std::fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();
        Arc::new(FusionConfigStore::load(&path).unwrap())
    }

    #[tokio::test]
    async fn fuses_all_three_buckets_present() {
        let providers: Vec<Arc<dyn EvidenceProvider>> = vec![
            Arc::new(StubProvider {
                source: EvidenceSource::Model,
                evidence: vec![evidence(EvidenceSource::Model, 0.8, 1.0)],
                fail: false,
            }),
            Arc::new(StubProvider {
                source: EvidenceSource::LinguisticFeatures,
                evidence: vec![evidence(EvidenceSource::LinguisticFeatures, 0.6, 1.0)],
                fail: false,
            }),
            Arc::new(StubProvider {
                source: EvidenceSource::BehavioralFeatures,
                evidence: vec![evidence(EvidenceSource::BehavioralFeatures, 0.4, 1.0)],
                fail: false,
            }),
        ];
        let engine = EvidenceEngine::new(providers, store_with(equal_weights()));
        let assessment = engine.assess("s1", Skill::Empathy, "1.0.0".into()).await.unwrap();
        assert!(!assessment.degraded_fusion);
        assert!(assessment.fused_score > 0.0 && assessment.fused_score < 1.0);
    }

    #[tokio::test]
    async fn degrades_when_only_model_evidence_present() {
        let providers: Vec<Arc<dyn EvidenceProvider>> = vec![Arc::new(StubProvider {
            source: EvidenceSource::Model,
            evidence: vec![evidence(EvidenceSource::Model, 0.8, 1.0)],
            fail: false,
        })];
        let engine = EvidenceEngine::new(providers, store_with(equal_weights()));
        let assessment = engine.assess("s1", Skill::Empathy, "1.0.0".into()).await.unwrap();
        assert!(assessment.degraded_fusion);
        // Only ml_inference (0.5) and confidence_adjustment (0.10) are
        // present; their weight is renormalized over just the two of them.
        // score = (0.8*0.5 + 1.0*0.10) / 0.6
        assert!((assessment.fused_score - (5.0 / 6.0)).abs() < 1e-9);
    }

    #[tokio::test]
    async fn degraded_fusion_confidence_passes_through_model_confidence_exactly() {
        let providers: Vec<Arc<dyn EvidenceProvider>> = vec![Arc::new(StubProvider {
            source: EvidenceSource::Model,
            evidence: vec![evidence(EvidenceSource::Model, 0.8, 0.73)],
            fail: false,
        })];
        let engine = EvidenceEngine::new(providers, store_with(equal_weights()));
        let assessment = engine.assess("s1", Skill::Empathy, "1.0.0".into()).await.unwrap();
        assert!(assessment.degraded_fusion);
        assert!((assessment.fused_confidence - 0.73).abs() < 1e-9);
    }

    #[tokio::test]
    async fn failed_source_does_not_fail_the_whole_assessment() {
        let providers: Vec<Arc<dyn EvidenceProvider>> = vec![
            Arc::new(StubProvider {
                source: EvidenceSource::Model,
                evidence: vec![evidence(EvidenceSource::Model, 0.8, 1.0)],
                fail: false,
            }),
            Arc::new(StubProvider {
                source: EvidenceSource::LinguisticFeatures,
                evidence: vec![],
                fail: true,
            }),
        ];
        let engine = EvidenceEngine::new(providers, store_with(equal_weights()));
        let assessment = engine.assess("s1", Skill::Empathy, "1.0.0".into()).await.unwrap();
        assert!(assessment.degraded_fusion);
    }

    #[tokio::test]
    async fn no_evidence_at_all_is_insufficient_evidence_error() {
        let engine = EvidenceEngine::new(vec![], store_with(equal_weights()));
        let err = engine.assess("s1", Skill::Empathy, "1.0.0".into()).await.unwrap_err();
        assert!(matches!(err, SelError::InsufficientEvidence { .. }));
    }
}
