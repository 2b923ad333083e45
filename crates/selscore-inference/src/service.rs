//! Feature assembly + model prediction + confidence, wired together.

use crate::confidence::calculate_confidence;
use crate::feature_store::FeatureStore;
use selscore_core::config::env;
use selscore_core::error::{Result, SelError};
use selscore_core::features::FeatureVector;
use selscore_core::prediction::Prediction;
use selscore_core::skill::Skill;
use selscore_metrics::{MetricRecord, MetricsBackend};
use selscore_models::registry::ModelRegistry;
use std::sync::Arc;
use std::time::Instant;

pub struct InferenceService {
    registry: Arc<ModelRegistry>,
    feature_store: Arc<dyn FeatureStore>,
    metrics: Arc<dyn MetricsBackend>,
}

impl InferenceService {
    pub fn new(
        registry: Arc<ModelRegistry>,
        feature_store: Arc<dyn FeatureStore>,
        metrics: Arc<dyn MetricsBackend>,
    ) -> Self {
        Self {
            registry,
            feature_store,
            metrics,
        }
    }

    /// Predict `skill` for `student_id`. Feature fetches for the
    /// linguistic and behavioral records happen concurrently; either may
    /// come back `None` (handled as all-zero features) without failing
    /// the whole call. Metrics are recorded for both outcomes.
    pub async fn infer(&self, student_id: &str, skill: Skill) -> Result<Prediction> {
        let started = Instant::now();
        let result = self.infer_inner(student_id, skill).await;
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

        self.metrics.record(MetricRecord {
            operation: format!("infer:{}", skill.as_str()),
            success: result.is_ok(),
            latency_ms,
            error_category: result.as_ref().err().map(|e| e.category().to_string()),
            recorded_at: chrono::Utc::now(),
        });

        result
    }

    async fn infer_inner(&self, student_id: &str, skill: Skill) -> Result<Prediction> {
        let artifact = self.registry.get(skill).ok_or_else(|| SelError::PredictionFailure {
            skill: skill.as_str().to_string(),
            message: "no model artifact loaded for this skill".to_string(),
        })?;

        let (linguistic, behavioral) = tokio::try_join!(
            self.feature_store.fetch_linguistic(student_id),
            self.feature_store.fetch_behavioral(student_id),
        )?;

        let started = Instant::now();
        let feature_vector =
            FeatureVector::assemble(skill, linguistic.as_ref(), behavioral.as_ref());

        let output = artifact.predict(feature_vector.as_slice())?;
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

        let confidence = calculate_confidence(
            &output.member_outputs,
            output.raw_score,
            feature_vector.completeness(),
            env::confidence_sigma_ref(),
        );

        Ok(Prediction {
            skill,
            raw_score: output.raw_score,
            confidence,
            feature_importance: output.feature_importance,
            model_version: artifact.meta.version.clone(),
            latency_ms,
        })
    }

    /// Number of skills with a loaded model artifact, for health reporting.
    pub fn models_loaded(&self) -> usize {
        self.registry.loaded_count()
    }

    /// Probe the feature store for reachability, for health reporting.
    pub async fn feature_store_reachable(&self) -> bool {
        self.feature_store.fetch_linguistic("__health_check__").await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use selscore_core::features::{BehavioralFeatures, LinguisticFeatures};
    use selscore_metrics::InMemoryMetrics;
    use selscore_models::ensemble::Ensemble;
    use selscore_models::registry::{ManifestEntry, ModelRegistry};
    use selscore_models::tree::{RegressionTree, TreeNode};

    struct StubStore {
        linguistic: Option<LinguisticFeatures>,
        behavioral: Option<BehavioralFeatures>,
    }

    #[async_trait]
    impl FeatureStore for StubStore {
        async fn fetch_linguistic(&self, _student_id: &str) -> Result<Option<LinguisticFeatures>> {
            Ok(self.linguistic)
        }
        async fn fetch_behavioral(&self, _student_id: &str) -> Result<Option<BehavioralFeatures>> {
            Ok(self.behavioral)
        }
    }

    fn ensemble_bytes() -> Vec<u8> {
        let feature_names = selscore_core::features::feature_manifest(Skill::Empathy);
        let ensemble = Ensemble {
            members: vec![RegressionTree {
                weight: 1.0,
                root: TreeNode::Leaf { value: 0.6 },
            }],
            feature_names,
        };
        bincode::serialize(&ensemble).unwrap()
    }

    fn test_registry() -> Arc<ModelRegistry> {
        let bytes = ensemble_bytes();
        let hash = selscore_models::artifact::content_hash(&bytes);
        let manifest: Vec<ManifestEntry> = Skill::ALL
            .iter()
            .map(|s| ManifestEntry {
                skill: *s,
                version: "1.0.0".into(),
                expected_hash: hash.clone(),
            })
            .collect();
        Arc::new(ModelRegistry::load(&manifest, |_| Ok(ensemble_bytes())).unwrap())
    }

    #[tokio::test]
    async fn infer_returns_well_formed_prediction() {
        let service = InferenceService::new(
            test_registry(),
            Arc::new(StubStore {
                linguistic: Some(LinguisticFeatures::default()),
                behavioral: Some(BehavioralFeatures::default()),
            }),
            Arc::new(InMemoryMetrics::new(10)),
        );
        let prediction = service.infer("student-1", Skill::Empathy).await.unwrap();
        assert!(prediction.satisfies_invariants());
    }

    #[tokio::test]
    async fn infer_handles_missing_feature_records() {
        let service = InferenceService::new(
            test_registry(),
            Arc::new(StubStore {
                linguistic: None,
                behavioral: None,
            }),
            Arc::new(InMemoryMetrics::new(10)),
        );
        let prediction = service.infer("student-2", Skill::Empathy).await.unwrap();
        assert!(prediction.satisfies_invariants());
    }

    #[tokio::test]
    async fn infer_records_metrics_on_success() {
        let metrics = Arc::new(InMemoryMetrics::new(10));
        let service = InferenceService::new(
            test_registry(),
            Arc::new(StubStore {
                linguistic: None,
                behavioral: None,
            }),
            metrics.clone(),
        );
        let _ = service.infer("student-3", Skill::Empathy).await.unwrap();
        assert_eq!(metrics.summary().total, 1);
    }
}
