//! End-to-end exercise of the HTTP handlers against mock collaborators: a
//! stub feature store (no real extraction backend), an in-house model
//! ensemble, and a stub LLM client. No network socket is bound; handlers
//! are invoked directly the way `axum`'s extractors would drive them.

use async_trait::async_trait;
use axum::extract::{Path, Query, State};
use axum::Json;
use selscore_api::handlers::{batch, fusion, health, infer, metrics};
use selscore_api::state::ApiState;
use selscore_core::error::Result as SelResult;
use selscore_core::features::{BehavioralFeatures, LinguisticFeatures};
use selscore_core::fusion::FusionConfig;
use selscore_core::skill::Skill;
use selscore_evidence::engine::EvidenceEngine;
use selscore_fusion_config::FusionConfigStore;
use selscore_inference::feature_store::FeatureStore;
use selscore_inference::service::InferenceService;
use selscore_metrics::InMemoryMetrics;
use selscore_models::ensemble::Ensemble;
use selscore_models::registry::{ManifestEntry, ModelRegistry};
use selscore_models::tree::{RegressionTree, TreeNode};
use selscore_ratelimit::{RateLimitConfig, RateLimiter};
use selscore_rationale::client::LlmClient;
use selscore_rationale::generator::RationaleGeneratorService;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

struct StubFeatureStore;

#[async_trait]
impl FeatureStore for StubFeatureStore {
    async fn fetch_linguistic(&self, _student_id: &str) -> SelResult<Option<LinguisticFeatures>> {
        Ok(Some(LinguisticFeatures::default()))
    }
    async fn fetch_behavioral(&self, _student_id: &str) -> SelResult<Option<BehavioralFeatures>> {
        Ok(Some(BehavioralFeatures::default()))
    }
}

struct StubLlmClient;

#[async_trait]
impl LlmClient for StubLlmClient {
    async fn complete(&self, _prompt: &str) -> SelResult<String> {
        Ok(r#"{"narrative":"Shows steady empathy in group work.","strengths":["listens well"],"growth_suggestions":["invite quieter peers in"]}"#.to_string())
    }
}

fn temp_fusion_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "selscore-api-test-{name}-{:?}.toml",
        std::thread::current().id()
    ))
}

fn equal_weights() -> HashMap<String, f64> {
    HashMap::from([
        ("ml_inference".to_string(), 0.5),
        ("linguistic_features".to_string(), 0.25),
        ("behavioral_features".to_string(), 0.15),
        ("confidence_adjustment".to_string(), 0.10),
    ])
}

fn test_registry() -> Arc<ModelRegistry> {
    let bytes_for = |skill: Skill| {
        let ensemble = Ensemble {
            members: vec![RegressionTree {
                weight: 1.0,
                root: TreeNode::Leaf { value: 0.7 },
            }],
            feature_names: selscore_core::features::feature_manifest(skill),
        };
        bincode::serialize(&ensemble).unwrap()
    };
    let manifest: Vec<ManifestEntry> = Skill::ALL
        .iter()
        .map(|s| ManifestEntry {
            skill: *s,
            version: "1.0.0".into(),
            expected_hash: selscore_models::artifact::content_hash(&bytes_for(*s)),
        })
        .collect();
    Arc::new(ModelRegistry::load(&manifest, |skill| Ok(bytes_for(skill))).unwrap())
}

fn build_state(name: &str) -> ApiState {
    let path = temp_fusion_path(name);
    let config = FusionConfig {
        version: "1.0.0".into(),
        description: "test".into(),
        weights: Skill::ALL.iter().map(|s| (*s, equal_weights())).collect(),
    };
    std::fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();
    let fusion_config = Arc::new(FusionConfigStore::load(&path).unwrap());

    let metrics: Arc<dyn selscore_metrics::MetricsBackend> = Arc::new(InMemoryMetrics::new(100));

    let inference = Arc::new(InferenceService::new(
        test_registry(),
        Arc::new(StubFeatureStore),
        Arc::clone(&metrics),
    ));

    let evidence_engine = Arc::new(EvidenceEngine::new(vec![], Arc::clone(&fusion_config)));

    let rate_limiter = Arc::new(RateLimiter::new(
        "test",
        RateLimitConfig {
            calls_per_minute: 100,
            calls_per_hour: 1000,
            burst_size: 100,
        },
    ));
    let rationale_generator = Arc::new(RationaleGeneratorService::new(
        Arc::new(StubLlmClient),
        rate_limiter,
        "default".to_string(),
    ));

    ApiState {
        inference,
        evidence_engine,
        rationale_generator,
        fusion_config,
        metrics,
        batch_config: selscore_batch::BatchConfig::default(),
        llm_key_configured: true,
    }
}

#[tokio::test]
async fn health_reports_ok() {
    let state = build_state("health");
    let response = health::health(State(state)).await;
    assert_eq!(response.0.status, "ok");
    assert_eq!(response.0.models_loaded, Skill::ALL.len());
    assert!(response.0.feature_store_reachable);
    assert!(response.0.llm_key_present);
}

#[tokio::test]
async fn single_skill_assessment_runs_the_full_pipeline() {
    let state = build_state("single-skill");
    let response = infer::assess_student_skill(
        State(state),
        Path(("student-1".to_string(), "empathy".to_string())),
    )
    .await
    .unwrap();

    assert_eq!(response.0.skill, "empathy");
    assert!(response.0.fused_score > 0.0);
    assert_eq!(response.0.rationale.narrative, "Shows steady empathy in group work.");
}

#[tokio::test]
async fn unknown_skill_is_rejected() {
    let state = build_state("unknown-skill");
    let err = infer::assess_student_skill(
        State(state),
        Path(("student-1".to_string(), "curiosity".to_string())),
    )
    .await
    .unwrap_err();
    assert_eq!(err.0.category(), "invalid_config");
}

#[tokio::test]
async fn all_skill_assessment_covers_every_skill() {
    let state = build_state("all-skills");
    let response = infer::assess_student(State(state), Path("student-2".to_string()))
        .await
        .unwrap();
    assert_eq!(response.0.assessments.len(), Skill::ALL.len());
}

#[tokio::test]
async fn batch_dispatch_runs_every_student() {
    let state = build_state("batch");
    let request = batch::BatchAssessmentRequest {
        student_ids: vec!["a".into(), "b".into(), "c".into()],
        skill: "resilience".to_string(),
    };
    let response = batch::run_batch(State(state), Json(request)).await.unwrap();
    assert_eq!(response.0.items.len(), 3);
    for item in &response.0.items {
        assert!(matches!(item.outcome, batch::BatchOutcomeView::Completed { .. }));
    }
}

#[tokio::test]
async fn fusion_weights_round_trip_through_put_and_get() {
    let state = build_state("fusion-roundtrip");
    let mut updated = (*state.fusion_config.get()).clone();
    updated.version = "2.0.0".into();

    let put_response = fusion::put_weights(State(state.clone()), Json(updated)).await.unwrap();
    assert_eq!(put_response.0.version, "2.0.0");

    let get_response = fusion::get_weights(State(state)).await;
    assert_eq!(get_response.0.version, "2.0.0");
}

#[tokio::test]
async fn per_skill_fusion_weights_round_trip() {
    let state = build_state("fusion-per-skill");
    let mut updated = equal_weights();
    *updated.get_mut("ml_inference").unwrap() = 0.7;
    *updated.get_mut("linguistic_features").unwrap() = 0.05;

    let put_response = fusion::put_skill_weights(
        State(state.clone()),
        Path("empathy".to_string()),
        Json(updated.clone()),
    )
    .await
    .unwrap();
    assert_eq!(put_response.0, updated);

    let get_response = fusion::get_skill_weights(State(state), Path("empathy".to_string()))
        .await
        .unwrap();
    assert_eq!(get_response.0, updated);
}

#[tokio::test]
async fn fusion_weights_reload_picks_up_file_edit() {
    let state = build_state("fusion-reload");
    let path = temp_fusion_path("fusion-reload");
    let mut edited = (*state.fusion_config.get()).clone();
    edited.version = "9.9.9".into();
    std::fs::write(&path, toml::to_string_pretty(&edited).unwrap()).unwrap();

    let response = fusion::reload_weights(State(state)).await.unwrap();
    assert_eq!(response.0.version, "9.9.9");
}

#[tokio::test]
async fn metrics_summary_reflects_recorded_inferences() {
    let state = build_state("metrics");
    let _ = infer::assess_student_skill(
        State(state.clone()),
        Path(("student-3".to_string(), "problem_solving".to_string())),
    )
    .await
    .unwrap();

    let summary = metrics::summary(State(state.clone())).await;
    assert_eq!(summary.0.total, 1);
    assert_eq!(summary.0.successful, 1);

    let recent = metrics::recent(State(state), Query(metrics::RecentQuery { limit: 10 })).await;
    assert_eq!(recent.0.len(), 1);
}
