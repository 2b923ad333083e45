//! Assembles every component into one [`ApiState`], the way `main` would
//! otherwise do inline. Kept separate so `main.rs` stays a thin dispatcher.

use crate::startup::StartupLogger;
use selscore_api::state::ApiState;
use selscore_batch::BatchConfig;
use selscore_core::config::env;
use selscore_core::error::Result;
use selscore_evidence::engine::EvidenceEngine;
use selscore_fusion_config::FusionConfigStore;
use selscore_inference::feature_store::NullFeatureStore;
use selscore_inference::service::InferenceService;
use selscore_metrics::InMemoryMetrics;
use selscore_models::manifest::{load_manifest_file, read_artifact_bytes};
use selscore_models::registry::ModelRegistry;
use selscore_ratelimit::{RateLimitConfig, RateLimiter};
use selscore_rationale::client::ReqwestLlmClient;
use selscore_rationale::generator::RationaleGeneratorService;
use selscore_secrets::{names, SecretResolver};
use std::sync::Arc;

pub async fn build_state(logger: &mut StartupLogger) -> Result<ApiState> {
    logger.phase_init();

    let secrets = SecretResolver::with_env_only();
    let llm_api_key = secrets.require(names::LLM_API_KEY).await?;
    let _signing_key = secrets.require(names::WEBHOOK_SIGNING_KEY).await?;
    logger.info("secrets resolved");

    logger.phase_config();

    let fusion_config = Arc::new(FusionConfigStore::load_from_env()?);
    logger.info(&format!(
        "fusion config loaded (version {})",
        fusion_config.get().version
    ));

    let manifest = load_manifest_file(env::model_manifest_path())?;
    let registry = Arc::new(ModelRegistry::load(
        &manifest,
        read_artifact_bytes(env::model_artifact_dir()),
    )?);
    logger.info("model registry loaded");

    logger.phase_services();

    let metrics: Arc<InMemoryMetrics> = Arc::new(InMemoryMetrics::from_env());
    metrics.warn_degraded_once();
    let metrics: Arc<dyn selscore_metrics::MetricsBackend> = metrics;

    let feature_store = Arc::new(NullFeatureStore);
    logger.warning("no feature-extraction backend configured; predictions use all-zero features");

    let inference = Arc::new(InferenceService::new(
        Arc::clone(&registry),
        feature_store,
        Arc::clone(&metrics),
    ));

    let evidence_engine = Arc::new(EvidenceEngine::new(vec![], Arc::clone(&fusion_config)));

    let rate_limiter = Arc::new(RateLimiter::llm(RateLimitConfig::llm_from_env()));
    let llm_client = Arc::new(ReqwestLlmClient::new(
        env::llm_endpoint(),
        llm_api_key,
        env::llm_model(),
    ));
    let rationale_generator = Arc::new(RationaleGeneratorService::new(
        llm_client,
        rate_limiter,
        env::llm_model(),
    ));
    logger.info("rationale generator wired (LLM with template fallback)");

    let batch_config = BatchConfig::from_env();

    Ok(ApiState {
        inference,
        evidence_engine,
        rationale_generator,
        fusion_config,
        metrics,
        batch_config,
        llm_key_configured: true,
    })
}
