//! Shared application state threaded through every handler.

use selscore_batch::BatchConfig;
use selscore_evidence::engine::EvidenceEngine;
use selscore_fusion_config::FusionConfigStore;
use selscore_inference::service::InferenceService;
use selscore_metrics::MetricsBackend;
use selscore_rationale::generator::RationaleGeneratorService;
use std::sync::Arc;

#[derive(Clone)]
pub struct ApiState {
    pub inference: Arc<InferenceService>,
    pub evidence_engine: Arc<EvidenceEngine>,
    pub rationale_generator: Arc<RationaleGeneratorService>,
    pub fusion_config: Arc<FusionConfigStore>,
    pub metrics: Arc<dyn MetricsBackend>,
    pub batch_config: BatchConfig,
    /// Whether the LLM key was resolved at startup; `build_state` never
    /// returns at all if it wasn't, so this is always `true` once wired,
    /// but `/health` reports it explicitly per the external interface.
    pub llm_key_configured: bool,
}
