//! `GET /health`: dependency liveness (spec.md §6) — feature store
//! reachability, metrics backend, models-loaded count, and LLM key
//! presence, not just a bare process-alive probe.

use crate::state::ApiState;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub feature_store_reachable: bool,
    pub metrics_backend_reachable: bool,
    pub models_loaded: usize,
    pub llm_key_present: bool,
}

pub async fn health(State(state): State<ApiState>) -> Json<HealthResponse> {
    let feature_store_reachable = state.inference.feature_store_reachable().await;
    let models_loaded = state.inference.models_loaded();
    // In-process, no network hop of its own: reachable as long as it can
    // be called at all.
    let _ = state.metrics.summary();
    let metrics_backend_reachable = true;

    let status = if feature_store_reachable && models_loaded > 0 && state.llm_key_configured {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        feature_store_reachable,
        metrics_backend_reachable,
        models_loaded,
        llm_key_present: state.llm_key_configured,
    })
}
