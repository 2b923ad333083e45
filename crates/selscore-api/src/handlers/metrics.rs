//! `GET /metrics` (recent entries) and `GET /metrics/summary` (aggregates).

use crate::state::ApiState;
use axum::extract::{Query, State};
use axum::Json;
use selscore_metrics::{MetricRecord, MetricsSummary};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

pub async fn recent(State(state): State<ApiState>, Query(query): Query<RecentQuery>) -> Json<Vec<MetricRecord>> {
    Json(state.metrics.recent(query.limit))
}

pub async fn summary(State(state): State<ApiState>) -> Json<MetricsSummary> {
    Json(state.metrics.summary())
}
