//! Application router: every route, the shared state, and the
//! trace/CORS/timeout layers applied to all of them.

use crate::handlers::{batch, fusion, health, infer, metrics};
use crate::openapi::swagger_ui;
use crate::state::ApiState;
use axum::routing::{get, post, put};
use axum::Router;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

const REQUEST_TIMEOUT_SECS: u64 = 30;

pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/infer/:student_id", post(infer::assess_student))
        .route("/infer/:student_id/:skill", post(infer::assess_student_skill))
        .route("/infer/batch", post(batch::run_batch))
        .route("/fusion/weights", get(fusion::get_weights))
        .route("/fusion/weights", put(fusion::put_weights))
        .route(
            "/fusion/weights/:skill",
            get(fusion::get_skill_weights).put(fusion::put_skill_weights),
        )
        .route("/fusion/weights/reload", post(fusion::reload_weights))
        .route("/metrics", get(metrics::recent))
        .route("/metrics/summary", get(metrics::summary))
        .merge(swagger_ui())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .with_state(state)
}
