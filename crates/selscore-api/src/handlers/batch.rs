//! `POST /infer/batch`: runs one skill's pipeline for up to
//! [`selscore_core::config::defaults::BATCH_MAX_IDS`] students, bounded by
//! concurrency and a shared deadline.

use crate::error::ApiError;
use crate::handlers::infer::SkillAssessment;
use crate::state::ApiState;
use axum::extract::State;
use axum::Json;
use selscore_batch::{dispatch, BatchOutcome};
use selscore_core::error::SelError;
use selscore_core::skill::Skill;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct BatchAssessmentRequest {
    pub student_ids: Vec<String>,
    pub skill: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BatchOutcomeView {
    Completed { assessment: SkillAssessment },
    Failed { category: String, message: String },
    DeadlineExceeded,
}

#[derive(Debug, Serialize)]
pub struct BatchItemView {
    pub student_id: String,
    #[serde(flatten)]
    pub outcome: BatchOutcomeView,
}

#[derive(Debug, Serialize)]
pub struct BatchAssessmentResponse {
    pub items: Vec<BatchItemView>,
}

pub async fn run_batch(
    State(state): State<ApiState>,
    Json(request): Json<BatchAssessmentRequest>,
) -> Result<Json<BatchAssessmentResponse>, ApiError> {
    let skill = Skill::parse(&request.skill).ok_or_else(|| {
        ApiError(SelError::InvalidConfig {
            field_path: "skill".to_string(),
            message: format!("unknown skill '{}'", request.skill),
        })
    })?;

    let results = dispatch(request.student_ids, state.batch_config, move |student_id| {
        let state = state.clone();
        async move { super::infer::assess_one(&state, &student_id, skill).await }
    })
    .await
    .map_err(|too_large| {
        ApiError(SelError::InvalidConfig {
            field_path: "student_ids".to_string(),
            message: format!(
                "batch of {} exceeds the {} id limit",
                too_large.requested, too_large.max_allowed
            ),
        })
    })?;

    let items = results
        .into_iter()
        .map(|item| BatchItemView {
            student_id: item.student_id,
            outcome: match item.outcome {
                BatchOutcome::Completed(assessment) => BatchOutcomeView::Completed { assessment },
                BatchOutcome::Failed(err) => BatchOutcomeView::Failed {
                    category: err.category().to_string(),
                    message: err.to_string(),
                },
                BatchOutcome::DeadlineExceeded => BatchOutcomeView::DeadlineExceeded,
            },
        })
        .collect();

    Ok(Json(BatchAssessmentResponse { items }))
}
