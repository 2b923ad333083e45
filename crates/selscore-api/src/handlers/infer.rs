//! `POST /infer/{student_id}[/{skill}]`: runs inference, fuses evidence,
//! and generates a rationale for one or all four skills.

use crate::error::ApiError;
use crate::state::ApiState;
use axum::extract::{Path, State};
use axum::Json;
use selscore_core::rationale::{Rationale, RationaleGenerator};
use selscore_core::skill::Skill;
use selscore_evidence::model_provider::prediction_to_evidence;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RationaleView {
    pub narrative: String,
    pub strengths: Vec<String>,
    pub growth_suggestions: Vec<String>,
    pub generator: String,
    pub tokens_consumed: usize,
}

impl From<Rationale> for RationaleView {
    fn from(rationale: Rationale) -> Self {
        Self {
            narrative: rationale.narrative,
            strengths: rationale.strengths,
            growth_suggestions: rationale.growth_suggestions,
            generator: match rationale.generator {
                RationaleGenerator::Llm => "llm".to_string(),
                RationaleGenerator::Template => "template".to_string(),
            },
            tokens_consumed: rationale.tokens_consumed,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SkillAssessment {
    pub skill: String,
    pub raw_score: f64,
    pub model_confidence: f64,
    pub fused_score: f64,
    pub fused_confidence: f64,
    pub degraded_fusion: bool,
    pub model_version: String,
    pub latency_ms: f64,
    pub rationale: RationaleView,
}

#[derive(Debug, Serialize)]
pub struct StudentAssessmentResponse {
    pub student_id: String,
    pub assessments: Vec<SkillAssessment>,
}

/// Run one skill's full pipeline (predict -> fuse -> generate rationale).
/// Shared by the single/all-skill handlers here and by the batch dispatcher
/// in `handlers::batch`, which needs the bare [`SelError`] to slot into
/// `selscore_batch::dispatch`'s `work` closure.
pub(crate) async fn assess_one(
    state: &ApiState,
    student_id: &str,
    skill: Skill,
) -> Result<SkillAssessment, selscore_core::error::SelError> {
    let prediction = state.inference.infer(student_id, skill).await?;
    let model_evidence = prediction_to_evidence(&prediction);

    let fused = state
        .evidence_engine
        .assess_with_model_evidence(student_id, skill, model_evidence, prediction.model_version.clone())
        .await?;

    let rationale = state
        .rationale_generator
        .generate(skill, fused.fused_score, &fused.top_evidence, &fused.weights_snapshot, student_id)
        .await;

    Ok(SkillAssessment {
        skill: skill.as_str().to_string(),
        raw_score: prediction.raw_score,
        model_confidence: prediction.confidence,
        fused_score: fused.fused_score,
        fused_confidence: fused.fused_confidence,
        degraded_fusion: fused.degraded_fusion,
        model_version: prediction.model_version,
        latency_ms: prediction.latency_ms,
        rationale: rationale.into(),
    })
}

pub async fn assess_student(
    State(state): State<ApiState>,
    Path(student_id): Path<String>,
) -> Result<Json<StudentAssessmentResponse>, ApiError> {
    let mut assessments = Vec::with_capacity(Skill::ALL.len());
    for skill in Skill::ALL {
        assessments.push(assess_one(&state, &student_id, skill).await.map_err(ApiError)?);
    }
    Ok(Json(StudentAssessmentResponse { student_id, assessments }))
}

pub async fn assess_student_skill(
    State(state): State<ApiState>,
    Path((student_id, skill_raw)): Path<(String, String)>,
) -> Result<Json<SkillAssessment>, ApiError> {
    let skill = Skill::parse(&skill_raw).ok_or_else(|| {
        ApiError(selscore_core::error::SelError::InvalidConfig {
            field_path: "skill".to_string(),
            message: format!("unknown skill '{skill_raw}'"),
        })
    })?;
    let assessment = assess_one(&state, &student_id, skill).await.map_err(ApiError)?;
    Ok(Json(assessment))
}
