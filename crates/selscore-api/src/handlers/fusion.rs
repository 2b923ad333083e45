//! `/fusion/weights`: read and hot-reload the active fusion configuration,
//! whole or one skill at a time.

use crate::error::ApiError;
use crate::state::ApiState;
use axum::extract::{Path, State};
use axum::Json;
use selscore_core::error::SelError;
use selscore_core::fusion::{FusionConfig, SkillWeights};
use selscore_core::skill::Skill;

pub async fn get_weights(State(state): State<ApiState>) -> Json<FusionConfig> {
    Json((*state.fusion_config.get()).clone())
}

pub async fn put_weights(
    State(state): State<ApiState>,
    Json(config): Json<FusionConfig>,
) -> Result<Json<FusionConfig>, ApiError> {
    state.fusion_config.set(config, true).map_err(ApiError)?;
    Ok(Json((*state.fusion_config.get()).clone()))
}

fn parse_skill(skill_raw: &str) -> Result<Skill, ApiError> {
    Skill::parse(skill_raw).ok_or_else(|| {
        ApiError(SelError::InvalidConfig {
            field_path: "skill".to_string(),
            message: format!("unknown skill '{skill_raw}'"),
        })
    })
}

pub async fn get_skill_weights(
    State(state): State<ApiState>,
    Path(skill_raw): Path<String>,
) -> Result<Json<SkillWeights>, ApiError> {
    let skill = parse_skill(&skill_raw)?;
    let config = state.fusion_config.get();
    let weights = config.weights_for(skill).cloned().ok_or_else(|| {
        ApiError(SelError::InvalidConfig {
            field_path: format!("weights.{skill_raw}"),
            message: "missing weights for skill".to_string(),
        })
    })?;
    Ok(Json(weights))
}

/// Replace one skill's weight map, leaving the rest of the config untouched.
pub async fn put_skill_weights(
    State(state): State<ApiState>,
    Path(skill_raw): Path<String>,
    Json(weights): Json<SkillWeights>,
) -> Result<Json<SkillWeights>, ApiError> {
    let skill = parse_skill(&skill_raw)?;
    let mut config = (*state.fusion_config.get()).clone();
    config.weights.insert(skill, weights);
    state.fusion_config.set(config, true).map_err(ApiError)?;
    let updated = state.fusion_config.get().weights_for(skill).cloned().expect("just inserted");
    Ok(Json(updated))
}

pub async fn reload_weights(State(state): State<ApiState>) -> Result<Json<FusionConfig>, ApiError> {
    state.fusion_config.reload().map_err(ApiError)?;
    Ok(Json((*state.fusion_config.get()).clone()))
}
