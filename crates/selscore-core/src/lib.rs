//! Shared data model, error taxonomy, and configuration constants for the
//! SEL skill inference engine.
//!
//! This crate has no I/O of its own: it defines the types and pure
//! calculations that every component crate builds on, so that
//! `selscore-inference`, `selscore-evidence`, `selscore-rationale`, and
//! `selscore-batch` all speak the same vocabulary.

pub mod config;
pub mod error;
pub mod evidence;
pub mod features;
pub mod fusion;
pub mod model;
pub mod prediction;
pub mod rationale;
pub mod skill;

/// Re-exports commonly used types.
pub mod prelude {
    pub use crate::config::{defaults, env, env_vars, token_budgets};
    pub use crate::error::{Result, SelError};
    pub use crate::evidence::{
        rank_evidence_for_rationale, sort_and_truncate_evidence, Evidence, EvidenceSource,
    };
    pub use crate::features::{
        derived_feature_name, derived_feature_value, feature_manifest, BehavioralFeatures,
        FeatureVector, LinguisticFeatures, FEATURE_VECTOR_LEN,
    };
    pub use crate::fusion::{
        ConfigValidationError, FusedAssessment, FusionConfig, SkillWeights, RECOGNIZED_SOURCES,
        WEIGHT_SUM_TOLERANCE,
    };
    pub use crate::model::ModelArtifactMeta;
    pub use crate::prediction::{Prediction, CONFIDENCE_MAX, CONFIDENCE_MIN};
    pub use crate::rationale::{Rationale, RationaleGenerator, LIST_MAX_ITEMS, NARRATIVE_MAX_CHARS};
    pub use crate::skill::Skill;
}
