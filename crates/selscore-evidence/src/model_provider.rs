//! Wraps the model predictor as an [`EvidenceProvider`] so a caller that
//! only needs one fused assessment (not the raw [`Prediction`] too) can
//! register it alongside the other sources and call
//! [`crate::engine::EvidenceEngine::assess`] directly.
//!
//! Callers that also need the raw prediction (e.g. to report
//! `raw_score`/`feature_importance` in an API response) should call
//! `InferenceService::infer` themselves and use
//! [`crate::engine::EvidenceEngine::assess_with_model_evidence`] instead,
//! to avoid running inference twice.

use crate::provider::EvidenceProvider;
use async_trait::async_trait;
use chrono::Utc;
use selscore_core::error::Result;
use selscore_core::evidence::{Evidence, EvidenceSource};
use selscore_core::skill::Skill;
use selscore_inference::service::InferenceService;
use std::sync::Arc;

pub struct ModelEvidenceProvider {
    inference: Arc<InferenceService>,
}

impl ModelEvidenceProvider {
    pub fn new(inference: Arc<InferenceService>) -> Self {
        Self { inference }
    }
}

#[async_trait]
impl EvidenceProvider for ModelEvidenceProvider {
    fn source(&self) -> EvidenceSource {
        EvidenceSource::Model
    }

    async fn collect(&self, student_id: &str, skill: Skill) -> Result<Vec<Evidence>> {
        let prediction = self.inference.infer(student_id, skill).await?;
        Ok(vec![Evidence {
            source: EvidenceSource::Model,
            skill,
            normalized_score: prediction.raw_score,
            relevance: prediction.confidence,
            provenance: format!("model:{}", prediction.model_version),
            captured_at: Utc::now(),
        }])
    }
}

/// Convert an already-computed [`selscore_core::prediction::Prediction`]
/// into the `Evidence::Model` item `assess_with_model_evidence` expects.
pub fn prediction_to_evidence(prediction: &selscore_core::prediction::Prediction) -> Evidence {
    Evidence {
        source: EvidenceSource::Model,
        skill: prediction.skill,
        normalized_score: prediction.raw_score,
        relevance: prediction.confidence,
        provenance: format!("model:{}", prediction.model_version),
        captured_at: Utc::now(),
    }
}
