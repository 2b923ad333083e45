//! The boundary between this engine and wherever raw feature records live.
//! Extraction itself is out of scope; this crate only consumes records a
//! store hands back.

use async_trait::async_trait;
use selscore_core::error::Result;
use selscore_core::features::{BehavioralFeatures, LinguisticFeatures};

/// Fetches the raw per-student records C6 assembles into a feature
/// vector. A store returning `Ok(None)` means "no record for this
/// student" (handled as all-zero features); `Err` means the store itself
/// is unavailable.
#[async_trait]
pub trait FeatureStore: Send + Sync {
    async fn fetch_linguistic(&self, student_id: &str) -> Result<Option<LinguisticFeatures>>;
    async fn fetch_behavioral(&self, student_id: &str) -> Result<Option<BehavioralFeatures>>;
}

/// Always returns "no record", falling back to all-zero features for every
/// student. Feature extraction has no bundled production backend; this is
/// what a deployment wires in until a real store is plugged in.
pub struct NullFeatureStore;

#[async_trait]
impl FeatureStore for NullFeatureStore {
    async fn fetch_linguistic(&self, _student_id: &str) -> Result<Option<LinguisticFeatures>> {
        Ok(None)
    }

    async fn fetch_behavioral(&self, _student_id: &str) -> Result<Option<BehavioralFeatures>> {
        Ok(None)
    }
}
