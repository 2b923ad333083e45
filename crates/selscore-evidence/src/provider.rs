//! A single evidence source, collected independently of the others.

use async_trait::async_trait;
use selscore_core::error::Result;
use selscore_core::evidence::{Evidence, EvidenceSource};
use selscore_core::skill::Skill;

/// One evidence source. Each implementation owns its own normalization
/// (see `normalize.rs` for the shared helpers) and returns already-scaled
/// `Evidence` records.
#[async_trait]
pub trait EvidenceProvider: Send + Sync {
    fn source(&self) -> EvidenceSource;
    async fn collect(&self, student_id: &str, skill: Skill) -> Result<Vec<Evidence>>;
}
