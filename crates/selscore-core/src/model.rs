//! Model artifact identity shared between C4/C5/C6 without pulling the
//! full predictor (which lives in `selscore-models`) into `selscore-core`.

use crate::skill::Skill;
use serde::{Deserialize, Serialize};

/// Metadata describing one loaded model artifact: which skill it predicts,
/// its version, the content hash it was verified against, and the feature
/// names it expects, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifactMeta {
    pub skill: Skill,
    pub version: String,
    /// Lowercase hex-encoded SHA-256 of the artifact bytes.
    pub content_hash: String,
    /// Feature names in the exact order the predictor expects them.
    pub feature_manifest: Vec<String>,
}

impl ModelArtifactMeta {
    pub fn feature_len(&self) -> usize {
        self.feature_manifest.len()
    }
}
