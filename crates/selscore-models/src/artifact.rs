//! A loaded, integrity-checked model artifact: metadata plus the ensemble
//! it describes.

use crate::ensemble::{Ensemble, EnsembleOutput};
use selscore_core::error::{Result, SelError};
use selscore_core::model::ModelArtifactMeta;
use sha2::{Digest, Sha256};

/// A model ready to serve predictions for one skill.
pub struct ModelArtifact {
    pub meta: ModelArtifactMeta,
    ensemble: Ensemble,
}

impl ModelArtifact {
    /// Deserialize an artifact from `bytes`, verifying its content hash
    /// against `expected_hash` before anything else. A mismatch is always
    /// treated as fatal startup configuration, never worked around.
    pub fn load(
        skill: selscore_core::skill::Skill,
        version: String,
        bytes: &[u8],
        expected_hash: &str,
    ) -> Result<Self> {
        let actual_hash = content_hash(bytes);
        if actual_hash != expected_hash {
            return Err(SelError::ArtifactIntegrity {
                skill: skill.as_str().to_string(),
                expected: expected_hash.to_string(),
                actual: actual_hash,
            });
        }

        let ensemble: Ensemble = bincode::deserialize(bytes).map_err(|err| SelError::Internal(
            format!("failed to deserialize model artifact for {skill}: {err}"),
        ))?;

        let meta = ModelArtifactMeta {
            skill,
            version,
            content_hash: actual_hash,
            feature_manifest: ensemble.feature_names.clone(),
        };

        Ok(Self { meta, ensemble })
    }

    /// Run inference. Returns `FeatureShape` if `features.len()` does not
    /// match the artifact's manifest length.
    pub fn predict(&self, features: &[f64]) -> Result<EnsembleOutput> {
        if features.len() != self.meta.feature_len() {
            return Err(SelError::FeatureShape {
                skill: self.meta.skill.as_str().to_string(),
                expected: self.meta.feature_len(),
                actual: features.len(),
            });
        }
        Ok(self.ensemble.predict(features))
    }
}

/// Lowercase hex-encoded SHA-256 of `bytes`.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{RegressionTree, TreeNode};
    use selscore_core::skill::Skill;

    fn sample_ensemble_bytes() -> Vec<u8> {
        let ensemble = Ensemble {
            members: vec![RegressionTree {
                weight: 1.0,
                root: TreeNode::Leaf { value: 0.5 },
            }],
            feature_names: vec!["f0".to_string()],
        };
        bincode::serialize(&ensemble).unwrap()
    }

    #[test]
    fn loads_successfully_when_hash_matches() {
        let bytes = sample_ensemble_bytes();
        let hash = content_hash(&bytes);
        let artifact = ModelArtifact::load(Skill::Empathy, "1.0.0".into(), &bytes, &hash).unwrap();
        assert_eq!(artifact.meta.feature_manifest, vec!["f0".to_string()]);
    }

    #[test]
    fn rejects_mismatched_hash() {
        let bytes = sample_ensemble_bytes();
        let err = ModelArtifact::load(Skill::Empathy, "1.0.0".into(), &bytes, "deadbeef")
            .unwrap_err();
        assert!(matches!(err, SelError::ArtifactIntegrity { .. }));
    }

    #[test]
    fn predict_rejects_wrong_feature_length() {
        let bytes = sample_ensemble_bytes();
        let hash = content_hash(&bytes);
        let artifact = ModelArtifact::load(Skill::Empathy, "1.0.0".into(), &bytes, &hash).unwrap();
        let err = artifact.predict(&[0.1, 0.2]).unwrap_err();
        assert!(matches!(err, SelError::FeatureShape { .. }));
    }
}
