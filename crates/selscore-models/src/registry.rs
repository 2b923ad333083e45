//! Holds one loaded [`ModelArtifact`] per skill.

use crate::artifact::ModelArtifact;
use selscore_core::error::{Result, SelError};
use selscore_core::skill::Skill;
use serde::Deserialize;
use std::collections::HashMap;

/// The manifest index: for each skill, the version and expected content
/// hash the loaded artifact bytes must match.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestEntry {
    pub skill: Skill,
    pub version: String,
    pub expected_hash: String,
}

/// A registry of loaded, verified artifacts, one per skill.
pub struct ModelRegistry {
    artifacts: HashMap<Skill, ModelArtifact>,
}

impl ModelRegistry {
    /// Load every entry in `manifest`, pairing each with its raw bytes
    /// from `bytes_for`. A missing skill or a single artifact integrity
    /// failure aborts the whole registry load: partial model coverage is
    /// never served.
    pub fn load(
        manifest: &[ManifestEntry],
        bytes_for: impl Fn(Skill) -> Result<Vec<u8>>,
    ) -> Result<Self> {
        let mut artifacts = HashMap::with_capacity(manifest.len());
        for entry in manifest {
            let bytes = bytes_for(entry.skill)?;
            let artifact = ModelArtifact::load(
                entry.skill,
                entry.version.clone(),
                &bytes,
                &entry.expected_hash,
            )?;
            artifacts.insert(entry.skill, artifact);
        }

        for skill in Skill::ALL {
            if !artifacts.contains_key(&skill) {
                return Err(SelError::FatalConfig(format!(
                    "no model artifact registered for skill {skill}"
                )));
            }
        }

        Ok(Self { artifacts })
    }

    pub fn get(&self, skill: Skill) -> Option<&ModelArtifact> {
        self.artifacts.get(&skill)
    }

    /// Number of skills with a loaded artifact, for health reporting.
    pub fn loaded_count(&self) -> usize {
        self.artifacts.len()
    }
}
