//! On-disk manifest loading: the TOML document naming each skill's model
//! version and expected content hash, plus the matching artifact bytes on
//! disk. This is the only place `ModelRegistry::load` is paired with a
//! filesystem `bytes_for` closure; the registry itself stays storage-agnostic.

use crate::registry::ManifestEntry;
use selscore_core::error::{Result, SelError};
use selscore_core::skill::Skill;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct ManifestDocument {
    models: Vec<ManifestEntry>,
}

/// Parse a manifest document (see `config/model_manifest.toml` for the
/// shape) from `path`.
pub fn load_manifest_file(path: impl AsRef<Path>) -> Result<Vec<ManifestEntry>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|err| SelError::FatalConfig(format!(
        "failed to read model manifest {}: {err}",
        path.display()
    )))?;
    let document: ManifestDocument = toml::from_str(&content).map_err(|err| SelError::FatalConfig(format!(
        "failed to parse model manifest {}: {err}",
        path.display()
    )))?;
    Ok(document.models)
}

/// Reads `{artifact_dir}/{skill}.bin`, the default artifact-file naming
/// convention a manifest entry's bytes are expected to live at. Returns a
/// closure suitable for [`crate::registry::ModelRegistry::load`]'s `bytes_for`.
pub fn read_artifact_bytes(artifact_dir: impl Into<PathBuf>) -> impl Fn(Skill) -> Result<Vec<u8>> {
    let artifact_dir = artifact_dir.into();
    move |skill: Skill| {
        let path = artifact_dir.join(format!("{}.bin", skill.as_str()));
        std::fs::read(&path).map_err(|err| SelError::FatalConfig(format!(
            "failed to read model artifact {}: {err}",
            path.display()
        )))
    }
}
