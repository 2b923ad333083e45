//! Hot-reloadable fusion weight configuration (C4).
//!
//! The active [`FusionConfig`] lives behind an [`ArcSwap`] so readers
//! (every in-flight evidence-fusion call) never observe a partially
//! written config: a write either fully replaces the pointer or is
//! rejected by validation before the swap happens.

use arc_swap::ArcSwap;
use selscore_core::config::env;
use selscore_core::error::{Result, SelError};
use selscore_core::fusion::FusionConfig;
use std::path::PathBuf;
use std::sync::Arc;

pub struct FusionConfigStore {
    current: ArcSwap<FusionConfig>,
    path: PathBuf,
}

impl FusionConfigStore {
    /// Load the initial config from `path`, validating before it ever
    /// becomes the active config.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let config = read_and_validate(&path)?;
        Ok(Self {
            current: ArcSwap::from_pointee(config),
            path,
        })
    }

    /// Load from the path named by the `SELSCORE_FUSION_CONFIG_PATH` env
    /// var, or the default location.
    pub fn load_from_env() -> Result<Self> {
        Self::load(env::fusion_config_path())
    }

    /// The currently active config. Cheap: an `Arc` clone, no lock.
    pub fn get(&self) -> Arc<FusionConfig> {
        self.current.load_full()
    }

    /// Validate `new_config`, then swap it in. When `persist` is `true`
    /// the validated document is also written back to disk so a restart
    /// picks up the same weights. On validation failure the active
    /// config is left untouched and the error is returned verbatim.
    pub fn set(&self, new_config: FusionConfig, persist: bool) -> Result<()> {
        new_config
            .validate()
            .map_err(|err| SelError::InvalidConfig {
                field_path: err.field_path,
                message: err.message,
            })?;

        if persist {
            write_config(&self.path, &new_config)?;
        }
        self.current.store(Arc::new(new_config));
        Ok(())
    }

    /// Re-read and re-validate the config file at `self.path`, swapping
    /// it in only if the file is valid. Used to pick up an out-of-band
    /// edit (e.g. an operator editing the TOML file directly).
    pub fn reload(&self) -> Result<()> {
        let config = read_and_validate(&self.path)?;
        self.current.store(Arc::new(config));
        Ok(())
    }
}

fn read_and_validate(path: &std::path::Path) -> Result<FusionConfig> {
    let content = std::fs::read_to_string(path).map_err(|err| SelError::UpstreamUnavailable {
        source_name: "fusion_config_file".to_string(),
        message: format!("{}: {err}", path.display()),
    })?;
    let config: FusionConfig = toml::from_str(&content).map_err(|err| SelError::InvalidConfig {
        field_path: "<document>".to_string(),
        message: format!("failed to parse {}: {err}", path.display()),
    })?;
    config
        .validate()
        .map_err(|err| SelError::InvalidConfig {
            field_path: err.field_path,
            message: err.message,
        })?;
    Ok(config)
}

fn write_config(path: &std::path::Path, config: &FusionConfig) -> Result<()> {
    let serialized = toml::to_string_pretty(config).map_err(|err| {
        SelError::Internal(format!("failed to serialize fusion config: {err}"))
    })?;
    std::fs::write(path, serialized).map_err(|err| SelError::UpstreamUnavailable {
        source_name: "fusion_config_file".to_string(),
        message: format!("{}: {err}", path.display()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use selscore_core::skill::Skill;
    use std::collections::HashMap;

    fn valid_weights() -> selscore_core::fusion::SkillWeights {
        HashMap::from([
            ("ml_inference".to_string(), 0.5),
            ("linguistic_features".to_string(), 0.25),
            ("behavioral_features".to_string(), 0.15),
            ("confidence_adjustment".to_string(), 0.10),
        ])
    }

    fn valid_config() -> FusionConfig {
        FusionConfig {
            version: "1.0.0".into(),
            description: "test".into(),
            weights: Skill::ALL.iter().map(|s| (*s, valid_weights())).collect(),
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("selscore-fusion-test-{name}-{:?}.toml", std::thread::current().id()))
    }

    #[test]
    fn load_set_and_get_round_trip() {
        let path = temp_path("roundtrip");
        write_config(&path, &valid_config()).unwrap();
        let store = FusionConfigStore::load(&path).unwrap();
        assert_eq!(store.get().version, "1.0.0");

        let mut updated = valid_config();
        updated.version = "1.1.0".into();
        store.set(updated, true).unwrap();
        assert_eq!(store.get().version, "1.1.0");

        // persisted write is itself loadable.
        let reloaded = FusionConfigStore::load(&path).unwrap();
        assert_eq!(reloaded.get().version, "1.1.0");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn invalid_write_is_rejected_and_active_config_unchanged() {
        let path = temp_path("reject");
        write_config(&path, &valid_config()).unwrap();
        let store = FusionConfigStore::load(&path).unwrap();

        let mut invalid = valid_config();
        invalid.weights.remove(&Skill::Resilience);
        let err = store.set(invalid, false).unwrap_err();
        assert!(matches!(err, SelError::InvalidConfig { .. }));
        assert_eq!(store.get().version, "1.0.0");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn reload_picks_up_out_of_band_file_edit() {
        let path = temp_path("reload");
        write_config(&path, &valid_config()).unwrap();
        let store = FusionConfigStore::load(&path).unwrap();

        let mut edited = valid_config();
        edited.description = "edited out of band".into();
        write_config(&path, &edited).unwrap();

        store.reload().unwrap();
        assert_eq!(store.get().description, "edited out of band");
        let _ = std::fs::remove_file(&path);
    }
}
