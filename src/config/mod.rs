//! Run configuration.
//!
//! A declarative document selecting which extractors to activate, plus
//! optional sections for provider settings, digest, I/O limits and the worker
//! pool. TOML and JSON documents are accepted; the format is chosen from the
//! file extension.

use crate::engine::EngineConfig;
use crate::error::{Result, RevealerError};
use crate::hashing::DigestAlgorithm;
use crate::io::IoLimits;
use crate::providers::ProviderSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

mod selection;

pub use selection::FeatureSelection;

/// Master configuration for an extraction run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevealerConfig {
    /// Extractors to activate.
    pub features: FeatureSelection,
    /// Digest used for content addresses.
    #[serde(default)]
    pub digest: DigestAlgorithm,
    /// Construction-time provider settings.
    #[serde(default)]
    pub providers: ProviderSettings,
    /// Sample read limits.
    #[serde(default)]
    pub io: IoLimits,
    /// Worker pool settings.
    #[serde(default)]
    pub engine: EngineConfig,
}

impl RevealerConfig {
    /// Loads a configuration file. `.json` files are parsed as JSON,
    /// everything else as TOML.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(RevealerError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        let content = fs::read_to_string(path).map_err(|e| {
            RevealerError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        debug!(path = %path.display(), json = is_json, "Loading configuration");

        let config = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| RevealerError::Config(format!("Invalid TOML configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| RevealerError::Config(format!("Invalid JSON configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that cannot drive a run.
    ///
    /// Unknown group or extractor names are not checked here; the registry
    /// skips those entries individually.
    pub fn validate(&self) -> Result<()> {
        if self.engine.workers == 0 {
            return Err(RevealerError::Config(
                "engine.workers must be at least 1".to_string(),
            ));
        }
        if self.providers.entropy_window == 0 {
            return Err(RevealerError::Config(
                "providers.entropy_window must be at least 1".to_string(),
            ));
        }
        if self.io.max_file_size == 0 {
            return Err(RevealerError::Config(
                "io.max_file_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of (group, name) entries requested, duplicates included.
    pub fn requested_count(&self) -> usize {
        self.features.requested_count()
    }
}
