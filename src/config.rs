use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Full attendance across the tracked raid rotation (BWL/Ony 169 + MC 126).
const DEFAULT_WEEKLY_EP_CAP: i64 = 295;

/// Active decay/award parameters for the reconciliation run.
///
/// Exactly one configuration is active at any point in the stream: the one
/// supplied at startup, until a standings file carries an embedded override
/// line, which replaces it for all subsequent comparisons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    /// Weekly decay fraction, e.g. 0.1 for a 10% decay.
    pub decay_percent: f64,
    /// GP floor the weekly decay is anchored to.
    pub base_gp: i64,
    /// Total EP obtainable in one tracked period at full attendance.
    pub weekly_ep_cap: i64,
    /// Flat caller-supplied EP adjustment added on top of the cap.
    pub ep_modifier: i64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            decay_percent: 0.1,
            base_gp: 50,
            weekly_ep_cap: DEFAULT_WEEKLY_EP_CAP,
            ep_modifier: 0,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

impl AuditConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: AuditConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse an override line embedded in a standings file.
    ///
    /// The line is a complete JSON configuration object; fields it omits take
    /// their documented defaults (replace semantics, not merge).
    pub fn from_embedded(line: &str) -> Result<Self, ConfigError> {
        let config: AuditConfig = serde_json::from_str(line)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.decay_percent) {
            return Err(ConfigError::InvalidValue(
                "decay_percent",
                format!("must be a fraction in [0, 1], got {}", self.decay_percent),
            ));
        }
        if self.base_gp < 0 {
            return Err(ConfigError::InvalidValue(
                "base_gp",
                format!("must be non-negative, got {}", self.base_gp),
            ));
        }
        if self.weekly_ep_cap < 0 {
            return Err(ConfigError::InvalidValue(
                "weekly_ep_cap",
                format!("must be non-negative, got {}", self.weekly_ep_cap),
            ));
        }
        Ok(())
    }
}
