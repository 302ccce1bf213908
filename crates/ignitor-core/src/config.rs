//! Global simulation settings, loaded once at process start.
//!
//! Absent fields fall back to their defaults, so a settings file only needs
//! to name what it overrides. Out-of-range values are not validated here.

use ignitor_ullage::UllageParams;
use serde::Deserialize;
use std::path::Path;

/// Policy toggles and ullage coefficients shared by every engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct IgnitorSettings {
    /// Run the ullage simulation at all.
    pub simulate_ullage: bool,
    /// Force a shutdown when the sustained-burn check fails.
    pub shutdown_when_unstable: bool,
    /// Escalate a failed sustained-burn check to part destruction.
    pub explode_when_too_unstable: bool,
    pub ullage: UllageParams,
}

impl Default for IgnitorSettings {
    fn default() -> Self {
        Self {
            simulate_ullage: true,
            shutdown_when_unstable: true,
            explode_when_too_unstable: false,
            ullage: UllageParams::default(),
        }
    }
}

/// Errors that can occur while loading settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("settings parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

impl IgnitorSettings {
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }
}
