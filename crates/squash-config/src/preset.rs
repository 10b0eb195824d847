//! Preset file format and operations.

use serde::{Deserialize, Serialize};
use squash_dynamics::EffectSettings;
use std::path::Path;

use crate::error::ConfigError;
use crate::validation::validate_settings;

/// A named compressor or limiter setting.
///
/// # TOML Format
///
/// ```toml
/// name = "Vocal Leveler"
/// description = "Smooth 3:1 leveling for spoken word"
///
/// [settings]
/// type = "compressor"
/// threshold_db = -18.0
/// makeup_gain_db = 4.0
/// compression_ratio = 3.0
/// ```
///
/// Fields missing from `[settings]` take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Effect settings.
    #[serde(default)]
    pub settings: EffectSettings,
}

impl Preset {
    /// Create a preset with default compressor settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            settings: EffectSettings::default(),
        }
    }

    /// Create a preset with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replace the preset's settings.
    pub fn with_settings(mut self, settings: impl Into<EffectSettings>) -> Self {
        self.settings = settings.into();
        self
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let preset: Preset = toml::from_str(&content)?;
        Ok(preset)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check the settings against their parameter ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_settings(&self.settings)?;
        Ok(())
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
