//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use clap::Args;
use squash_config::{Preset, default_settings, factory_preset, set_param, validate_settings};
use squash_dynamics::EffectSettings;
use std::path::PathBuf;

/// Where the effect settings come from, plus per-parameter overrides.
#[derive(Args, Debug)]
pub struct SettingsArgs {
    /// Preset file (TOML)
    #[arg(short, long, conflicts_with_all = ["factory", "effect"])]
    pub preset: Option<PathBuf>,

    /// Factory preset name (see `squash presets`)
    #[arg(short, long, conflicts_with = "effect")]
    pub factory: Option<String>,

    /// Effect with default settings: compressor or limiter
    #[arg(short, long)]
    pub effect: Option<String>,

    /// Parameter override (e.g., "threshold=-24", "ratio=4:1")
    #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
    pub param: Vec<(String, String)>,
}

impl SettingsArgs {
    /// Resolve the settings and apply every `--param` override.
    ///
    /// Without a source the default compressor is used.
    pub fn resolve(&self) -> anyhow::Result<(String, EffectSettings)> {
        let (name, mut settings) = if let Some(path) = &self.preset {
            let preset = Preset::load(path)?;
            (preset.name, preset.settings)
        } else if let Some(name) = &self.factory {
            let preset = factory_preset(name)
                .context("use 'squash presets' to see available presets")?;
            (preset.name, preset.settings)
        } else {
            let effect = self.effect.as_deref().unwrap_or("compressor");
            (effect.to_string(), default_settings(effect)?)
        };

        for (key, value) in &self.param {
            set_param(&mut settings, key, value)?;
        }
        validate_settings(&settings)?;

        tracing::debug!(name = %name, ?settings, "settings resolved");
        Ok((name, settings))
    }
}

/// Parse a `key=value` string for clap's `value_parser`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let parts: Vec<&str> = s.splitn(2, '=').collect();
    if parts.len() != 2 {
        return Err(format!(
            "Invalid parameter format: '{}' (expected key=value)",
            s
        ));
    }
    Ok((parts[0].trim().to_string(), parts[1].trim().to_string()))
}

/// Format a linear peak as dBFS.
pub fn peak_dbfs(peak: f32) -> String {
    format!("{:.1} dBFS", squash_core::linear_to_db(peak))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(effect: Option<&str>, params: &[(&str, &str)]) -> SettingsArgs {
        SettingsArgs {
            preset: None,
            factory: None,
            effect: effect.map(str::to_string),
            param: params
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("ratio=4:1").unwrap(),
            ("ratio".to_string(), "4:1".to_string())
        );
        assert_eq!(
            parse_key_val("a=b=c").unwrap(),
            ("a".to_string(), "b=c".to_string())
        );
        assert!(parse_key_val("threshold").is_err());
    }

    #[test]
    fn test_resolve_defaults_to_compressor() {
        let (name, settings) = args(None, &[]).resolve().unwrap();
        assert_eq!(name, "compressor");
        assert_eq!(settings, EffectSettings::default());
    }

    #[test]
    fn test_resolve_applies_overrides() {
        let (_, settings) = args(Some("limiter"), &[("threshold", "-9dB")])
            .resolve()
            .unwrap();
        assert!(settings.is_limiter());
        assert_eq!(settings.processor_settings().in_compression_thresh_db, -9.0);
    }

    #[test]
    fn test_resolve_rejects_bad_input() {
        assert!(args(Some("gate"), &[]).resolve().is_err());
        assert!(args(None, &[("ratio", "loud")]).resolve().is_err());
        assert!(args(None, &[("release", "999999")]).resolve().is_err());

        let missing = SettingsArgs {
            factory: Some("no_such_preset".to_string()),
            ..args(None, &[])
        };
        assert!(missing.resolve().is_err());
    }
}
