//! Factory presets bundled with squash.
//!
//! Always available without external files; useful starting points for
//! common compression and limiting jobs.

use crate::{ConfigError, Preset};

/// Array of factory preset names for external access.
pub static FACTORY_PRESET_NAMES: &[&str] = &[
    "init",
    "vocal_leveler",
    "drum_bus",
    "gentle_glue",
    "mastering_limiter",
    "brickwall",
];

/// TOML content for factory presets, embedded at compile time.
static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("init", INIT_PRESET),
    ("vocal_leveler", VOCAL_LEVELER_PRESET),
    ("drum_bus", DRUM_BUS_PRESET),
    ("gentle_glue", GENTLE_GLUE_PRESET),
    ("mastering_limiter", MASTERING_LIMITER_PRESET),
    ("brickwall", BRICKWALL_PRESET),
];

/// Default compressor.
const INIT_PRESET: &str = r#"
name = "Init"
description = "Default compressor settings"

[settings]
type = "compressor"
"#;

/// Smooth leveling for voice.
const VOCAL_LEVELER_PRESET: &str = r#"
name = "Vocal Leveler"
description = "Smooth 3:1 leveling for spoken word and vocals"

[settings]
type = "compressor"
threshold_db = -22.0
makeup_gain_db = 5.0
knee_width_db = 8.0
compression_ratio = 3.0
lookahead_ms = 2.0
attack_ms = 15.0
release_ms = 180.0
"#;

/// Punchy drum bus.
const DRUM_BUS_PRESET: &str = r#"
name = "Drum Bus"
description = "Fast 4:1 compression that keeps transients"

[settings]
type = "compressor"
threshold_db = -18.0
makeup_gain_db = 3.0
knee_width_db = 3.0
compression_ratio = 4.0
lookahead_ms = 0.0
attack_ms = 10.0
release_ms = 80.0
"#;

/// Light mix-bus glue.
const GENTLE_GLUE_PRESET: &str = r#"
name = "Gentle Glue"
description = "Low-ratio bus compression with a wide knee"

[settings]
type = "compressor"
threshold_db = -12.0
makeup_gain_db = 1.0
knee_width_db = 12.0
compression_ratio = 1.5
lookahead_ms = 1.0
attack_ms = 30.0
release_ms = 300.0
"#;

/// Transparent final-stage limiting.
const MASTERING_LIMITER_PRESET: &str = r#"
name = "Mastering Limiter"
description = "Transparent peak control with a -1 dBFS ceiling"

[settings]
type = "limiter"
threshold_db = -6.0
makeup_target_db = -1.0
knee_width_db = 2.0
lookahead_ms = 5.0
release_ms = 60.0
"#;

/// Hard ceiling, no knee.
const BRICKWALL_PRESET: &str = r#"
name = "Brickwall"
description = "Hard-knee limiter holding peaks at -0.3 dBFS"

[settings]
type = "limiter"
threshold_db = -3.0
makeup_target_db = -0.3
knee_width_db = 0.0
lookahead_ms = 3.0
release_ms = 20.0
"#;

/// Get all factory presets.
///
/// # Example
///
/// ```rust
/// use squash_config::factory_presets;
///
/// for preset in factory_presets() {
///     println!("  - {}: {}", preset.name, preset.description.as_deref().unwrap_or(""));
/// }
/// ```
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| Preset::from_toml(toml).ok())
        .collect()
}

/// Get a factory preset by identifier or display name, case-insensitively.
///
/// ```rust
/// use squash_config::get_factory_preset;
///
/// assert!(get_factory_preset("brickwall").is_some());
/// assert!(get_factory_preset("Vocal Leveler").is_some());
/// assert!(get_factory_preset("fuzz").is_none());
/// ```
pub fn get_factory_preset(name: &str) -> Option<Preset> {
    let name_lower = name.to_lowercase();

    for (preset_name, toml) in FACTORY_PRESETS_TOML {
        if preset_name.to_lowercase() == name_lower {
            return Preset::from_toml(toml).ok();
        }
    }

    factory_presets()
        .into_iter()
        .find(|preset| preset.name.to_lowercase() == name_lower)
}

/// Like [`get_factory_preset`], but a missing preset is an error.
///
/// ```rust
/// use squash_config::{ConfigError, factory_preset};
///
/// assert_eq!(factory_preset("drum_bus").unwrap().name, "Drum Bus");
/// assert!(matches!(factory_preset("fuzz"), Err(ConfigError::PresetNotFound(_))));
/// ```
pub fn factory_preset(name: &str) -> Result<Preset, ConfigError> {
    get_factory_preset(name).ok_or_else(|| ConfigError::PresetNotFound(name.to_string()))
}

/// Get the identifiers of all factory presets.
pub fn factory_preset_names() -> Vec<&'static str> {
    FACTORY_PRESETS_TOML.iter().map(|(name, _)| *name).collect()
}

/// Check if a name matches any factory preset (case-insensitive).
pub fn is_factory_preset(name: &str) -> bool {
    get_factory_preset(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_factory_presets_parse() {
        for (name, toml) in FACTORY_PRESETS_TOML {
            let result = Preset::from_toml(toml);
            assert!(result.is_ok(), "factory preset '{}' failed: {:?}", name, result.err());
        }
        assert_eq!(factory_presets().len(), FACTORY_PRESETS_TOML.len());
    }

    #[test]
    fn test_all_factory_presets_validate() {
        for preset in factory_presets() {
            assert!(preset.validate().is_ok(), "'{}' out of range", preset.name);
        }
    }

    #[test]
    fn test_names_match_table() {
        assert_eq!(factory_preset_names(), FACTORY_PRESET_NAMES.to_vec());
    }

    #[test]
    fn test_missing_factory_preset_is_an_error() {
        match factory_preset("brickwall-9000") {
            Err(ConfigError::PresetNotFound(name)) => assert_eq!(name, "brickwall-9000"),
            other => panic!("expected PresetNotFound, got {other:?}"),
        }
        assert!(factory_preset("Gentle Glue").is_ok());
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert!(is_factory_preset("BRICKWALL"));
        assert!(is_factory_preset("mastering limiter"));
        assert!(!is_factory_preset("my_custom_preset"));
        assert!(get_factory_preset("drum_bus").unwrap().settings.kind() == "compressor");
        assert!(get_factory_preset("Mastering_Limiter").unwrap().settings.is_limiter());
    }
}
