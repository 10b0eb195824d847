//! Configuration and preset management for squash.
//!
//! # Features
//!
//! - **Presets**: load and save named settings as TOML
//! - **Parameters**: edit settings from `key=value` strings
//! - **Validation**: check every parameter against its range
//! - **Factory Presets**: built-in compressor and limiter settings
//!
//! # Example
//!
//! ```rust,no_run
//! use squash_config::{Preset, get_factory_preset, set_param};
//!
//! let mut preset = get_factory_preset("vocal_leveler").unwrap();
//! set_param(&mut preset.settings, "threshold", "-26").unwrap();
//! preset.name = "Quieter Vocal Leveler".to_string();
//! preset.validate().unwrap();
//! preset.save("presets/quiet_vocals.toml").unwrap();
//!
//! let loaded = Preset::load("presets/quiet_vocals.toml").unwrap();
//! assert_eq!(loaded, preset);
//! ```

mod error;
mod preset;

/// Named parameter access and parsing.
pub mod params;

/// Settings validation.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use error::ConfigError;
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_preset, factory_preset_names, factory_presets,
    get_factory_preset, is_factory_preset,
};
pub use params::{
    COMPRESSOR_PARAMS, LIMITER_PARAMS, ParamSpec, default_settings, get_param, param_specs,
    parse_override, parse_param_value, set_param,
};
pub use preset::Preset;
pub use validation::{ValidationError, ValidationResult, validate_settings};
