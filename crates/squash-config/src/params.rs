//! Named parameter access for settings.
//!
//! Gives every compressor and limiter field a stable key and a valid range,
//! so settings can be edited from `key=value` strings (command line
//! overrides) and checked by [`validation`](crate::validation).
//!
//! | Key | Compressor range | Limiter range |
//! |-----|------------------|---------------|
//! | `threshold` | -60 to 0 dB | -30 to 0 dB |
//! | `makeup` | -30 to 30 dB | |
//! | `makeup_target` | | -30 to 0 dB |
//! | `knee` | 0 to 30 dB | 0 to 10 dB |
//! | `ratio` | 1 to 100 | |
//! | `lookahead` | 0 to 1000 ms | 0 to 50 ms |
//! | `attack` | 0 to 1000 ms | |
//! | `release` | 0 to 1000 ms | 0 to 1000 ms |

use squash_dynamics::{CompressorSettings, EffectSettings, LimiterSettings};

use crate::validation::{ValidationError, ValidationResult};

/// Key, unit and range of one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    /// Key used in `key=value` overrides.
    pub key: &'static str,
    /// Display unit (`"dB"`, `"ms"` or `""`).
    pub unit: &'static str,
    /// Minimum allowed value.
    pub min: f32,
    /// Maximum allowed value.
    pub max: f32,
}

const fn spec(key: &'static str, unit: &'static str, min: f32, max: f32) -> ParamSpec {
    ParamSpec { key, unit, min, max }
}

/// Compressor parameters in display order.
pub static COMPRESSOR_PARAMS: &[ParamSpec] = &[
    spec("threshold", "dB", -60.0, 0.0),
    spec("makeup", "dB", -30.0, 30.0),
    spec("knee", "dB", 0.0, 30.0),
    spec("ratio", "", 1.0, 100.0),
    spec("lookahead", "ms", 0.0, 1000.0),
    spec("attack", "ms", 0.0, 1000.0),
    spec("release", "ms", 0.0, 1000.0),
];

/// Limiter parameters in display order.
pub static LIMITER_PARAMS: &[ParamSpec] = &[
    spec("threshold", "dB", -30.0, 0.0),
    spec("makeup_target", "dB", -30.0, 0.0),
    spec("knee", "dB", 0.0, 10.0),
    spec("lookahead", "ms", 0.0, 50.0),
    spec("release", "ms", 0.0, 1000.0),
];

/// Parameter table for the variant of `settings`.
pub fn param_specs(settings: &EffectSettings) -> &'static [ParamSpec] {
    match settings {
        EffectSettings::Compressor(_) => COMPRESSOR_PARAMS,
        EffectSettings::Limiter(_) => LIMITER_PARAMS,
    }
}

/// Default settings for an effect type name (`"compressor"` or `"limiter"`).
pub fn default_settings(effect: &str) -> ValidationResult<EffectSettings> {
    match effect.trim().to_ascii_lowercase().as_str() {
        "compressor" => Ok(EffectSettings::from(CompressorSettings::default())),
        "limiter" => Ok(EffectSettings::from(LimiterSettings::default())),
        other => Err(ValidationError::UnknownEffect(other.to_string())),
    }
}

/// Read a parameter by key.
pub fn get_param(settings: &EffectSettings, key: &str) -> Option<f32> {
    let value = match settings {
        EffectSettings::Compressor(s) => match key {
            "threshold" => s.threshold_db,
            "makeup" => s.makeup_gain_db,
            "knee" => s.knee_width_db,
            "ratio" => s.compression_ratio,
            "lookahead" => s.lookahead_ms,
            "attack" => s.attack_ms,
            "release" => s.release_ms,
            _ => return None,
        },
        EffectSettings::Limiter(s) => match key {
            "threshold" => s.threshold_db,
            "makeup_target" => s.makeup_target_db,
            "knee" => s.knee_width_db,
            "lookahead" => s.lookahead_ms,
            "release" => s.release_ms,
            _ => return None,
        },
    };
    Some(value)
}

/// Set a parameter from its string form.
///
/// Unknown keys, unparsable values and out-of-range values are rejected
/// and leave `settings` unchanged. See [`parse_param_value`] for accepted
/// formats.
///
/// # Example
///
/// ```rust
/// use squash_config::set_param;
/// use squash_dynamics::EffectSettings;
///
/// let mut settings = EffectSettings::default();
/// set_param(&mut settings, "threshold", "-18 dB").unwrap();
/// set_param(&mut settings, "ratio", "4:1").unwrap();
/// assert!(set_param(&mut settings, "ceiling", "-1").is_err());
/// ```
pub fn set_param(settings: &mut EffectSettings, key: &str, value: &str) -> ValidationResult<()> {
    let key = key.trim();
    let spec = param_specs(settings)
        .iter()
        .find(|spec| spec.key == key)
        .ok_or_else(|| ValidationError::UnknownParameter {
            effect: settings.kind().to_string(),
            param: key.to_string(),
        })?;
    let value = parse_param_value(value).ok_or_else(|| ValidationError::InvalidFormat {
        param: key.to_string(),
        reason: format!("'{}' is not a number", value.trim()),
    })?;
    check_range(spec, value)?;

    match settings {
        EffectSettings::Compressor(s) => {
            let field = match key {
                "threshold" => &mut s.threshold_db,
                "makeup" => &mut s.makeup_gain_db,
                "knee" => &mut s.knee_width_db,
                "ratio" => &mut s.compression_ratio,
                "lookahead" => &mut s.lookahead_ms,
                "attack" => &mut s.attack_ms,
                _ => &mut s.release_ms,
            };
            *field = value;
        }
        EffectSettings::Limiter(s) => {
            let field = match key {
                "threshold" => &mut s.threshold_db,
                "makeup_target" => &mut s.makeup_target_db,
                "knee" => &mut s.knee_width_db,
                "lookahead" => &mut s.lookahead_ms,
                _ => &mut s.release_ms,
            };
            *field = value;
        }
    }
    Ok(())
}

/// Parse a `key=value` override into its two halves.
pub fn parse_override(text: &str) -> ValidationResult<(&str, &str)> {
    text.split_once('=')
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| ValidationError::InvalidFormat {
            param: text.to_string(),
            reason: "expected key=value".to_string(),
        })
}

/// Parse a parameter value.
///
/// Accepts a plain number, a number with a `dB` or `ms` unit, or a ratio
/// written as `N:1`. Units are informational: values are already stored in
/// dB and milliseconds.
///
/// ```rust
/// use squash_config::parse_param_value;
///
/// assert_eq!(parse_param_value("-6"), Some(-6.0));
/// assert_eq!(parse_param_value("-6 dB"), Some(-6.0));
/// assert_eq!(parse_param_value("150ms"), Some(150.0));
/// assert_eq!(parse_param_value("4:1"), Some(4.0));
/// assert_eq!(parse_param_value("loud"), None);
/// ```
pub fn parse_param_value(value: &str) -> Option<f32> {
    let value = value.trim();
    let number = if let Some(ratio) = value.strip_suffix(":1") {
        ratio
    } else if let Some(db) = value
        .strip_suffix("dB")
        .or_else(|| value.strip_suffix("db"))
    {
        db
    } else if let Some(ms) = value.strip_suffix("ms") {
        ms
    } else {
        value
    };
    number.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

pub(crate) fn check_range(spec: &ParamSpec, value: f32) -> ValidationResult<()> {
    if (spec.min..=spec.max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            param: spec.key.to_string(),
            value,
            min: spec.min,
            max: spec.max,
        })
    }
}
