//! Settings and preset validation.
//!
//! Checks every parameter of an [`EffectSettings`] against the ranges in
//! [`params`](crate::params), collecting all violations.
//!
//! # Example
//!
//! ```rust
//! use squash_config::validate_settings;
//! use squash_dynamics::{CompressorSettings, EffectSettings};
//!
//! assert!(validate_settings(&EffectSettings::default()).is_ok());
//!
//! let wild = EffectSettings::from(CompressorSettings {
//!     compression_ratio: 0.5,
//!     ..CompressorSettings::default()
//! });
//! assert!(validate_settings(&wild).is_err());
//! ```

use squash_dynamics::EffectSettings;
use thiserror::Error;

use crate::params::{check_range, get_param, param_specs};

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Unknown effect type.
    #[error("unknown effect type: {0}")]
    UnknownEffect(String),

    /// Unknown parameter name.
    #[error("unknown parameter '{param}' for effect '{effect}'")]
    UnknownParameter {
        /// Name of the effect.
        effect: String,
        /// Name of the unrecognized parameter.
        param: String,
    },

    /// Parameter value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the parameter.
        param: String,
        /// The value that was out of range.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// Invalid parameter format.
    #[error("invalid format for parameter '{param}': {reason}")]
    InvalidFormat {
        /// Name of the parameter.
        param: String,
        /// Description of the format error.
        reason: String,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Check every parameter of `settings` against its range.
///
/// A single violation is returned as is; several are wrapped in
/// [`ValidationError::Multiple`].
pub fn validate_settings(settings: &EffectSettings) -> ValidationResult<()> {
    let mut errors: Vec<ValidationError> = param_specs(settings)
        .iter()
        .filter_map(|spec| {
            let value = get_param(settings, spec.key)?;
            check_range(spec, value).err()
        })
        .collect();

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
