//! Error types for effect instance lifecycle operations.

use thiserror::Error;

/// Processing mode an [`EffectInstance`](crate::EffectInstance) is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Single processor, no telemetry.
    Offline,
    /// Indexed channel groups with telemetry.
    Realtime,
}

impl core::fmt::Display for Mode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Mode::Offline => f.write_str("offline"),
            Mode::Realtime => f.write_str("realtime"),
        }
    }
}

/// Errors raised by [`EffectInstance`](crate::EffectInstance) lifecycle calls.
///
/// Block processing itself never fails; only initialisation can be refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InstanceError {
    /// Sample rate was zero, negative or not finite.
    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(f64),

    /// A channel group must have at least one channel.
    #[error("invalid channel count: {0}")]
    InvalidChannelCount(usize),

    /// Offline and realtime processing cannot overlap.
    #[error("cannot enter {requested} processing while {active} processing is active")]
    ModeConflict {
        /// Mode currently active.
        active: Mode,
        /// Mode that was requested.
        requested: Mode,
    },
}

impl InstanceError {
    /// Check a sample rate, returning it unchanged if usable.
    pub fn check_sample_rate(sample_rate: f64) -> Result<f64, Self> {
        if sample_rate.is_finite() && sample_rate > 0.0 {
            Ok(sample_rate)
        } else {
            Err(Self::InvalidSampleRate(sample_rate))
        }
    }
}
