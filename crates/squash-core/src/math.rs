//! Level and time conversions.
//!
//! All functions are allocation-free and suitable for `no_std`.

use libm::{expf, logf};

/// Level reported for digital silence.
///
/// [`linear_to_db`] clamps its input to `1e-10`, so a zero sample maps here
/// instead of to negative infinity. Keeping silence finite means differences
/// such as `curve(x) - x` stay well defined for silent blocks.
pub const SILENCE_FLOOR_DB: f32 = -200.0;

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use squash_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels, floored at [`SILENCE_FLOOR_DB`].
///
/// # Example
/// ```rust
/// use squash_core::{SILENCE_FLOOR_DB, linear_to_db};
///
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// assert_eq!(linear_to_db(0.0), SILENCE_FLOOR_DB);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    // 20 * log10(linear) = 20 * ln(linear) / ln(10)
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    (logf(linear.max(1e-10)) * FACTOR).max(SILENCE_FLOOR_DB)
}

/// Convert a duration in milliseconds to a whole number of samples.
///
/// Truncates toward zero. Negative or NaN durations yield 0. This is the
/// one conversion used both for sizing lookahead lines and for reporting
/// latency, so the two always agree.
#[inline]
pub fn ms_to_samples(ms: f64, sample_rate: f64) -> usize {
    let samples = ms * sample_rate / 1000.0;
    if samples > 0.0 { samples as usize } else { 0 }
}

/// Flush values in the subnormal neighbourhood to zero.
///
/// Release tails of the smoothed gain decay asymptotically; without this
/// they would eventually hit the IEEE 754 subnormal range.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_round_trip_is_close() {
        for db in [-60.0, -12.0, -0.5, 0.0, 6.0] {
            let back = linear_to_db(db_to_linear(db));
            assert!((back - db).abs() < 1e-3, "{db} -> {back}");
        }
    }

    #[test]
    fn silence_is_floored() {
        assert_eq!(linear_to_db(0.0), SILENCE_FLOOR_DB);
        assert_eq!(linear_to_db(-1.0), SILENCE_FLOOR_DB);
        assert!(linear_to_db(1e-12).is_finite());
    }

    #[test]
    fn ms_to_samples_truncates() {
        assert_eq!(ms_to_samples(1.0, 44100.0), 44);
        assert_eq!(ms_to_samples(5.0, 48000.0), 240);
        assert_eq!(ms_to_samples(0.0, 48000.0), 0);
        assert_eq!(ms_to_samples(-3.0, 48000.0), 0);
        assert_eq!(ms_to_samples(f64::NAN, 48000.0), 0);
    }

    #[test]
    fn flush_denormal_keeps_audible_values() {
        assert_eq!(flush_denormal(1e-25), 0.0);
        assert_eq!(flush_denormal(-1e-25), 0.0);
        assert_eq!(flush_denormal(1e-3), 1e-3);
    }
}
