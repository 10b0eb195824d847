//! Fast logarithm approximations for metering.
//!
//! Telemetry and block statistics only need a fraction of a dB of accuracy,
//! so they use the bit-twiddling log2 below instead of `libm::logf`.
//!
//! | Function | Replaces | Max error |
//! |----------|----------|-----------|
//! | [`fast_log2`] | `libm::log2f` | < 0.2% |
//! | [`fast_linear_to_db`] | [`linear_to_db`](crate::linear_to_db) | < 0.05 dB |
//!
//! Gain computation on the audio path keeps using the exact conversions.

/// Multiply a base-2 logarithm by this to get decibels: `20 / log2(10)`.
pub const LOG2_TO_DB: f32 = 20.0 / core::f32::consts::LOG2_10;

/// Fast base-2 logarithm via IEEE 754 float decomposition.
///
/// Extracts the exponent from the bit pattern and fits the mantissa with a
/// quadratic pinned at both ends of the octave, so powers of two are exact
/// (`fast_log2(1.0) == 0.0`) and the result is monotonic. Maximum absolute
/// error is 0.0077 (≈ 0.046 dB after scaling by [`LOG2_TO_DB`]).
///
/// # Arguments
///
/// * `x` - Input value. Must be > 0. Returns garbage for x ≤ 0.
///
/// # Examples
///
/// ```
/// use squash_core::fast_math::fast_log2;
///
/// assert!((fast_log2(1.0) - 0.0).abs() < 0.01);
/// assert!((fast_log2(2.0) - 1.0).abs() < 0.01);
/// assert!((fast_log2(0.5) - (-1.0)).abs() < 0.01);
/// ```
#[inline]
pub fn fast_log2(x: f32) -> f32 {
    let bits = x.to_bits();
    let exponent = ((bits >> 23) & 0xFF) as i32 - 127;
    // Mantissa in [1.0, 2.0)
    let m = f32::from_bits((bits & 0x007F_FFFF) | 0x3F80_0000);
    // log2(1 + t) ≈ t + c·t·(1 − t), t ∈ [0, 1)
    let t = m - 1.0;
    exponent as f32 + t * (1.0 + 0.346_55 * (1.0 - t))
}

/// Fast linear-gain-to-dB conversion.
///
/// Values ≤ 1e-10 are clamped, matching [`linear_to_db`](crate::linear_to_db)
/// closely enough for display purposes.
///
/// ```
/// use squash_core::fast_linear_to_db;
///
/// assert!((fast_linear_to_db(1.0) - 0.0).abs() < 0.1);
/// assert!((fast_linear_to_db(0.1) - (-20.0)).abs() < 0.1);
/// ```
#[inline]
pub fn fast_linear_to_db(linear: f32) -> f32 {
    fast_log2(linear.max(1e-10)) * LOG2_TO_DB
}
