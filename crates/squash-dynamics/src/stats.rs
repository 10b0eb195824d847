//! Per-block statistics.

use squash_core::{LOG2_TO_DB, fast_log2};

/// Input samples quieter than this are ignored by [`max_db_increase`].
pub const RATIO_MAGNITUDE_FLOOR: f32 = 1e-6;

/// Summary of the most recently processed block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// Level of the loudest input sample leaving the lookahead delay in
    /// this block, across all channels (dBFS).
    pub max_input_sample_db: f32,
    /// Smoothed gain reduction multiplied into that sample (dB, ≤ 0,
    /// makeup excluded).
    pub db_attenuation_of_max_input_sample: f32,
}

/// Largest per-sample gain increase from `input` to `output`, in dB.
///
/// Compares magnitudes sample by sample, skipping input samples below
/// [`RATIO_MAGNITUDE_FLOOR`]. Returns `f32::NEG_INFINITY` when no sample
/// qualifies (or every qualifying output is zero). When `|out| ≤ |in|`
/// everywhere the result is ≤ 0 dB.
///
/// # Example
///
/// ```rust
/// use squash_dynamics::max_db_increase;
///
/// let input = [0.5, -0.5, 0.0];
/// let output = [0.25, -0.5, 0.3];
/// assert_eq!(max_db_increase(&input, &output), 0.0);
/// assert_eq!(max_db_increase(&[0.0; 4], &[0.1; 4]), f32::NEG_INFINITY);
/// ```
pub fn max_db_increase(input: &[f32], output: &[f32]) -> f32 {
    debug_assert_eq!(input.len(), output.len());
    let mut greatest_ratio = 0.0_f32;
    for (&x, &y) in input.iter().zip(output) {
        let magnitude = x.abs();
        if magnitude < RATIO_MAGNITUDE_FLOOR {
            continue;
        }
        greatest_ratio = greatest_ratio.max(y.abs() / magnitude);
    }
    if greatest_ratio == 0.0 {
        f32::NEG_INFINITY
    } else {
        LOG2_TO_DB * fast_log2(greatest_ratio)
    }
}
