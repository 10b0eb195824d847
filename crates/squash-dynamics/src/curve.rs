//! Static transfer function of the compressor/limiter.
//!
//! Quadratic soft knee after Giannoulis, Massberg & Reiss, "Digital Dynamic
//! Range Compressor Design: A Tutorial and Analysis", JAES 60(6), 2012:
//!
//! ```text
//!            ⎧ x                                   2(x − T) < −W
//! y_G(x) =   ⎨ x + (1/R − 1)(x − T + W/2)² / 2W     |2(x − T)| ≤ W
//!            ⎩ T + (x − T)/R                       2(x − T) > W
//! ```
//!
//! followed by the net (makeup) gain `out_thresh − in_thresh`.

use crate::settings::ProcessorSettings;

/// Gain computer derived from [`ProcessorSettings`].
///
/// # Example
///
/// ```rust
/// use squash_dynamics::{GainCurve, LimiterSettings, ProcessorSettings};
///
/// let curve = GainCurve::new(&ProcessorSettings::from(&LimiterSettings {
///     knee_width_db: 0.0,
///     ..LimiterSettings::default()
/// }));
///
/// // A limiter holds everything above threshold (-5 dB) at the makeup target (-1 dB).
/// assert!((curve.evaluate(0.0) - (-1.0)).abs() < 1e-4);
/// assert!((curve.evaluate(-20.0) - (-16.0)).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainCurve {
    threshold_db: f32,
    knee_db: f32,
    /// `1/R − 1`, in [-1, 0]
    slope: f32,
    net_gain_db: f32,
}

impl GainCurve {
    /// Build the curve for the given settings.
    pub fn new(settings: &ProcessorSettings) -> Self {
        let ratio = settings.compression_ratio.max(1.0);
        Self {
            threshold_db: settings.in_compression_thresh_db,
            knee_db: settings.knee_width_db.max(0.0),
            slope: 1.0 / ratio - 1.0,
            net_gain_db: settings.net_gain_db(),
        }
    }

    /// Static gain reduction for an input level, excluding makeup (dB, ≤ 0).
    #[inline]
    pub fn gain_reduction_db(&self, input_db: f32) -> f32 {
        let overshoot = input_db - self.threshold_db;
        if 2.0 * overshoot <= -self.knee_db {
            0.0
        } else if 2.0 * overshoot < self.knee_db {
            let x = overshoot + self.knee_db / 2.0;
            self.slope * x * x / (2.0 * self.knee_db)
        } else {
            self.slope * overshoot
        }
    }

    /// Output level for an input level, including makeup (dB).
    #[inline]
    pub fn evaluate(&self, input_db: f32) -> f32 {
        input_db + self.gain_reduction_db(input_db) + self.net_gain_db
    }

    /// Net gain applied after gain reduction (dB).
    pub fn net_gain_db(&self) -> f32 {
        self.net_gain_db
    }
}

impl Default for GainCurve {
    fn default() -> Self {
        Self::new(&ProcessorSettings::default())
    }
}

/// How much the static curve compresses a full-scale (0 dBFS) input, in
/// positive dB.
///
/// Visualisations size their dB axis from this.
pub fn max_compression_db(settings: &ProcessorSettings) -> f32 {
    -GainCurve::new(settings).gain_reduction_db(0.0)
}

/// Range of the compression display axis: half the maximum compression,
/// never less than 3 dB.
pub fn display_db_range(settings: &ProcessorSettings) -> f32 {
    const MIN_RANGE_DB: f32 = 3.0;
    (max_compression_db(settings) / 2.0).max(MIN_RANGE_DB)
}
