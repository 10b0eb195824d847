//! Attack/release smoothing of a gain-reduction signal.
//!
//! Compressors smooth the *gain* rather than the detected level: the static
//! curve yields an instantaneous gain reduction in dB, and [`Ballistics`]
//! lets it fall at the attack rate and recover at the release rate.

use libm::expf;

use crate::math::flush_denormal;

/// One-pole attack/release smoother operating in the dB domain.
///
/// Gain reduction values are non-positive; a target *below* the current
/// value means more reduction is required and the attack coefficient is
/// used, otherwise the release coefficient.
///
/// # Example
///
/// ```rust
/// use squash_core::Ballistics;
///
/// let mut ballistics = Ballistics::new(48000.0);
/// ballistics.set_times(5.0, 100.0);
///
/// let smoothed = ballistics.process(-6.0);
/// assert!(smoothed < 0.0 && smoothed > -6.0);
/// ```
#[derive(Debug, Clone)]
pub struct Ballistics {
    /// Current smoothed gain reduction (dB, ≤ 0)
    value: f32,
    attack_coeff: f32,
    release_coeff: f32,
    sample_rate: f64,
    attack_ms: f32,
    release_ms: f32,
}

impl Ballistics {
    /// Create a smoother with 10 ms attack and 100 ms release.
    pub fn new(sample_rate: f64) -> Self {
        let mut ballistics = Self {
            value: 0.0,
            attack_coeff: 0.0,
            release_coeff: 0.0,
            sample_rate,
            attack_ms: 10.0,
            release_ms: 100.0,
        };
        ballistics.recalculate_coefficients();
        ballistics
    }

    /// Set attack and release times in milliseconds.
    ///
    /// A time shorter than one sample period makes that direction instant.
    pub fn set_times(&mut self, attack_ms: f32, release_ms: f32) {
        self.attack_ms = attack_ms.max(0.0);
        self.release_ms = release_ms.max(0.0);
        self.recalculate_coefficients();
    }

    /// Attack time in milliseconds.
    pub fn attack_ms(&self) -> f32 {
        self.attack_ms
    }

    /// Release time in milliseconds.
    pub fn release_ms(&self) -> f32 {
        self.release_ms
    }

    /// Update sample rate and recalculate coefficients.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.recalculate_coefficients();
    }

    /// Advance by one sample toward `target_db` and return the smoothed value.
    #[inline]
    pub fn process(&mut self, target_db: f32) -> f32 {
        let coeff = if target_db < self.value {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.value = flush_denormal(coeff * self.value + (1.0 - coeff) * target_db);
        self.value
    }

    /// Current smoothed value without advancing.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Return to unity gain (0 dB reduction).
    pub fn reset(&mut self) {
        self.value = 0.0;
    }

    fn recalculate_coefficients(&mut self) {
        self.attack_coeff = one_pole_coeff(self.attack_ms, self.sample_rate);
        self.release_coeff = one_pole_coeff(self.release_ms, self.sample_rate);
    }
}

/// `exp(-1 / tau)` with `tau` in samples; 0 (instant) below one sample.
#[inline]
fn one_pole_coeff(time_ms: f32, sample_rate: f64) -> f32 {
    let tau = f64::from(time_ms) * sample_rate / 1000.0;
    if tau < 1.0 { 0.0 } else { expf(-1.0 / tau as f32) }
}
