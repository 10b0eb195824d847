//! Settings snapshots for the compressor and limiter.
//!
//! Hosts hand the processor an [`EffectSettings`] value on every call. The
//! processor only ever looks at the typed [`ProcessorSettings`] derived from
//! it, and compares that by value to decide whether anything changed.
//!
//! # Parameters
//!
//! | Variant | Parameter | Default |
//! |---------|-----------|---------|
//! | Compressor | Threshold | -10 dB |
//! | Compressor | Makeup gain | 0 dB |
//! | Compressor | Knee width | 5 dB |
//! | Compressor | Ratio | 10:1 |
//! | Compressor | Lookahead | 1 ms |
//! | Compressor | Attack | 30 ms |
//! | Compressor | Release | 150 ms |
//! | Limiter | Threshold | -5 dB |
//! | Limiter | Makeup target | -1 dB |
//! | Limiter | Knee width | 2 dB |
//! | Limiter | Lookahead | 1 ms |
//! | Limiter | Release | 20 ms |

use squash_core::ms_to_samples;

/// User-facing compressor parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CompressorSettings {
    /// Level where compression begins (dBFS).
    pub threshold_db: f32,
    /// Gain added after compression (dB).
    pub makeup_gain_db: f32,
    /// Width of the soft knee centred on the threshold (dB).
    pub knee_width_db: f32,
    /// Input dB above threshold per output dB above threshold.
    pub compression_ratio: f32,
    /// Detector lead over the audio path (ms). Sets the reported latency.
    pub lookahead_ms: f32,
    /// Time for gain reduction to engage (ms).
    pub attack_ms: f32,
    /// Time for gain reduction to recover (ms).
    pub release_ms: f32,
}

impl Default for CompressorSettings {
    fn default() -> Self {
        Self {
            threshold_db: -10.0,
            makeup_gain_db: 0.0,
            knee_width_db: 5.0,
            compression_ratio: 10.0,
            lookahead_ms: 1.0,
            attack_ms: 30.0,
            release_ms: 150.0,
        }
    }
}

/// User-facing limiter parameters.
///
/// A limiter is a compressor with an infinite ratio and instant attack; the
/// makeup stage is expressed as the level limited peaks should come out at.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LimiterSettings {
    /// Level above which peaks are held (dBFS).
    pub threshold_db: f32,
    /// Output level of limited peaks (dBFS).
    pub makeup_target_db: f32,
    /// Width of the soft knee centred on the threshold (dB).
    pub knee_width_db: f32,
    /// Detector lead over the audio path (ms).
    pub lookahead_ms: f32,
    /// Time for gain reduction to recover (ms).
    pub release_ms: f32,
}

impl Default for LimiterSettings {
    fn default() -> Self {
        Self {
            threshold_db: -5.0,
            makeup_target_db: -1.0,
            knee_width_db: 2.0,
            lookahead_ms: 1.0,
            release_ms: 20.0,
        }
    }
}

/// The settings snapshot handed to the effect on every call.
///
/// Closed over the two recognised variants, so a snapshot that is neither a
/// compressor nor a limiter cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum EffectSettings {
    /// Ratio-based compression.
    Compressor(CompressorSettings),
    /// Infinite-ratio limiting.
    Limiter(LimiterSettings),
}

impl EffectSettings {
    /// Extract the processor-level settings.
    pub fn processor_settings(&self) -> ProcessorSettings {
        ProcessorSettings::from(self)
    }

    /// Lookahead duration in milliseconds.
    pub fn lookahead_ms(&self) -> f32 {
        match self {
            Self::Compressor(s) => s.lookahead_ms,
            Self::Limiter(s) => s.lookahead_ms,
        }
    }

    /// Short identifier of the variant (`"compressor"` or `"limiter"`).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Compressor(_) => "compressor",
            Self::Limiter(_) => "limiter",
        }
    }

    /// Whether this is the limiter variant.
    pub fn is_limiter(&self) -> bool {
        matches!(self, Self::Limiter(_))
    }
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self::Compressor(CompressorSettings::default())
    }
}

impl From<CompressorSettings> for EffectSettings {
    fn from(settings: CompressorSettings) -> Self {
        Self::Compressor(settings)
    }
}

impl From<LimiterSettings> for EffectSettings {
    fn from(settings: LimiterSettings) -> Self {
        Self::Limiter(settings)
    }
}

/// Typed dynamic-range-processor settings shared by both variants.
///
/// `out_compression_thresh_db - in_compression_thresh_db` is the net gain
/// the processor applies after gain reduction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessorSettings {
    /// Threshold on the input side (dBFS).
    pub in_compression_thresh_db: f32,
    /// Where the threshold lands on the output side (dBFS).
    pub out_compression_thresh_db: f32,
    /// Attack time (ms).
    pub attack_ms: f32,
    /// Release time (ms).
    pub release_ms: f32,
    /// Lookahead (ms).
    pub lookahead_ms: f32,
    /// Knee width (dB).
    pub knee_width_db: f32,
    /// Ratio; `f32::INFINITY` for a limiter.
    pub compression_ratio: f32,
}

impl ProcessorSettings {
    /// Makeup applied after gain reduction (dB).
    #[inline]
    pub fn net_gain_db(&self) -> f32 {
        self.out_compression_thresh_db - self.in_compression_thresh_db
    }

    /// Lookahead as a whole number of samples at `sample_rate`.
    ///
    /// This is both the processing delay and the latency reported to hosts.
    #[inline]
    pub fn lookahead_samples(&self, sample_rate: f64) -> usize {
        ms_to_samples(f64::from(self.lookahead_ms), sample_rate)
    }
}

impl Default for ProcessorSettings {
    fn default() -> Self {
        Self::from(&EffectSettings::default())
    }
}

impl From<&CompressorSettings> for ProcessorSettings {
    fn from(s: &CompressorSettings) -> Self {
        Self {
            in_compression_thresh_db: s.threshold_db,
            out_compression_thresh_db: s.threshold_db + s.makeup_gain_db,
            attack_ms: s.attack_ms,
            release_ms: s.release_ms,
            lookahead_ms: s.lookahead_ms,
            knee_width_db: s.knee_width_db,
            compression_ratio: s.compression_ratio,
        }
    }
}

impl From<&LimiterSettings> for ProcessorSettings {
    fn from(s: &LimiterSettings) -> Self {
        Self {
            in_compression_thresh_db: s.threshold_db,
            out_compression_thresh_db: s.makeup_target_db,
            attack_ms: 0.0,
            release_ms: s.release_ms,
            lookahead_ms: s.lookahead_ms,
            knee_width_db: s.knee_width_db,
            compression_ratio: f32::INFINITY,
        }
    }
}

impl From<&EffectSettings> for ProcessorSettings {
    fn from(settings: &EffectSettings) -> Self {
        match settings {
            EffectSettings::Compressor(s) => Self::from(s),
            EffectSettings::Limiter(s) => Self::from(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compressor_makeup_moves_output_threshold() {
        let settings = CompressorSettings {
            threshold_db: -20.0,
            makeup_gain_db: 6.0,
            ..CompressorSettings::default()
        };
        let p = ProcessorSettings::from(&settings);
        assert_eq!(p.in_compression_thresh_db, -20.0);
        assert_eq!(p.out_compression_thresh_db, -14.0);
        assert_eq!(p.net_gain_db(), 6.0);
    }

    #[test]
    fn limiter_is_infinite_ratio_instant_attack() {
        let p = EffectSettings::Limiter(LimiterSettings::default()).processor_settings();
        assert!(p.compression_ratio.is_infinite());
        assert_eq!(p.attack_ms, 0.0);
        assert_eq!(p.in_compression_thresh_db, -5.0);
        assert_eq!(p.out_compression_thresh_db, -1.0);
        assert_eq!(p.net_gain_db(), 4.0);
    }

    #[test]
    fn lookahead_samples_truncate() {
        let p = ProcessorSettings {
            lookahead_ms: 1.5,
            ..ProcessorSettings::default()
        };
        assert_eq!(p.lookahead_samples(44100.0), 66);
        assert_eq!(p.lookahead_samples(48000.0), 72);
        assert_eq!(ProcessorSettings { lookahead_ms: -3.0, ..p }.lookahead_samples(48000.0), 0);
    }

    #[test]
    fn equal_content_compares_equal() {
        let a = EffectSettings::from(CompressorSettings::default());
        let b = EffectSettings::from(CompressorSettings::default());
        assert_eq!(a.processor_settings(), b.processor_settings());

        let c = EffectSettings::from(CompressorSettings {
            release_ms: 151.0,
            ..CompressorSettings::default()
        });
        assert_ne!(a.processor_settings(), c.processor_settings());
    }

    #[test]
    fn lookahead_and_kind() {
        let lim = EffectSettings::from(LimiterSettings {
            lookahead_ms: 7.5,
            ..LimiterSettings::default()
        });
        assert_eq!(lim.lookahead_ms(), 7.5);
        assert_eq!(lim.kind(), "limiter");
        assert!(lim.is_limiter());
        assert_eq!(EffectSettings::default().kind(), "compressor");
    }
}
