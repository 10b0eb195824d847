//! Squash Dynamics - compressor/limiter processing
//!
//! Everything needed to run one channel group through a compressor or a
//! limiter:
//!
//! - [`EffectSettings`] - the per-call settings snapshot (compressor or limiter)
//! - [`ProcessorSettings`] - typed parameters derived from it
//! - [`GainCurve`] - static soft-knee transfer function
//! - [`DynamicRangeProcessor`] - lookahead block processor with linked detection
//! - [`FrameStats`] / [`max_db_increase`] - per-block measurements for metering
//!
//! ## Example
//!
//! ```rust
//! use squash_dynamics::{CompressorSettings, DynamicRangeProcessor, EffectSettings};
//!
//! let settings = EffectSettings::from(CompressorSettings {
//!     threshold_db: -20.0,
//!     compression_ratio: 4.0,
//!     ..CompressorSettings::default()
//! });
//!
//! let mut processor = DynamicRangeProcessor::new();
//! processor.apply_settings_if_needed(&settings.processor_settings());
//! processor.init(44100.0, 1, 256);
//!
//! let mut buffer = vec![0.5_f32; 256];
//! processor.process_in_place(&mut [&mut buffer[..]], 256);
//! ```
//!
//! ## Features
//!
//! - `std` (default): build against the standard library
//! - `serde`: `Serialize`/`Deserialize` for the settings types
//! - `tracing`: debug events on settings changes and re-initialisation

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod curve;
pub mod processor;
pub mod settings;
pub mod stats;

pub use curve::{GainCurve, display_db_range, max_compression_db};
pub use processor::DynamicRangeProcessor;
pub use settings::{CompressorSettings, EffectSettings, LimiterSettings, ProcessorSettings};
pub use stats::{FrameStats, RATIO_MAGNITUDE_FLOOR, max_db_increase};
