//! Squash Core - DSP primitives for dynamic-range processing
//!
//! The building blocks shared by the compressor/limiter processor, designed
//! for real-time use with zero allocation once buffers have been sized.
//!
//! # Level Math
//!
//! - [`db_to_linear`] / [`linear_to_db`] - exact conversions (with a silence floor)
//! - [`fast_log2`] / [`fast_linear_to_db`] - cheap approximations for metering
//!
//! # Dynamics
//!
//! - [`Ballistics`] - attack/release one-pole smoothing of a gain value
//! - [`LookaheadDelay`] - integer delay line whose capacity is reserved up front
//! - [`PeakWindow`] - running maximum over the last `N` detector samples
//!
//! # no_std Support
//!
//! Disable the default `std` feature to build for embedded targets; `alloc`
//! is still required for the delay and window buffers.
//!
//! ```toml
//! [dependencies]
//! squash-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod ballistics;
pub mod delay;
pub mod fast_math;
pub mod math;
pub mod peak_window;

pub use ballistics::Ballistics;
pub use delay::LookaheadDelay;
pub use fast_math::{LOG2_TO_DB, fast_linear_to_db, fast_log2};
pub use math::{SILENCE_FLOOR_DB, db_to_linear, flush_denormal, linear_to_db, ms_to_samples};
pub use peak_window::PeakWindow;
