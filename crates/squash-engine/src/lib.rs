//! Squash Engine - effect instance orchestration
//!
//! Wraps [`squash_dynamics::DynamicRangeProcessor`] in the two processing
//! policies a host needs:
//!
//! - **Offline**: one processor, fed whole blocks by
//!   [`EffectInstance::process_block`].
//! - **Realtime**: an indexed set of [`ProcessingContext`]s, one per channel
//!   group, each with a sample counter and optional [`TelemetrySink`].
//!
//! ## Telemetry
//!
//! Every realtime block with a sink attached yields one [`StatisticsPacket`].
//! [`PacketSender`] moves packets to another thread over a bounded
//! `crossbeam-channel` without ever blocking; [`CompressionHistory`] turns
//! the received stream into a 10-second plot history.
//!
//! ## Events
//!
//! [`EffectInstance::subscribe`] returns a channel of [`InstanceEvent`]s
//! announcing the realtime sample rate, its removal, and resumes.
//!
//! ## Threads
//!
//! Nothing here spawns threads. Each group is driven by whoever holds its
//! `&mut ProcessingContext`; groups can be split across threads:
//!
//! ```rust
//! use squash_dynamics::EffectSettings;
//! use squash_engine::EffectInstance;
//!
//! let settings = EffectSettings::default();
//! let mut instance = EffectInstance::new();
//! instance.realtime_initialize(&settings, 48000.0).unwrap();
//! for _ in 0..2 {
//!     instance.realtime_add_processor(&settings, None, 1, 48000.0).unwrap();
//! }
//!
//! std::thread::scope(|s| {
//!     for context in instance.contexts_mut() {
//!         let settings = &settings;
//!         s.spawn(move || {
//!             let input = vec![0.5_f32; 256];
//!             let mut output = vec![0.0_f32; 256];
//!             context.process(settings, &[&input[..]], &mut [&mut output[..]], 256);
//!         });
//!     }
//! });
//! assert!(instance.contexts().iter().all(|c| c.sample_counter() == 256));
//! ```

pub mod context;
pub mod error;
pub mod events;
pub mod history;
pub mod instance;
pub mod telemetry;

pub use context::ProcessingContext;
pub use error::{InstanceError, Mode};
pub use events::{EventPublisher, InstanceEvent, ProcessingSettings};
pub use history::{CompressionHistory, HistoryPoint, MAX_TIME_SECONDS, Segment};
pub use instance::{AUDIO_CHANNELS, ChannelMap, EffectInstance, OFFLINE_BLOCK_SIZE, REALTIME_BLOCK_SIZE};
pub use telemetry::{PacketSender, StatisticsPacket, TelemetrySink};
