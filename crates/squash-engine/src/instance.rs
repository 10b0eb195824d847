//! The effect instance: offline processing and realtime channel groups.
//!
//! # Lifecycle
//!
//! ```text
//!                  ┌── process_initialize ──→ Offline ──── process_finalize ───┐
//! Uninitialised ───┤                                                           ├──→ Uninitialised
//!                  └── realtime_initialize ─→ Realtime(n) ─ realtime_finalize ─┘
//!                                               │   ↑
//!                                               └───┘ realtime_add_processor
//! ```
//!
//! Offline processing uses a single processor owned for the instance's
//! lifetime. Realtime processing uses one [`ProcessingContext`] per channel
//! group, addressed by the order in which groups were added. The two modes
//! cannot overlap.
//!
//! Lifecycle calls take `&mut self`, so they cannot race with processing.
//! Distinct groups can be driven concurrently through
//! [`contexts_mut`](EffectInstance::contexts_mut).

use crossbeam_channel::Receiver;
use squash_dynamics::{DynamicRangeProcessor, EffectSettings, ProcessorSettings};

use crate::context::ProcessingContext;
use crate::error::{InstanceError, Mode};
use crate::events::{EventPublisher, InstanceEvent, ProcessingSettings};
use crate::telemetry::TelemetrySink;

/// Block size of every realtime processor.
///
/// Fixed rather than host-chosen so buffer sizing is predictable.
pub const REALTIME_BLOCK_SIZE: usize = 512;

/// Chunk size of the offline processor. Blocks of any length are accepted.
pub const OFFLINE_BLOCK_SIZE: usize = 512;

/// Input and output channel count. Only stereo is supported for now.
pub const AUDIO_CHANNELS: usize = 2;

/// Channel layout announced by the host at offline initialisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelMap {
    /// One channel.
    Mono,
    /// Left and right.
    #[default]
    Stereo,
}

impl ChannelMap {
    /// Number of channels in the layout.
    pub fn channel_count(self) -> usize {
        match self {
            ChannelMap::Mono => 1,
            ChannelMap::Stereo => 2,
        }
    }
}

/// A compressor/limiter effect instance.
///
/// # Example
///
/// ```rust
/// use squash_engine::{EffectInstance, StatisticsPacket};
/// use squash_dynamics::{EffectSettings, LimiterSettings};
///
/// let settings = EffectSettings::from(LimiterSettings::default());
/// let mut instance = EffectInstance::new();
/// instance.realtime_initialize(&settings, 44100.0).unwrap();
///
/// let sink: Vec<StatisticsPacket> = Vec::new();
/// let group = instance
///     .realtime_add_processor(&settings, Some(Box::new(sink)), 2, 44100.0)
///     .unwrap();
///
/// let silence = vec![0.0_f32; 512];
/// let mut left = vec![0.0_f32; 512];
/// let mut right = vec![0.0_f32; 512];
/// let done = instance.realtime_process(
///     group,
///     &settings,
///     &[&silence[..], &silence[..]],
///     &mut [&mut left[..], &mut right[..]],
///     512,
/// );
/// assert_eq!(done, 512);
/// assert_eq!(instance.latency(&settings, 44100.0), 44);
/// ```
#[derive(Debug)]
pub struct EffectInstance {
    offline: DynamicRangeProcessor,
    contexts: Vec<ProcessingContext>,
    sample_rate: Option<f64>,
    channel_map: Option<ChannelMap>,
    mode: Option<Mode>,
    events: EventPublisher,
}

impl EffectInstance {
    /// Create an uninitialised instance.
    pub fn new() -> Self {
        Self {
            offline: DynamicRangeProcessor::new(),
            contexts: Vec::new(),
            sample_rate: None,
            channel_map: None,
            mode: None,
            events: EventPublisher::new(),
        }
    }

    /// Subscribe to lifecycle events.
    pub fn subscribe(&mut self) -> Receiver<InstanceEvent> {
        self.events.subscribe()
    }

    // -- offline ----------------------------------------------------------

    /// Prepare the offline processor.
    ///
    /// The processor always runs [`audio_in_count`](Self::audio_in_count)
    /// channels; a mono `channels` layout simply leaves the second unused.
    pub fn process_initialize(
        &mut self,
        settings: &EffectSettings,
        sample_rate: f64,
        channels: ChannelMap,
    ) -> Result<(), InstanceError> {
        self.enter(Mode::Offline)?;
        let sample_rate = InstanceError::check_sample_rate(sample_rate)?;

        tracing::info!(
            sample_rate,
            ?channels,
            effect = settings.kind(),
            "offline processing initialized"
        );

        self.sample_rate = Some(sample_rate);
        self.channel_map = Some(channels);
        self.mode = Some(Mode::Offline);
        self.offline
            .apply_settings_if_needed(&settings.processor_settings());
        self.offline
            .init(sample_rate, self.audio_in_count(), OFFLINE_BLOCK_SIZE);
        Ok(())
    }

    /// Process one offline block. Always processes the whole block.
    pub fn process_block(
        &mut self,
        settings: &EffectSettings,
        input: &[&[f32]],
        output: &mut [&mut [f32]],
        block_len: usize,
    ) -> usize {
        self.offline
            .apply_settings_if_needed(&settings.processor_settings());
        self.offline.process(input, output, block_len);
        block_len
    }

    /// End offline processing.
    pub fn process_finalize(&mut self) {
        tracing::info!("offline processing finalized");
        self.sample_rate = None;
        self.channel_map = None;
        if self.mode == Some(Mode::Offline) {
            self.mode = None;
        }
    }

    /// The offline processor.
    pub fn offline_processor(&self) -> &DynamicRangeProcessor {
        &self.offline
    }

    // -- realtime ---------------------------------------------------------

    /// Start realtime processing at `sample_rate`.
    ///
    /// Drops any existing channel groups, which also resets their sample
    /// counters, and publishes the new rate.
    pub fn realtime_initialize(
        &mut self,
        settings: &EffectSettings,
        sample_rate: f64,
    ) -> Result<(), InstanceError> {
        self.enter(Mode::Realtime)?;
        let sample_rate = InstanceError::check_sample_rate(sample_rate)?;

        tracing::info!(
            sample_rate,
            block_size = REALTIME_BLOCK_SIZE,
            effect = settings.kind(),
            latency = self.latency(settings, sample_rate),
            "realtime processing initialized"
        );

        self.contexts.clear();
        self.sample_rate = Some(sample_rate);
        self.mode = Some(Mode::Realtime);
        self.events
            .publish(InstanceEvent::ProcessingSettings(Some(ProcessingSettings {
                sample_rate,
            })));
        Ok(())
    }

    /// Re-prime every group's processor after a pause.
    ///
    /// Sample counters keep their values.
    pub fn realtime_resume(&mut self) {
        tracing::debug!(groups = self.contexts.len(), "realtime processing resumed");
        for context in &mut self.contexts {
            context.reinit();
        }
        self.events.publish(InstanceEvent::Resumed);
    }

    /// Add a channel group and return its index.
    ///
    /// Indices count up from 0 in order of addition and stay valid until
    /// [`realtime_finalize`](Self::realtime_finalize).
    pub fn realtime_add_processor(
        &mut self,
        settings: &EffectSettings,
        sink: Option<Box<dyn TelemetrySink>>,
        num_channels: usize,
        sample_rate: f64,
    ) -> Result<usize, InstanceError> {
        self.enter(Mode::Realtime)?;
        let sample_rate = InstanceError::check_sample_rate(sample_rate)?;
        if num_channels == 0 {
            return Err(InstanceError::InvalidChannelCount(num_channels));
        }

        let group = self.contexts.len();
        tracing::info!(
            group,
            num_channels,
            sample_rate,
            telemetry = sink.is_some(),
            "realtime processor added"
        );

        self.mode = Some(Mode::Realtime);
        self.contexts.push(ProcessingContext::new(
            settings,
            sink,
            num_channels,
            sample_rate,
            REALTIME_BLOCK_SIZE,
        ));
        Ok(group)
    }

    /// End realtime processing, dropping every channel group.
    pub fn realtime_finalize(&mut self) {
        let dropped: u64 = self.contexts.iter().map(ProcessingContext::dropped_packets).sum();
        if dropped > 0 {
            tracing::warn!(dropped, "telemetry packets were dropped during realtime processing");
        }
        tracing::info!(groups = self.contexts.len(), "realtime processing finalized");

        self.contexts.clear();
        self.sample_rate = None;
        if self.mode == Some(Mode::Realtime) {
            self.mode = None;
        }
        self.events.publish(InstanceEvent::ProcessingSettings(None));
    }

    /// Process one block for channel group `group`.
    ///
    /// Returns the number of samples processed: `num_samples`, or 0 if no
    /// such group exists, in which case nothing else happens.
    pub fn realtime_process(
        &mut self,
        group: usize,
        settings: &EffectSettings,
        input: &[&[f32]],
        output: &mut [&mut [f32]],
        num_samples: usize,
    ) -> usize {
        match self.contexts.get_mut(group) {
            Some(context) => context.process(settings, input, output, num_samples),
            None => {
                tracing::trace!(group, "realtime_process: no such group");
                0
            }
        }
    }

    /// Advance group `group`'s stream position for a bypassed block.
    ///
    /// Unknown groups are ignored.
    pub fn realtime_pass_through(&mut self, group: usize, num_samples: usize) {
        match self.contexts.get_mut(group) {
            Some(context) => context.pass_through(num_samples),
            None => tracing::trace!(group, "realtime_pass_through: no such group"),
        }
    }

    /// Channel groups in index order.
    pub fn contexts(&self) -> &[ProcessingContext] {
        &self.contexts
    }

    /// Channel groups in index order, for driving groups on separate threads.
    pub fn contexts_mut(&mut self) -> &mut [ProcessingContext] {
        &mut self.contexts
    }

    /// Number of channel groups.
    pub fn group_count(&self) -> usize {
        self.contexts.len()
    }

    // -- queries ----------------------------------------------------------

    /// Latency in samples introduced by `settings` at `sample_rate`.
    pub fn latency(&self, settings: &EffectSettings, sample_rate: f64) -> u64 {
        ProcessorSettings::from(settings).lookahead_samples(sample_rate) as u64
    }

    /// Number of input channels.
    pub fn audio_in_count(&self) -> usize {
        AUDIO_CHANNELS
    }

    /// Number of output channels.
    pub fn audio_out_count(&self) -> usize {
        AUDIO_CHANNELS
    }

    /// Sample rate of the active mode, if any.
    pub fn sample_rate(&self) -> Option<f64> {
        self.sample_rate
    }

    /// Channel layout given to [`process_initialize`](Self::process_initialize).
    pub fn channel_map(&self) -> Option<ChannelMap> {
        self.channel_map
    }

    /// Active processing mode.
    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    fn enter(&self, requested: Mode) -> Result<(), InstanceError> {
        match self.mode {
            Some(active) if active != requested => {
                Err(InstanceError::ModeConflict { active, requested })
            }
            _ => Ok(()),
        }
    }
}

impl Default for EffectInstance {
    fn default() -> Self {
        Self::new()
    }
}
