//! Block processor for one channel group.
//!
//! # Signal Flow
//!
//! ```text
//!             ┌──────────── max |x| over channels ─────────────┐
//!             ↓                                                 │
//! Input ──→ Peak Window (L+1) → Gain Curve → Ballistics → gain │
//!   │                                                      │    │
//!   └──→ Lookahead Delay (L) ─────────────────────────────→ × ──→ Output
//! ```
//!
//! The detector sees every sample `L` samples before the audio path does.
//! Holding the window maximum over `L + 1` samples keeps the gain down for
//! as long as a peak is still inside the delay line. Detection is linked
//! across channels so all channels receive identical gain.
//!
//! Block statistics are taken on the delayed path: the loudest sample that
//! leaves the delay line and the reduction multiplied into it.
//!
//! # Lifecycle
//!
//! 1. [`apply_settings_if_needed`](DynamicRangeProcessor::apply_settings_if_needed)
//! 2. [`init`](DynamicRangeProcessor::init) sizes every buffer
//! 3. [`process`](DynamicRangeProcessor::process) per block, preceded by
//!    `apply_settings_if_needed` each time (a no-op when nothing changed)
//! 4. [`reinit`](DynamicRangeProcessor::reinit) when playback resumes
//!
//! Steps 3 and 4 never allocate. Step 1 only allocates when a new lookahead
//! exceeds what `init` reserved.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec::Vec;

use squash_core::{
    Ballistics, LookaheadDelay, PeakWindow, SILENCE_FLOOR_DB, db_to_linear, linear_to_db,
};

use crate::curve::GainCurve;
use crate::settings::ProcessorSettings;
use crate::stats::FrameStats;

/// Compressor/limiter DSP state for one channel group.
///
/// # Example
///
/// ```rust
/// use squash_dynamics::{DynamicRangeProcessor, EffectSettings, LimiterSettings};
///
/// let settings = EffectSettings::from(LimiterSettings::default());
/// let mut processor = DynamicRangeProcessor::new();
/// processor.apply_settings_if_needed(&settings.processor_settings());
/// processor.init(48000.0, 2, 512);
///
/// let left = vec![0.9_f32; 512];
/// let right = vec![-0.9_f32; 512];
/// let mut out_l = vec![0.0_f32; 512];
/// let mut out_r = vec![0.0_f32; 512];
/// processor.process(&[&left[..], &right[..]], &mut [&mut out_l[..], &mut out_r[..]], 512);
///
/// let stats = processor.last_frame_stats().unwrap();
/// assert!(stats.db_attenuation_of_max_input_sample < 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct DynamicRangeProcessor {
    /// Last applied settings; `None` until the first apply.
    settings: Option<ProcessorSettings>,
    curve: GainCurve,
    ballistics: Ballistics,
    /// 0.0 until `init`.
    sample_rate: f64,
    num_channels: usize,
    block_size: usize,
    lookahead_samples: usize,
    delays: Vec<LookaheadDelay>,
    peaks: PeakWindow,
    /// Linear gain for each sample of the current chunk.
    gains: Vec<f32>,
    /// Smoothed reduction (dB, makeup excluded) behind each entry of `gains`.
    reductions: Vec<f32>,
    last_stats: Option<FrameStats>,
}

impl DynamicRangeProcessor {
    /// Create an uninitialised processor with default curve parameters.
    pub fn new() -> Self {
        Self {
            settings: None,
            curve: GainCurve::default(),
            ballistics: Ballistics::new(48000.0),
            sample_rate: 0.0,
            num_channels: 0,
            block_size: 0,
            lookahead_samples: 0,
            delays: Vec::new(),
            peaks: PeakWindow::new(),
            gains: Vec::new(),
            reductions: Vec::new(),
            last_stats: None,
        }
    }

    /// Apply `settings` unless they equal the last applied ones.
    ///
    /// Safe to call before every block: the unchanged case is one
    /// comparison. On a change the curve and ballistics are recomputed; if
    /// the lookahead length changed the delay state is cleared, and storage
    /// grows only if the new lookahead exceeds what is reserved.
    #[inline]
    pub fn apply_settings_if_needed(&mut self, settings: &ProcessorSettings) {
        if self.settings.as_ref() == Some(settings) {
            return;
        }
        self.apply_settings(*settings);
    }

    #[cold]
    fn apply_settings(&mut self, settings: ProcessorSettings) {
        #[cfg(feature = "tracing")]
        tracing::debug!(?settings, "dynamics: settings changed");

        self.settings = Some(settings);
        self.curve = GainCurve::new(&settings);
        self.ballistics.set_times(settings.attack_ms, settings.release_ms);

        if self.is_initialized() {
            let lookahead = self.target_lookahead_samples();
            if lookahead != self.lookahead_samples {
                self.set_lookahead(lookahead);
            }
        }
    }

    /// Size buffers for the given stream parameters and re-prime all state.
    ///
    /// Calling again with identical parameters (and unchanged lookahead)
    /// reuses every buffer as is.
    pub fn init(&mut self, sample_rate: f64, num_channels: usize, block_size: usize) {
        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, num_channels, block_size, "dynamics: init");

        self.sample_rate = sample_rate;
        self.num_channels = num_channels;
        self.block_size = block_size.max(1);
        self.ballistics.set_sample_rate(sample_rate);

        self.delays.resize_with(num_channels, LookaheadDelay::new);
        if self.gains.len() != self.block_size {
            self.gains.resize(self.block_size, 1.0);
            self.reductions.resize(self.block_size, 0.0);
        }
        let lookahead = self.target_lookahead_samples();
        self.set_lookahead(lookahead);
        self.reinit();
    }

    /// Clear delay lines, detector window, smoothed gain and last stats.
    ///
    /// Allocation-free. Afterwards the processor behaves exactly like a
    /// freshly initialised one with the same settings.
    pub fn reinit(&mut self) {
        for delay in &mut self.delays {
            delay.reset();
        }
        self.peaks.reset();
        self.ballistics.reset();
        self.last_stats = None;
    }

    /// Process `block_len` samples per channel from `input` into `output`.
    ///
    /// Channels beyond the initialised count are left untouched. Work is
    /// split into chunks of at most `block_size` samples; the result does
    /// not depend on how a stream is divided into calls.
    pub fn process(&mut self, input: &[&[f32]], output: &mut [&mut [f32]], block_len: usize) {
        let channels = self.num_channels.min(input.len()).min(output.len());
        if !self.is_initialized() {
            for (src, dst) in input.iter().zip(output.iter_mut()) {
                dst[..block_len].copy_from_slice(&src[..block_len]);
            }
            return;
        }

        let mut tracker = PeakTracker::new();
        let mut start = 0;
        while start < block_len {
            let len = (block_len - start).min(self.block_size);
            self.compute_gains(input, channels, start, len);

            let gains = &self.gains[..len];
            let reductions = &self.reductions[..len];
            for (c, delay) in self.delays.iter_mut().enumerate().take(channels) {
                let src = &input[c][start..start + len];
                let dst = &mut output[c][start..start + len];
                for (i, ((out, &x), &g)) in dst.iter_mut().zip(src).zip(gains).enumerate() {
                    let delayed = delay.process(x);
                    tracker.observe(start + i, delayed.abs(), reductions[i]);
                    *out = delayed * g;
                }
            }
            start += len;
        }
        self.last_stats = Some(tracker.finish(self.ballistics.value()));
    }

    /// In-place variant of [`process`](Self::process).
    ///
    /// Produces exactly the same output as `process` with the same input.
    pub fn process_in_place(&mut self, buffers: &mut [&mut [f32]], block_len: usize) {
        if !self.is_initialized() {
            return;
        }
        let channels = self.num_channels.min(buffers.len());

        let mut tracker = PeakTracker::new();
        let mut start = 0;
        while start < block_len {
            let len = (block_len - start).min(self.block_size);
            self.compute_gains(&*buffers, channels, start, len);

            let gains = &self.gains[..len];
            let reductions = &self.reductions[..len];
            for (c, delay) in self.delays.iter_mut().enumerate().take(channels) {
                let samples = &mut buffers[c][start..start + len];
                for (i, (sample, &g)) in samples.iter_mut().zip(gains).enumerate() {
                    let delayed = delay.process(*sample);
                    tracker.observe(start + i, delayed.abs(), reductions[i]);
                    *sample = delayed * g;
                }
            }
            start += len;
        }
        self.last_stats = Some(tracker.finish(self.ballistics.value()));
    }

    /// Statistics of the last processed block.
    ///
    /// `None` until a block has been processed since the last
    /// [`init`](Self::init) or [`reinit`](Self::reinit).
    pub fn last_frame_stats(&self) -> Option<FrameStats> {
        self.last_stats
    }

    /// Static curve output for `input_db`, including makeup.
    pub fn evaluate_transfer_function(&self, input_db: f32) -> f32 {
        self.curve.evaluate(input_db)
    }

    /// Last applied settings.
    pub fn settings(&self) -> Option<&ProcessorSettings> {
        self.settings.as_ref()
    }

    /// Sample rate given to [`init`](Self::init); 0.0 before.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Channel count given to [`init`](Self::init).
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    /// Maximum chunk length processed at once.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Current lookahead, which is also the latency, in samples.
    pub fn lookahead_samples(&self) -> usize {
        self.lookahead_samples
    }

    /// Total sample capacity allocated for the lookahead lines.
    pub fn lookahead_capacity(&self) -> usize {
        self.delays.iter().map(LookaheadDelay::capacity).sum()
    }

    /// Whether [`init`](Self::init) has been called.
    pub fn is_initialized(&self) -> bool {
        self.block_size > 0
    }

    fn target_lookahead_samples(&self) -> usize {
        self.settings
            .map_or(0, |s| s.lookahead_samples(self.sample_rate))
    }

    fn set_lookahead(&mut self, lookahead: usize) {
        for delay in &mut self.delays {
            if delay.max_delay() != lookahead {
                delay.reserve(lookahead);
            }
            delay.set_delay(lookahead);
            delay.reset();
        }
        if self.peaks.window() != lookahead + 1 {
            self.peaks.set_window(lookahead + 1);
        }
        self.peaks.reset();
        self.lookahead_samples = lookahead;
    }

    /// Detector pass: fill `gains[..len]` and `reductions[..len]` for samples
    /// `start..start + len`.
    fn compute_gains<S: AsRef<[f32]>>(
        &mut self,
        input: &[S],
        channels: usize,
        start: usize,
        len: usize,
    ) {
        let net_gain_db = self.curve.net_gain_db();
        for i in 0..len {
            let n = start + i;
            let detector = input[..channels]
                .iter()
                .map(|ch| ch.as_ref()[n].abs())
                .fold(0.0_f32, f32::max);

            let peak = self.peaks.push(detector);
            let target_db = self.curve.gain_reduction_db(linear_to_db(peak));
            let reduction_db = self.ballistics.process(target_db);
            self.gains[i] = db_to_linear(reduction_db + net_gain_db);
            self.reductions[i] = reduction_db;
        }
    }
}

impl Default for DynamicRangeProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks the loudest delayed sample of a block and the reduction applied
/// to it. Ties go to the earliest sample index across all channels.
struct PeakTracker {
    max_input: f32,
    index: usize,
    reduction_db: f32,
}

impl PeakTracker {
    fn new() -> Self {
        Self {
            max_input: -1.0,
            index: usize::MAX,
            reduction_db: 0.0,
        }
    }

    #[inline]
    fn observe(&mut self, index: usize, input: f32, reduction_db: f32) {
        if input > self.max_input || (input == self.max_input && index < self.index) {
            self.max_input = input;
            self.index = index;
            self.reduction_db = reduction_db;
        }
    }

    fn finish(self, current_reduction_db: f32) -> FrameStats {
        if self.max_input < 0.0 {
            // Empty block.
            return FrameStats {
                max_input_sample_db: SILENCE_FLOOR_DB,
                db_attenuation_of_max_input_sample: current_reduction_db,
            };
        }
        FrameStats {
            max_input_sample_db: linear_to_db(self.max_input),
            db_attenuation_of_max_input_sample: self.reduction_db,
        }
    }
}
