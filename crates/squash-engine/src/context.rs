//! One realtime channel group.

use squash_dynamics::{DynamicRangeProcessor, EffectSettings};

use crate::telemetry::{StatisticsPacket, TelemetrySink};

/// Processor, stream position and optional telemetry for one channel group.
///
/// The sample counter keeps advancing while the group is bypassed (see
/// [`pass_through`](Self::pass_through)), so packet timestamps stay
/// continuous across bypass.
pub struct ProcessingContext {
    processor: DynamicRangeProcessor,
    sink: Option<Box<dyn TelemetrySink>>,
    sample_counter: u64,
}

impl ProcessingContext {
    /// Create a context with its processor configured and initialised.
    pub fn new(
        settings: &EffectSettings,
        sink: Option<Box<dyn TelemetrySink>>,
        num_channels: usize,
        sample_rate: f64,
        block_size: usize,
    ) -> Self {
        let mut processor = DynamicRangeProcessor::new();
        processor.apply_settings_if_needed(&settings.processor_settings());
        processor.init(sample_rate, num_channels, block_size);
        Self {
            processor,
            sink,
            sample_counter: 0,
        }
    }

    /// Process one block and, if a sink is attached, emit one packet.
    ///
    /// The packet is stamped with the counter value before this block; the
    /// counter advances afterwards. Returns `num_samples`.
    pub fn process(
        &mut self,
        settings: &EffectSettings,
        input: &[&[f32]],
        output: &mut [&mut [f32]],
        num_samples: usize,
    ) -> usize {
        let processor_settings = settings.processor_settings();
        self.processor.apply_settings_if_needed(&processor_settings);
        self.processor.process(input, output, num_samples);

        if let (Some(sink), Some(stats)) = (self.sink.as_mut(), self.processor.last_frame_stats()) {
            let peak_db = stats.max_input_sample_db;
            sink.push(StatisticsPacket {
                index_of_first_sample: self.sample_counter,
                target_compression_db: self.processor.evaluate_transfer_function(peak_db)
                    - peak_db
                    - processor_settings.net_gain_db(),
                actual_compression_db: stats.db_attenuation_of_max_input_sample,
            });
        }

        self.sample_counter += num_samples as u64;
        num_samples
    }

    /// Advance the stream position for a bypassed block.
    pub fn pass_through(&mut self, num_samples: usize) {
        self.sample_counter += num_samples as u64;
    }

    /// Re-prime the processor without touching the stream position.
    pub fn reinit(&mut self) {
        self.processor.reinit();
    }

    /// Samples processed or passed through since creation.
    pub fn sample_counter(&self) -> u64 {
        self.sample_counter
    }

    /// The group's processor.
    pub fn processor(&self) -> &DynamicRangeProcessor {
        &self.processor
    }

    /// Whether a telemetry sink is attached.
    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    /// Packets the attached sink has discarded.
    pub fn dropped_packets(&self) -> u64 {
        self.sink.as_ref().map_or(0, |sink| sink.dropped())
    }
}

impl core::fmt::Debug for ProcessingContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProcessingContext")
            .field("sample_counter", &self.sample_counter)
            .field("has_sink", &self.has_sink())
            .field("num_channels", &self.processor.num_channels())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::PacketSender;
    use squash_dynamics::{CompressorSettings, LimiterSettings};

    #[test]
    fn counter_advances_after_stamping() {
        let settings = EffectSettings::from(LimiterSettings::default());
        let (sender, rx) = PacketSender::bounded(8);
        let mut context = ProcessingContext::new(&settings, Some(Box::new(sender)), 1, 48000.0, 64);

        let input = vec![0.1_f32; 100];
        let mut output = vec![0.0_f32; 100];
        assert_eq!(context.process(&settings, &[&input[..]], &mut [&mut output[..]], 100), 100);
        context.pass_through(28);
        context.process(&settings, &[&input[..50]], &mut [&mut output[..50]], 50);

        let stamps: Vec<u64> = rx.try_iter().map(|p| p.index_of_first_sample).collect();
        assert_eq!(stamps, vec![0, 128]);
        assert_eq!(context.sample_counter(), 178);
    }

    #[test]
    fn target_compression_excludes_makeup() {
        let settings = EffectSettings::from(CompressorSettings {
            threshold_db: -20.0,
            makeup_gain_db: 6.0,
            knee_width_db: 0.0,
            compression_ratio: 2.0,
            attack_ms: 0.0,
            ..CompressorSettings::default()
        });
        let (sender, rx) = PacketSender::bounded(8);
        let mut context = ProcessingContext::new(&settings, Some(Box::new(sender)), 1, 48000.0, 64);

        let input = vec![1.0_f32; 64];
        let mut output = vec![0.0_f32; 64];
        context.process(&settings, &[&input[..]], &mut [&mut output[..]], 64);

        let packet = rx.try_recv().unwrap();
        // 20 dB over at 2:1 asks for 10 dB of reduction.
        assert!((packet.target_compression_db + 10.0).abs() < 1e-3);
        assert!((packet.actual_compression_db + 10.0).abs() < 1e-3);
    }

    #[test]
    fn no_sink_no_packets() {
        let settings = EffectSettings::default();
        let mut context = ProcessingContext::new(&settings, None, 2, 44100.0, 512);
        let silence = vec![0.0_f32; 32];
        let mut l = vec![0.0_f32; 32];
        let mut r = vec![0.0_f32; 32];
        context.process(&settings, &[&silence[..], &silence[..]], &mut [&mut l[..], &mut r[..]], 32);
        assert!(!context.has_sink());
        assert_eq!(context.dropped_packets(), 0);
        assert_eq!(context.sample_counter(), 32);
    }
}
