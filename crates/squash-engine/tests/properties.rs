//! Property-based tests for counters and latency.

use proptest::prelude::*;
use squash_dynamics::{CompressorSettings, EffectSettings};
use squash_engine::{EffectInstance, StatisticsPacket};

#[derive(Debug, Clone)]
enum Call {
    Process { group: usize, len: usize },
    PassThrough { group: usize, len: usize },
}

fn call() -> impl Strategy<Value = Call> {
    prop_oneof![
        (0usize..4, 0usize..700).prop_map(|(group, len)| Call::Process { group, len }),
        (0usize..4, 0usize..5000).prop_map(|(group, len)| Call::PassThrough { group, len }),
    ]
}

fn compressor(lookahead_ms: f32) -> EffectSettings {
    EffectSettings::from(CompressorSettings {
        lookahead_ms,
        ..CompressorSettings::default()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Each counter is the sum of the sample counts addressed to its group;
    /// calls to groups that do not exist change nothing.
    #[test]
    fn counters_sum_addressed_samples(calls in prop::collection::vec(call(), 0..40)) {
        let settings = EffectSettings::default();
        let mut instance = EffectInstance::new();
        instance.realtime_initialize(&settings, 48000.0).unwrap();
        for _ in 0..3 {
            instance.realtime_add_processor(&settings, Some(Box::new(Vec::<StatisticsPacket>::new())), 1, 48000.0).unwrap();
        }

        let input = vec![0.3_f32; 700];
        let mut output = vec![0.0_f32; 700];
        let mut expected = [0u64; 3];
        for call in &calls {
            match *call {
                Call::Process { group, len } => {
                    let done = instance.realtime_process(
                        group,
                        &settings,
                        &[&input[..len]],
                        &mut [&mut output[..len]],
                        len,
                    );
                    if group < 3 {
                        prop_assert_eq!(done, len);
                        expected[group] += len as u64;
                    } else {
                        prop_assert_eq!(done, 0);
                    }
                }
                Call::PassThrough { group, len } => {
                    instance.realtime_pass_through(group, len);
                    if group < 3 {
                        expected[group] += len as u64;
                    }
                }
            }
        }

        let counters: Vec<u64> = instance.contexts().iter().map(|c| c.sample_counter()).collect();
        prop_assert_eq!(counters, expected.to_vec());
    }

    /// Latency is pure and grows with every lookahead step of at least one sample.
    #[test]
    fn latency_is_pure_and_monotonic(
        lookahead_ms in 0.0f32..500.0,
        step_samples in 1.0f32..1000.0,
        sample_rate in prop::sample::select(vec![8000.0, 44100.0, 48000.0, 96000.0, 192000.0]),
    ) {
        let instance = EffectInstance::new();
        let base = compressor(lookahead_ms);
        let longer = compressor(lookahead_ms + step_samples * 1000.0 / sample_rate as f32 + 1e-3);

        prop_assert_eq!(instance.latency(&base, sample_rate), instance.latency(&base, sample_rate));
        prop_assert!(instance.latency(&longer, sample_rate) > instance.latency(&base, sample_rate));
    }
}
