//! Property-based tests for squash-dynamics.

use proptest::prelude::*;
use squash_dynamics::{
    CompressorSettings, DynamicRangeProcessor, EffectSettings, GainCurve, max_db_increase,
};

fn compressor() -> impl Strategy<Value = EffectSettings> {
    (
        -60.0f32..0.0,
        0.0f32..30.0,
        1.0f32..100.0,
        0.0f32..20.0,
        0.0f32..100.0,
        0.0f32..500.0,
    )
        .prop_map(|(threshold_db, knee_width_db, compression_ratio, lookahead_ms, attack_ms, release_ms)| {
            EffectSettings::from(CompressorSettings {
                threshold_db,
                makeup_gain_db: 0.0,
                knee_width_db,
                compression_ratio,
                lookahead_ms,
                attack_ms,
                release_ms,
            })
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Pure attenuation never reads as a gain increase.
    #[test]
    fn attenuation_reports_at_most_zero_db(
        pairs in prop::collection::vec((-1.0f32..=1.0, 0.0f32..=1.0), 1..256),
    ) {
        let input: Vec<f32> = pairs.iter().map(|&(x, _)| x).collect();
        let output: Vec<f32> = pairs.iter().map(|&(x, scale)| x * scale).collect();
        prop_assert!(max_db_increase(&input, &output) <= 0.0);
    }

    /// The static curve never adds gain beyond the makeup.
    #[test]
    fn curve_reduction_is_non_positive(settings in compressor(), level in -120.0f32..12.0) {
        let curve = GainCurve::new(&settings.processor_settings());
        prop_assert!(curve.gain_reduction_db(level) <= 0.0);
    }

    /// Without makeup the processor only attenuates (after the lookahead shift).
    #[test]
    fn processor_without_makeup_only_attenuates(
        settings in compressor(),
        input in prop::collection::vec(-1.0f32..=1.0, 1..1024),
        block in 1usize..300,
    ) {
        let mut processor = DynamicRangeProcessor::new();
        processor.apply_settings_if_needed(&settings.processor_settings());
        processor.init(48000.0, 1, block);
        let lookahead = processor.lookahead_samples();

        let mut output = vec![0.0; input.len()];
        processor.process(&[&input[..]], &mut [&mut output[..]], input.len());

        for (n, &y) in output.iter().enumerate() {
            prop_assert!(y.is_finite());
            let x = if n >= lookahead { input[n - lookahead] } else { 0.0 };
            prop_assert!(y.abs() <= x.abs() * (1.0 + 1e-5), "n={} x={} y={}", n, x, y);
        }
    }
}
