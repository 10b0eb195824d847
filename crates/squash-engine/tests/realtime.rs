//! Realtime channel-group behaviour of the effect instance.

use squash_dynamics::{CompressorSettings, EffectSettings, LimiterSettings};
use squash_engine::{
    CompressionHistory, EffectInstance, InstanceEvent, PacketSender, ProcessingSettings,
    StatisticsPacket, TelemetrySink,
};

const SAMPLE_RATE: f64 = 44100.0;

/// Sink that forwards into a channel so the test can read packets back.
fn sink() -> (Box<dyn TelemetrySink>, crossbeam_channel::Receiver<StatisticsPacket>) {
    let (sender, rx) = PacketSender::bounded(64);
    (Box::new(sender), rx)
}

fn process_stereo(
    instance: &mut EffectInstance,
    group: usize,
    settings: &EffectSettings,
    left: &[f32],
    right: &[f32],
) -> (usize, Vec<f32>, Vec<f32>) {
    let mut out_l = vec![1.0; left.len()];
    let mut out_r = vec![1.0; right.len()];
    let done = instance.realtime_process(
        group,
        settings,
        &[left, right],
        &mut [&mut out_l[..], &mut out_r[..]],
        left.len(),
    );
    (done, out_l, out_r)
}

#[test]
fn silent_limiter_blocks_report_no_compression() {
    let settings = EffectSettings::from(LimiterSettings::default());
    let mut instance = EffectInstance::new();
    instance.realtime_initialize(&settings, SAMPLE_RATE).unwrap();
    let (sink, rx) = sink();
    let group = instance
        .realtime_add_processor(&settings, Some(sink), 2, SAMPLE_RATE)
        .unwrap();
    assert_eq!(group, 0);

    let silence = vec![0.0_f32; 512];
    let (done, out_l, out_r) = process_stereo(&mut instance, 0, &settings, &silence, &silence);
    assert_eq!(done, 512);
    assert!(out_l.iter().chain(&out_r).all(|&x| x == 0.0));

    let packet = rx.try_recv().unwrap();
    assert_eq!(packet.index_of_first_sample, 0);
    assert_eq!(packet.actual_compression_db, 0.0);
    assert_eq!(packet.target_compression_db, 0.0);
    assert!(rx.try_recv().is_err());

    let (done, _, _) = process_stereo(&mut instance, 0, &settings, &silence[..256], &silence[..256]);
    assert_eq!(done, 256);
    assert_eq!(rx.try_recv().unwrap().index_of_first_sample, 512);
}

#[test]
fn unknown_group_does_nothing() {
    let settings = EffectSettings::from(LimiterSettings::default());
    let mut instance = EffectInstance::new();
    instance.realtime_initialize(&settings, SAMPLE_RATE).unwrap();
    let (sink, rx) = sink();
    instance
        .realtime_add_processor(&settings, Some(sink), 2, SAMPLE_RATE)
        .unwrap();

    let loud = vec![0.9_f32; 128];
    let (done, out_l, _) = process_stereo(&mut instance, 3, &settings, &loud, &loud);
    assert_eq!(done, 0);
    // Output untouched.
    assert!(out_l.iter().all(|&x| x == 1.0));
    assert!(rx.try_recv().is_err());
    assert_eq!(instance.contexts()[0].sample_counter(), 0);

    instance.realtime_pass_through(7, 1000);
    assert_eq!(instance.contexts()[0].sample_counter(), 0);
}

#[test]
fn process_before_any_group_is_absorbed() {
    let settings = EffectSettings::default();
    let mut instance = EffectInstance::new();
    let silence = vec![0.0_f32; 64];
    let (done, _, _) = process_stereo(&mut instance, 0, &settings, &silence, &silence);
    assert_eq!(done, 0);
}

#[test]
fn pass_through_keeps_timestamps_continuous() {
    let settings = EffectSettings::default();
    let mut instance = EffectInstance::new();
    instance.realtime_initialize(&settings, SAMPLE_RATE).unwrap();
    let (sink, rx) = sink();
    instance
        .realtime_add_processor(&settings, Some(sink), 2, SAMPLE_RATE)
        .unwrap();

    let block = vec![0.2_f32; 512];
    process_stereo(&mut instance, 0, &settings, &block, &block);
    instance.realtime_pass_through(0, 512);
    instance.realtime_pass_through(0, 100);
    process_stereo(&mut instance, 0, &settings, &block, &block);

    let stamps: Vec<u64> = rx.try_iter().map(|p| p.index_of_first_sample).collect();
    assert_eq!(stamps, vec![0, 1124]);
    assert_eq!(instance.contexts()[0].sample_counter(), 1636);
}

#[test]
fn groups_are_independent() {
    let settings = EffectSettings::from(CompressorSettings {
        threshold_db: -30.0,
        attack_ms: 1.0,
        ..CompressorSettings::default()
    });
    let mut instance = EffectInstance::new();
    instance.realtime_initialize(&settings, SAMPLE_RATE).unwrap();
    let (loud_sink, loud_rx) = sink();
    let (quiet_sink, quiet_rx) = sink();
    let loud_group = instance
        .realtime_add_processor(&settings, Some(loud_sink), 2, SAMPLE_RATE)
        .unwrap();
    let quiet_group = instance
        .realtime_add_processor(&settings, Some(quiet_sink), 2, SAMPLE_RATE)
        .unwrap();
    assert_eq!((loud_group, quiet_group), (0, 1));

    let loud = vec![0.9_f32; 512];
    let quiet = vec![0.001_f32; 512];
    for _ in 0..4 {
        process_stereo(&mut instance, loud_group, &settings, &loud, &loud);
        process_stereo(&mut instance, quiet_group, &settings, &quiet, &quiet);
    }

    let loud_last = loud_rx.try_iter().last().unwrap();
    let quiet_last = quiet_rx.try_iter().last().unwrap();
    assert!(loud_last.actual_compression_db < -10.0);
    assert_eq!(quiet_last.actual_compression_db, 0.0);
}

#[test]
fn concurrent_groups_match_sequential() {
    let settings = EffectSettings::from(LimiterSettings {
        threshold_db: -12.0,
        ..LimiterSettings::default()
    });
    let signal: Vec<f32> = (0..4096)
        .map(|i| (i as f32 * 0.013).sin() * (i as f32 / 4096.0))
        .collect();

    let run = |threaded: bool| -> Vec<Vec<f32>> {
        let mut instance = EffectInstance::new();
        instance.realtime_initialize(&settings, SAMPLE_RATE).unwrap();
        for _ in 0..3 {
            instance
                .realtime_add_processor(&settings, Some(Box::new(Vec::<StatisticsPacket>::new())), 1, SAMPLE_RATE)
                .unwrap();
        }
        let mut outputs = vec![vec![0.0_f32; signal.len()]; 3];
        let drive = |context: &mut squash_engine::ProcessingContext, out: &mut Vec<f32>| {
            for (src, dst) in signal.chunks(512).zip(out.chunks_mut(512)) {
                context.process(&settings, &[src], &mut [dst], src.len());
            }
        };
        if threaded {
            std::thread::scope(|s| {
                for (context, out) in instance.contexts_mut().iter_mut().zip(outputs.iter_mut()) {
                    s.spawn(move || drive(context, out));
                }
            });
        } else {
            for (context, out) in instance.contexts_mut().iter_mut().zip(outputs.iter_mut()) {
                drive(context, out);
            }
        }
        assert!(instance.contexts().iter().all(|c| c.sample_counter() == 4096));
        outputs
    };

    assert_eq!(run(true), run(false));
}

#[test]
fn lifecycle_events_are_published() {
    let settings = EffectSettings::default();
    let mut instance = EffectInstance::new();
    let events = instance.subscribe();

    instance.realtime_initialize(&settings, 48000.0).unwrap();
    instance.realtime_add_processor(&settings, None, 2, 48000.0).unwrap();
    instance.realtime_resume();
    instance.realtime_finalize();

    let received: Vec<InstanceEvent> = events.try_iter().collect();
    assert_eq!(
        received,
        vec![
            InstanceEvent::ProcessingSettings(Some(ProcessingSettings { sample_rate: 48000.0 })),
            InstanceEvent::Resumed,
            InstanceEvent::ProcessingSettings(None),
        ]
    );
    assert_eq!(instance.group_count(), 0);
    assert_eq!(instance.sample_rate(), None);
}

#[test]
fn realtime_initialize_resets_groups() {
    let settings = EffectSettings::default();
    let mut instance = EffectInstance::new();
    instance.realtime_initialize(&settings, 48000.0).unwrap();
    instance.realtime_add_processor(&settings, None, 2, 48000.0).unwrap();
    instance.realtime_pass_through(0, 4800);

    instance.realtime_initialize(&settings, 96000.0).unwrap();
    assert_eq!(instance.group_count(), 0);
    assert_eq!(instance.sample_rate(), Some(96000.0));
    let group = instance.realtime_add_processor(&settings, None, 2, 96000.0).unwrap();
    assert_eq!(group, 0);
    assert_eq!(instance.contexts()[0].sample_counter(), 0);
}

#[test]
fn resume_matches_fresh_start_and_splits_history() {
    let settings = EffectSettings::from(CompressorSettings {
        threshold_db: -24.0,
        attack_ms: 5.0,
        release_ms: 60.0,
        ..CompressorSettings::default()
    });
    let block: Vec<f32> = (0..512).map(|i| (i as f32 * 0.05).sin() * 0.8).collect();

    let mut instance = EffectInstance::new();
    let events = instance.subscribe();
    instance.realtime_initialize(&settings, SAMPLE_RATE).unwrap();
    let (sink, rx) = sink();
    instance
        .realtime_add_processor(&settings, Some(sink), 2, SAMPLE_RATE)
        .unwrap();

    let (_, first_l, first_r) = process_stereo(&mut instance, 0, &settings, &block, &block);
    process_stereo(&mut instance, 0, &settings, &block, &block);
    instance.realtime_pass_through(0, 2048);
    instance.realtime_resume();
    let (_, resumed_l, resumed_r) = process_stereo(&mut instance, 0, &settings, &block, &block);

    assert_eq!(resumed_l, first_l);
    assert_eq!(resumed_r, first_r);

    let mut history = CompressionHistory::new(SAMPLE_RATE);
    let packets: Vec<StatisticsPacket> = rx.try_iter().collect();
    history.push(&packets[..2]);
    for event in events.try_iter() {
        if event == InstanceEvent::Resumed {
            history.begin_new_segment();
        }
    }
    history.push(&packets[2..]);

    assert_eq!(history.segments().len(), 2);
    let resumed_at = history.segments()[1][0].time;
    assert!((resumed_at - 3072.0 / SAMPLE_RATE as f32).abs() < 1e-6);
}
