//! Realtime simulation: several channel groups fed block by block.
//!
//! Every group processes the same stereo input on its own scoped thread, the
//! way a host would run one plugin instance per track. Telemetry flows
//! through bounded channels into one [`CompressionHistory`] per group.

use crate::commands::common::{SettingsArgs, peak_dbfs};
use crate::wav::read_wav_stereo;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use squash_dynamics::{display_db_range, max_compression_db};
use squash_engine::{
    AUDIO_CHANNELS, CompressionHistory, EffectInstance, InstanceEvent, MAX_TIME_SECONDS,
    PacketSender, ProcessingContext, REALTIME_BLOCK_SIZE, StatisticsPacket,
};
use std::path::PathBuf;

/// Packets buffered per group between drains.
const PACKET_CAPACITY: usize = 64;

#[derive(Args)]
pub struct SimulateArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Number of channel groups
    #[arg(short, long, default_value = "1")]
    groups: usize,

    /// Pause and resume every group at this time (seconds)
    #[arg(long, value_name = "SECONDS")]
    resume_at: Option<f64>,

    #[command(flatten)]
    settings: SettingsArgs,
}

/// Whole-run compression figures for one group.
#[derive(Debug, Default)]
struct GroupSummary {
    packets: usize,
    max_target_db: f32,
    max_actual_db: f32,
}

impl GroupSummary {
    fn record(&mut self, packets: &[StatisticsPacket]) {
        self.packets += packets.len();
        for packet in packets {
            self.max_target_db = self.max_target_db.min(packet.target_compression_db);
            self.max_actual_db = self.max_actual_db.min(packet.actual_compression_db);
        }
    }
}

pub fn run(args: SimulateArgs) -> anyhow::Result<()> {
    if args.groups == 0 {
        anyhow::bail!("--groups must be at least 1");
    }
    let (name, settings) = args.settings.resolve()?;

    println!("Reading {}...", args.input.display());
    let (samples, spec) = read_wav_stereo(&args.input)?;
    let sample_rate = f64::from(spec.sample_rate);

    let mut instance = EffectInstance::new();
    let events = instance.subscribe();
    instance.realtime_initialize(&settings, sample_rate)?;

    let mut receivers = Vec::with_capacity(args.groups);
    for _ in 0..args.groups {
        let (sender, rx) = PacketSender::bounded(PACKET_CAPACITY);
        instance.realtime_add_processor(
            &settings,
            Some(Box::new(sender)),
            AUDIO_CHANNELS,
            sample_rate,
        )?;
        receivers.push(rx);
    }

    println!(
        "Simulating {} ({}) on {} group(s), {}-sample blocks, latency {} samples",
        name,
        settings.kind(),
        args.groups,
        REALTIME_BLOCK_SIZE,
        instance.latency(&settings, sample_rate)
    );

    let mut histories: Vec<CompressionHistory> = (0..args.groups)
        .map(|_| CompressionHistory::new(sample_rate))
        .collect();
    let mut summaries: Vec<GroupSummary> = (0..args.groups).map(|_| GroupSummary::default()).collect();
    let mut outputs: Vec<[Vec<f32>; 2]> = (0..args.groups)
        .map(|_| [vec![0.0; REALTIME_BLOCK_SIZE], vec![0.0; REALTIME_BLOCK_SIZE]])
        .collect();
    let mut packets = Vec::with_capacity(PACKET_CAPACITY);
    let mut output_peak = 0.0_f32;

    let resume_frame = args.resume_at.map(|seconds| (seconds * sample_rate) as usize);
    let mut resumed = false;

    let pb = ProgressBar::new(samples.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let mut pos = 0;
    while pos < samples.len() {
        if let Some(frame) = resume_frame
            && !resumed
            && pos >= frame
        {
            instance.realtime_resume();
            resumed = true;
        }
        for event in events.try_iter() {
            if event == InstanceEvent::Resumed {
                for history in &mut histories {
                    history.begin_new_segment();
                }
            }
        }

        let len = REALTIME_BLOCK_SIZE.min(samples.len() - pos);
        let input: [&[f32]; 2] = [
            &samples.left[pos..pos + len],
            &samples.right[pos..pos + len],
        ];

        std::thread::scope(|s| {
            for (context, out) in instance.contexts_mut().iter_mut().zip(outputs.iter_mut()) {
                let settings = &settings;
                let input = &input;
                s.spawn(move || {
                    let [left, right] = out;
                    context.process(
                        settings,
                        &input[..],
                        &mut [&mut left[..len], &mut right[..len]],
                        len,
                    );
                });
            }
        });

        for ((rx, history), summary) in receivers
            .iter()
            .zip(&mut histories)
            .zip(&mut summaries)
        {
            packets.clear();
            packets.extend(rx.try_iter());
            history.push(&packets);
            summary.record(&packets);
        }

        output_peak = outputs
            .iter()
            .flat_map(|[left, right]| left[..len].iter().chain(&right[..len]))
            .fold(output_peak, |m, s| m.max(s.abs()));

        pos += len;
        pb.inc(len as u64);
    }

    pb.finish_with_message("done");

    let dropped: u64 = instance
        .contexts()
        .iter()
        .map(ProcessingContext::dropped_packets)
        .sum();
    instance.realtime_finalize();

    println!("\nPeaks:");
    println!("  Input:  {}", peak_dbfs(samples.peak()));
    println!("  Output: {}", peak_dbfs(output_peak));

    let processor_settings = settings.processor_settings();
    println!(
        "\nCompression (curve maximum {:.1} dB, display range {:.1} dB, history keeps the last {}s):",
        max_compression_db(&processor_settings),
        display_db_range(&processor_settings),
        MAX_TIME_SECONDS
    );
    for (group, (history, summary)) in histories.iter().zip(&summaries).enumerate() {
        let points: usize = history.segments().iter().map(Vec::len).sum();
        println!(
            "  Group {}: {} packets, max target {:.1} dB, max actual {:.1} dB, {} points in {} segment(s)",
            group,
            summary.packets,
            summary.max_target_db,
            summary.max_actual_db,
            points,
            history.segments().len()
        );
    }
    if dropped > 0 {
        println!("  {dropped} packet(s) dropped");
    }

    Ok(())
}
