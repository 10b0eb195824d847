//! Offline rendering through the effect instance.

use crate::commands::common::{SettingsArgs, peak_dbfs};
use crate::wav::{StereoSamples, read_wav_stereo, write_wav_stereo};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use squash_engine::{ChannelMap, EffectInstance, OFFLINE_BLOCK_SIZE};
use std::path::PathBuf;

#[derive(Args)]
pub struct RenderArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    #[command(flatten)]
    settings: SettingsArgs,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let (name, settings) = args.settings.resolve()?;
    if !matches!(args.bit_depth, 16 | 24 | 32) {
        anyhow::bail!("Unsupported bit depth {} (expected 16, 24, or 32)", args.bit_depth);
    }

    println!("Reading {}...", args.input.display());
    let (samples, spec) = read_wav_stereo(&args.input)?;
    let sample_rate = f64::from(spec.sample_rate);
    println!(
        "  {} frames, {} channel(s), {} Hz, {:.2}s",
        samples.len(),
        spec.channels,
        spec.sample_rate,
        samples.len() as f64 / sample_rate
    );

    let channels = if spec.channels == 1 {
        ChannelMap::Mono
    } else {
        ChannelMap::Stereo
    };

    let mut instance = EffectInstance::new();
    instance.process_initialize(&settings, sample_rate, channels)?;
    let latency = instance.latency(&settings, sample_rate) as usize;
    println!(
        "Rendering with {} ({}), latency {} samples compensated",
        name,
        settings.kind(),
        latency
    );

    // Flush the lookahead with trailing silence, then drop the leading
    // `latency` frames so the output lines up with the input.
    let frames = samples.len();
    let mut padded = samples.clone();
    padded.left.resize(frames + latency, 0.0);
    padded.right.resize(frames + latency, 0.0);

    let pb = ProgressBar::new(padded.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let mut output = StereoSamples {
        left: vec![0.0; padded.len()],
        right: vec![0.0; padded.len()],
    };

    for (((in_l, in_r), out_l), out_r) in padded
        .left
        .chunks(OFFLINE_BLOCK_SIZE)
        .zip(padded.right.chunks(OFFLINE_BLOCK_SIZE))
        .zip(output.left.chunks_mut(OFFLINE_BLOCK_SIZE))
        .zip(output.right.chunks_mut(OFFLINE_BLOCK_SIZE))
    {
        let len = in_l.len();
        instance.process_block(&settings, &[in_l, in_r], &mut [out_l, out_r], len);
        pb.inc(len as u64);
    }

    output.left.drain(..latency);
    output.right.drain(..latency);

    pb.finish_with_message("done");
    instance.process_finalize();

    println!("\nPeaks:");
    println!("  Input:  {}", peak_dbfs(samples.peak()));
    println!("  Output: {}", peak_dbfs(output.peak()));

    println!("\nWriting {}...", args.output.display());
    write_wav_stereo(&args.output, &output, spec.sample_rate, args.bit_depth)?;
    println!("Done!");

    Ok(())
}
