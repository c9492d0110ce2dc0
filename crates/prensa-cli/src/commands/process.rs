//! File-based dynamics processing command.

use crate::wav::{WavSpec, read_wav, write_wav};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use prensa_core::MeterReader;
use prensa_kernel::{CascadeKernel, DynamicsKernel, ParamAddress, RenderEvent};
use std::path::PathBuf;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Compression intensity (0-10)
    #[arg(short, long, default_value = "5.0")]
    compress: f32,

    /// Attack/release speed (0-10)
    #[arg(short, long, default_value = "3.0")]
    speed: f32,

    /// Gate amount (0-10, 0 = off)
    #[arg(short, long, default_value = "0.0")]
    gate: f32,

    /// Output gain in dB (-24 to 24)
    #[arg(short, long, default_value = "0.0")]
    output_gain: f32,

    /// Dry/wet mix (0-1)
    #[arg(short, long, default_value = "1.0")]
    mix: f32,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    println!("Reading {}...", args.input.display());
    tracing::info!(input = %args.input.display(), "loading WAV file");
    let (input, spec) = read_wav(&args.input)?;
    let channels = input.len();
    let frames = input[0].len();
    let sample_rate = spec.sample_rate as f32;

    println!(
        "  {} channel(s), {} frames, {} Hz, {:.2}s",
        channels,
        frames,
        spec.sample_rate,
        frames as f32 / sample_rate
    );

    let mut kernel = CascadeKernel::new();
    kernel.initialize(channels, channels, sample_rate);

    // Deliver the knob settings the way a host schedules them.
    let settings = [
        (ParamAddress::Compress, args.compress),
        (ParamAddress::Speed, args.speed),
        (ParamAddress::Gate, args.gate),
        (ParamAddress::OutputGain, args.output_gain),
        (ParamAddress::Mix, args.mix),
    ];
    for (address, value) in settings {
        kernel.handle_event(
            0,
            &RenderEvent::Parameter {
                address: address.raw(),
                value,
            },
        );
    }

    println!(
        "Processing (compress {:.1}, speed {:.1}, gate {:.1}, output {:+.1} dB, mix {:.2})...",
        kernel.get_parameter(ParamAddress::Compress.raw()),
        kernel.get_parameter(ParamAddress::Speed.raw()),
        kernel.get_parameter(ParamAddress::Gate.raw()),
        kernel.get_parameter(ParamAddress::OutputGain.raw()),
        kernel.get_parameter(ParamAddress::Mix.raw()),
    );

    let pb = ProgressBar::new(frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let mut output: Vec<Vec<f32>> = vec![vec![0.0; frames]; channels];
    let mut reader = MeterReader::new();
    let mut max_reduction_db = 0.0_f32;
    let block_size = args.block_size.max(1);

    let mut offset = 0;
    while offset < frames {
        let end = (offset + block_size).min(frames);
        let inputs: Vec<&[f32]> = input.iter().map(|c| &c[offset..end]).collect();
        let mut outputs: Vec<&mut [f32]> =
            output.iter_mut().map(|c| &mut c[offset..end]).collect();

        kernel.process(&inputs, &mut outputs, offset as i64, end - offset);
        max_reduction_db = max_reduction_db.max(reader.poll(kernel.meter()));

        pb.set_position(end as u64);
        offset = end;
    }
    pb.finish_with_message("done");
    tracing::info!(
        frames,
        channels,
        max_reduction_db,
        "processing finished"
    );

    println!("\nStats:");
    for ch in 0..channels {
        println!(
            "  ch {}: in  RMS {:6.1} dB, peak {:6.1} dB | out RMS {:6.1} dB, peak {:6.1} dB",
            ch,
            display_db(rms(&input[ch])),
            display_db(peak(&input[ch])),
            display_db(rms(&output[ch])),
            display_db(peak(&output[ch])),
        );
    }
    println!(
        "  gain reduction: {:.1} dB now, {:.1} dB max",
        kernel.gain_reduction_db(),
        max_reduction_db
    );

    let out_spec = WavSpec {
        channels: channels as u16,
        sample_rate: spec.sample_rate,
        bits_per_sample: args.bit_depth,
    };

    println!("\nWriting {}...", args.output.display());
    write_wav(&args.output, &output, out_spec)?;
    println!("Done!");

    Ok(())
}

fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0, f32::max)
}

/// dB for the stats printout, with silence pinned to a display floor.
fn display_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        -120.0
    } else {
        20.0 * linear.log10()
    }
}
