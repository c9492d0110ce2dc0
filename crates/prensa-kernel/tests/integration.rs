//! End-to-end tests for the cascade kernel: parameter contract, bypass,
//! stage engagement, metering, and the nuclear-intensity scenario.

use prensa_core::MeterReader;
use prensa_kernel::params::ALL_PARAMS;
use prensa_kernel::{CascadeKernel, DynamicsKernel, ParamAddress, RenderEvent};

const SAMPLE_RATE: f32 = 44100.0;

fn fresh_kernel() -> CascadeKernel {
    let mut kernel = CascadeKernel::new();
    kernel.initialize(1, 1, SAMPLE_RATE);
    kernel
}

/// Run one mono buffer through the kernel and return the output.
fn process_mono(kernel: &mut CascadeKernel, input: &[f32]) -> Vec<f32> {
    let mut output = vec![0.0_f32; input.len()];
    kernel.process(&[input], &mut [&mut output[..]], 0, input.len());
    output
}

fn square_wave(frames: usize, period: usize, amplitude: f32) -> Vec<f32> {
    (0..frames)
        .map(|i| {
            if (i / (period / 2)) % 2 == 0 {
                amplitude
            } else {
                -amplitude
            }
        })
        .collect()
}

fn peak(buffer: &[f32]) -> f32 {
    buffer.iter().fold(0.0_f32, |m, &x| m.max(x.abs()))
}

#[test]
fn fresh_kernel_reports_defaults() {
    let kernel = fresh_kernel();
    for address in ALL_PARAMS {
        assert_eq!(
            kernel.get_parameter(address.raw()),
            address.spec().default,
            "{} default mismatch",
            address.spec().name
        );
    }
}

#[test]
fn set_parameter_clamps_and_reads_back() {
    let mut kernel = fresh_kernel();

    kernel.set_parameter(ParamAddress::Compress.raw(), 42.0);
    assert_eq!(kernel.get_parameter(ParamAddress::Compress.raw()), 10.0);

    kernel.set_parameter(ParamAddress::Gate.raw(), -3.0);
    assert_eq!(kernel.get_parameter(ParamAddress::Gate.raw()), 0.0);

    kernel.set_parameter(ParamAddress::OutputGain.raw(), 100.0);
    assert_eq!(kernel.get_parameter(ParamAddress::OutputGain.raw()), 24.0);

    kernel.set_parameter(ParamAddress::Mix.raw(), 0.25);
    assert_eq!(kernel.get_parameter(ParamAddress::Mix.raw()), 0.25);
}

#[test]
fn unknown_address_is_a_defined_no_op() {
    let mut kernel = fresh_kernel();
    kernel.set_parameter(99, 7.0);
    assert_eq!(kernel.get_parameter(99), 0.0);
    // Known parameters are unaffected.
    for address in ALL_PARAMS {
        assert_eq!(kernel.get_parameter(address.raw()), address.spec().default);
    }
}

#[test]
fn bypass_passes_audio_through_untouched() {
    let mut kernel = fresh_kernel();
    kernel.set_parameter(ParamAddress::Compress.raw(), 10.0);
    kernel.set_bypass(true);
    assert!(kernel.is_bypassed());

    let input: Vec<f32> = (0..512).map(|i| ((i as f32) * 0.013).sin() * 0.8).collect();
    let output = process_mono(&mut kernel, &input);
    assert_eq!(output, input);
}

#[test]
fn bypass_forces_meter_to_rest_but_keeps_counting() {
    let mut kernel = fresh_kernel();
    kernel.set_parameter(ParamAddress::Compress.raw(), 10.0);

    // Build up real gain reduction first.
    let loud = vec![1.0_f32; 512];
    for _ in 0..20 {
        process_mono(&mut kernel, &loud);
    }
    assert!(kernel.gain_reduction_db() > 1.0);
    let before = kernel.meter().generation();

    kernel.set_bypass(true);
    for _ in 0..5 {
        process_mono(&mut kernel, &loud);
    }
    assert_eq!(kernel.gain_reduction_db(), 0.0);
    assert_eq!(kernel.meter().generation(), before + 5);
}

#[test]
fn full_scale_engages_all_three_stages() {
    let mut kernel = fresh_kernel();
    kernel.set_parameter(ParamAddress::Compress.raw(), 10.0);
    kernel.set_parameter(ParamAddress::Speed.raw(), 10.0);

    // One short buffer: stage 3 engages hardest on the onset, before the
    // earlier stages' envelopes settle.
    let input = vec![1.0_f32; 64];
    process_mono(&mut kernel, &input);

    let reductions = kernel.stage_reduction_db();
    for (i, r) in reductions.iter().enumerate() {
        assert!(*r < -0.5, "stage {i} not engaged: {r} dB");
        assert!(*r <= 0.0);
    }
}

#[test]
fn nuclear_intensity_reaches_deep_reduction() {
    let mut kernel = fresh_kernel();
    kernel.set_parameter(ParamAddress::Compress.raw(), 10.0);
    kernel.set_parameter(ParamAddress::Speed.raw(), 10.0);

    // ~0.5 s of full-scale square wave to reach steady state.
    let input = square_wave(512, 100, 1.0);
    let mut output = Vec::new();
    for _ in 0..40 {
        output = process_mono(&mut kernel, &input);
    }

    // Stage 1 at the nuclear endpoint: threshold near -60 dB at 200:1
    // leaves roughly 60 * (1 - 1/200) dB of reduction for 0 dB input.
    let stage1 = kernel.stage_reduction_db()[0];
    assert!(
        (-61.0..-55.0).contains(&stage1),
        "stage 1 reduction {stage1} dB out of expected range"
    );

    assert!(peak(&output) < 0.5, "output {} not squashed", peak(&output));
    assert!(kernel.gain_reduction_db() > 10.0);
}

#[test]
fn default_settings_compress_a_hot_sine() {
    let mut kernel = fresh_kernel();
    let input: Vec<f32> = (0..512)
        .map(|i| (2.0 * std::f32::consts::PI * 441.0 * i as f32 / SAMPLE_RATE).sin() * 0.9)
        .collect();

    let mut output = Vec::new();
    for _ in 0..40 {
        output = process_mono(&mut kernel, &input);
    }
    assert!(peak(&output) < peak(&input));
    assert!(kernel.gain_reduction_db() > 0.5);
}

#[test]
fn higher_speed_reaches_reduction_sooner() {
    let input = vec![1.0_f32; 512];

    let mut slow = fresh_kernel();
    slow.set_parameter(ParamAddress::Compress.raw(), 8.0);
    slow.set_parameter(ParamAddress::Speed.raw(), 0.0);
    process_mono(&mut slow, &input);

    let mut fast = fresh_kernel();
    fast.set_parameter(ParamAddress::Compress.raw(), 8.0);
    fast.set_parameter(ParamAddress::Speed.raw(), 10.0);
    process_mono(&mut fast, &input);

    let slow_red = slow.stage_reduction_db()[0];
    let fast_red = fast.stage_reduction_db()[0];
    assert!(
        fast_red < slow_red - 5.0,
        "fast {fast_red} dB should lead slow {slow_red} dB after one buffer"
    );
}

#[test]
fn mix_zero_returns_the_dry_signal() {
    let mut kernel = fresh_kernel();
    kernel.set_parameter(ParamAddress::Compress.raw(), 10.0);
    kernel.set_parameter(ParamAddress::Mix.raw(), 0.0);

    let input: Vec<f32> = (0..512).map(|i| ((i as f32) * 0.07).sin() * 0.7).collect();
    let output = process_mono(&mut kernel, &input);
    for (o, i) in output.iter().zip(&input) {
        assert!((o - i).abs() < 1e-6, "dry path altered: {o} vs {i}");
    }
}

#[test]
fn output_gain_scales_the_result() {
    let input: Vec<f32> = (0..512).map(|i| ((i as f32) * 0.05).sin() * 0.5).collect();

    let mut unity = fresh_kernel();
    let reference = process_mono(&mut unity, &input);

    let mut trimmed = fresh_kernel();
    trimmed.set_parameter(ParamAddress::OutputGain.raw(), -6.0206);
    let halved = process_mono(&mut trimmed, &input);

    for (h, r) in halved.iter().zip(&reference) {
        assert!((h - r * 0.5).abs() < 1e-4, "{h} vs {}", r * 0.5);
    }
}

#[test]
fn gate_removes_low_level_noise() {
    let mut kernel = fresh_kernel();
    kernel.set_parameter(ParamAddress::Gate.raw(), 8.0);
    kernel.set_parameter(ParamAddress::Mix.raw(), 1.0);

    // -60 dB hiss, well under the knob-8 threshold of about -32 dB.
    let hiss = vec![0.001_f32; 512];
    let mut output = Vec::new();
    for _ in 0..100 {
        output = process_mono(&mut kernel, &hiss);
    }
    assert!(peak(&output) < 1e-4, "gate left {}", peak(&output));
}

#[test]
fn gate_knob_zero_leaves_quiet_audio_alone() {
    let mut kernel = fresh_kernel();
    kernel.set_parameter(ParamAddress::Mix.raw(), 0.0);

    let quiet = vec![0.001_f32; 512];
    let output = process_mono(&mut kernel, &quiet);
    for (o, i) in output.iter().zip(&quiet) {
        assert!((o - i).abs() < 1e-7);
    }
}

#[test]
fn parameter_events_dispatch_to_set_parameter() {
    let mut kernel = fresh_kernel();
    kernel.handle_event(
        0,
        &RenderEvent::Parameter {
            address: ParamAddress::Compress.raw(),
            value: 9.0,
        },
    );
    assert_eq!(kernel.get_parameter(ParamAddress::Compress.raw()), 9.0);

    // MIDI is acknowledged and ignored.
    kernel.handle_event(0, &RenderEvent::Midi { bytes: [0x90, 60, 100] });
    assert_eq!(kernel.get_parameter(ParamAddress::Compress.raw()), 9.0);
}

#[test]
fn meter_generation_counts_processed_buffers() {
    let mut kernel = fresh_kernel();
    let input = vec![0.5_f32; 256];
    for _ in 0..12 {
        process_mono(&mut kernel, &input);
    }
    assert_eq!(kernel.meter().generation(), 12);
}

#[test]
fn stalled_reader_decays_to_rest() {
    let mut kernel = fresh_kernel();
    kernel.set_parameter(ParamAddress::Compress.raw(), 10.0);
    let input = vec![1.0_f32; 512];
    for _ in 0..40 {
        process_mono(&mut kernel, &input);
    }

    let mut reader = MeterReader::new();
    let running = reader.poll(kernel.meter());
    assert!(running > 1.0);

    // Host stops calling process; the display must fall, not freeze.
    let mut previous = running;
    for _ in 0..100 {
        let shown = reader.poll(kernel.meter());
        assert!(shown < previous || shown == 0.0);
        previous = shown;
    }
    assert_eq!(previous, 0.0);
}

#[test]
fn stereo_channels_process_independently() {
    let mut kernel = fresh_kernel();
    kernel.set_parameter(ParamAddress::Compress.raw(), 8.0);
    kernel.set_parameter(ParamAddress::Speed.raw(), 10.0);

    let loud = vec![1.0_f32; 512];
    let silent = vec![0.0_f32; 512];
    let mut left = vec![0.0_f32; 512];
    let mut right = vec![0.0_f32; 512];
    for _ in 0..20 {
        kernel.process(
            &[&loud[..], &silent[..]],
            &mut [&mut left[..], &mut right[..]],
            0,
            512,
        );
    }

    assert!(peak(&left) < 1.0, "loud channel uncompressed");
    // The silent channel picks up only makeup-gain-amplified silence.
    assert!(peak(&right) < 1e-6, "silent channel produced {}", peak(&right));
}

#[test]
fn excess_channels_are_bounded_not_rejected() {
    let mut kernel = fresh_kernel();
    let input = vec![0.5_f32; 128];
    let inputs: Vec<&[f32]> = (0..12).map(|_| &input[..]).collect();
    let mut buffers: Vec<Vec<f32>> = (0..12).map(|_| vec![0.0; 128]).collect();
    let mut outputs: Vec<&mut [f32]> = buffers.iter_mut().map(|b| &mut b[..]).collect();

    kernel.process(&inputs, &mut outputs, 0, 128);
    for buffer in &buffers {
        assert!(buffer.iter().all(|x| x.is_finite()));
    }
}

#[test]
fn de_initialize_clears_state_but_keeps_parameters() {
    let mut kernel = fresh_kernel();
    kernel.set_parameter(ParamAddress::Compress.raw(), 10.0);
    let input = vec![1.0_f32; 512];
    for _ in 0..20 {
        process_mono(&mut kernel, &input);
    }

    kernel.de_initialize();
    assert_eq!(kernel.meter().generation(), 0);
    assert_eq!(kernel.gain_reduction_db(), 0.0);
    assert_eq!(kernel.get_parameter(ParamAddress::Compress.raw()), 10.0);

    // Usable again after a fresh initialize.
    kernel.initialize(1, 1, SAMPLE_RATE);
    let out = process_mono(&mut kernel, &input);
    assert!(out.iter().all(|x| x.is_finite()));
}

#[test]
fn zero_frames_is_a_no_op() {
    let mut kernel = fresh_kernel();
    let input: [f32; 0] = [];
    let mut output: [f32; 0] = [];
    kernel.process(&[&input[..]], &mut [&mut output[..]], 0, 0);
    assert_eq!(kernel.meter().generation(), 0);
}
