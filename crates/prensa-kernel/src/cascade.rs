//! The full dynamics kernel: gate, three-stage cascade, saturation, mix,
//! trim, metering.
//!
//! Per sample and channel the signal runs gate -> stage 1 -> stage 2 ->
//! stage 3 -> saturation, is mixed against the post-gate dry signal, and is
//! trimmed once at the end. Each stage's detector observes the previous
//! stage's output, so the stages interact: stage 1 does the heavy lifting,
//! stage 2 smooths what stage 1 let through on a slower clock, and stage 3
//! is a fast ceiling that catches what the makeup gain throws past it.
//!
//! All tuning numbers live in the three curve maps and stage configs below.
//! The intensity knob drives stages 1 and 2 through a two-regime mapping:
//! below the breakpoint the curves deepen gently ("normal"), above it they
//! accelerate toward the nuclear endpoint (threshold near -60 dB at 200:1
//! for stage 1 when the knob is pinned).

use prensa_core::{GainReductionMeter, db_to_linear, lerp, wet_dry_mix};

use crate::gate::{GateConfig, NoiseGate};
use crate::kernel::DynamicsKernel;
use crate::params::ParamAddress;
use crate::saturation::Saturator;
use crate::stage::{CompressorStage, CurvePoint, StageConfig, StageCurveMap};

/// Knob position where the nuclear regime begins for stages 1 and 2.
const REGIME_BREAKPOINT: f32 = 8.0;

const STAGE1_CURVES: StageCurveMap = StageCurveMap {
    breakpoint: REGIME_BREAKPOINT,
    at_zero: CurvePoint {
        threshold_db: -10.0,
        ratio: 1.5,
        knee_db: 12.0,
    },
    at_breakpoint: CurvePoint {
        threshold_db: -40.0,
        ratio: 8.0,
        knee_db: 6.0,
    },
    at_max: CurvePoint {
        threshold_db: -60.0,
        ratio: 200.0,
        knee_db: 1.0,
    },
};

const STAGE2_CURVES: StageCurveMap = StageCurveMap {
    breakpoint: REGIME_BREAKPOINT,
    at_zero: CurvePoint {
        threshold_db: -10.0,
        ratio: 1.2,
        knee_db: 9.0,
    },
    at_breakpoint: CurvePoint {
        threshold_db: -30.0,
        ratio: 3.0,
        knee_db: 4.0,
    },
    at_max: CurvePoint {
        threshold_db: -36.0,
        ratio: 4.0,
        knee_db: 3.0,
    },
};

/// Stage 3 never moves: a hard ceiling just under full scale.
const CEILING_CURVE: CurvePoint = CurvePoint {
    threshold_db: -1.0,
    ratio: 20.0,
    knee_db: 1.0,
};

const STAGE_CONFIGS: [StageConfig; 3] = [
    StageConfig {
        curve_map: STAGE1_CURVES,
        time_scale: 1.0,
        auto_makeup: true,
    },
    StageConfig {
        curve_map: STAGE2_CURVES,
        time_scale: 2.5,
        auto_makeup: true,
    },
    StageConfig {
        curve_map: StageCurveMap::fixed(CEILING_CURVE),
        time_scale: 0.1,
        auto_makeup: false,
    },
];

/// Attack time endpoints for the speed knob, in seconds (knob 0 -> knob 10).
const ATTACK_RANGE_SECS: (f32, f32) = (0.050, 0.0005);
/// Release time endpoints for the speed knob, in seconds.
const RELEASE_RANGE_SECS: (f32, f32) = (0.500, 0.030);

const SATURATION_DRIVE: f32 = 1.6;
const SATURATION_BLEND: f32 = 0.25;

/// The full gate/cascade/saturation dynamics kernel.
///
/// Construct with [`new`](Self::new), then drive through
/// [`DynamicsKernel`]. Until `initialize` delivers a sample rate the
/// detectors are frozen and `process` passes audio at whatever gain the
/// parameters imply; hosts call `initialize` first.
#[derive(Debug)]
pub struct CascadeKernel {
    sample_rate: f32,
    compress: f32,
    speed: f32,
    gate_amount: f32,
    output_gain_db: f32,
    mix: f32,
    bypassed: bool,
    /// Cached linear output trim, re-derived when the dB value changes.
    trim: f32,
    gate: NoiseGate,
    stages: [CompressorStage; 3],
    saturator: Saturator,
    meter: GainReductionMeter,
    /// Most recent per-stage reduction (dB, <= 0) on channel 0. Diagnostic.
    last_reduction_db: [f32; 3],
}

impl CascadeKernel {
    /// Create a kernel at parameter defaults, not yet initialized.
    pub fn new() -> Self {
        let mut kernel = Self {
            sample_rate: 0.0,
            compress: ParamAddress::Compress.spec().default,
            speed: ParamAddress::Speed.spec().default,
            gate_amount: ParamAddress::Gate.spec().default,
            output_gain_db: ParamAddress::OutputGain.spec().default,
            mix: ParamAddress::Mix.spec().default,
            bypassed: false,
            trim: 1.0,
            gate: NoiseGate::new(GateConfig::default()),
            stages: [
                CompressorStage::new(STAGE_CONFIGS[0]),
                CompressorStage::new(STAGE_CONFIGS[1]),
                CompressorStage::new(STAGE_CONFIGS[2]),
            ],
            saturator: Saturator::new(SATURATION_DRIVE, SATURATION_BLEND),
            meter: GainReductionMeter::new(),
            last_reduction_db: [0.0; 3],
        };
        kernel.apply_compress();
        kernel.apply_gate();
        kernel.apply_trim();
        kernel
    }

    /// Most recent gain reduction applied by each stage on channel 0, in dB
    /// (<= 0). For diagnostics and tests, not for display metering.
    pub fn stage_reduction_db(&self) -> [f32; 3] {
        self.last_reduction_db
    }

    fn apply_compress(&mut self) {
        for stage in &mut self.stages {
            stage.set_intensity(self.compress);
        }
    }

    fn apply_speed(&mut self) {
        let t = self.speed / 10.0;
        let attack = lerp(ATTACK_RANGE_SECS.0, ATTACK_RANGE_SECS.1, t);
        let release = lerp(RELEASE_RANGE_SECS.0, RELEASE_RANGE_SECS.1, t);
        for stage in &mut self.stages {
            stage.set_ballistics(attack, release, self.sample_rate);
        }
    }

    fn apply_gate(&mut self) {
        self.gate.set_amount(self.gate_amount);
    }

    fn apply_trim(&mut self) {
        self.trim = db_to_linear(self.output_gain_db);
    }

    fn reset_state(&mut self) {
        self.gate.reset();
        for stage in &mut self.stages {
            stage.reset();
        }
        self.last_reduction_db = [0.0; 3];
        self.meter.reset();
    }
}

impl Default for CascadeKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl DynamicsKernel for CascadeKernel {
    fn initialize(&mut self, _input_channels: usize, _output_channels: usize, sample_rate: f32) {
        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, "initializing cascade kernel");
        self.sample_rate = sample_rate;
        self.gate.set_sample_rate(sample_rate);
        self.apply_speed();
        self.reset_state();
    }

    fn de_initialize(&mut self) {
        self.sample_rate = 0.0;
        self.reset_state();
    }

    fn set_parameter(&mut self, address: u32, value: f32) {
        let Some(address) = ParamAddress::from_raw(address) else {
            return;
        };
        let value = address.spec().clamp(value);
        #[cfg(feature = "tracing")]
        tracing::trace!(?address, value, "parameter change");
        match address {
            ParamAddress::Compress => {
                self.compress = value;
                self.apply_compress();
            }
            ParamAddress::Speed => {
                self.speed = value;
                self.apply_speed();
            }
            ParamAddress::Gate => {
                self.gate_amount = value;
                self.apply_gate();
            }
            ParamAddress::OutputGain => {
                self.output_gain_db = value;
                self.apply_trim();
            }
            ParamAddress::Mix => self.mix = value,
            ParamAddress::Bypass => self.bypassed = value >= 0.5,
        }
    }

    fn get_parameter(&self, address: u32) -> f32 {
        match ParamAddress::from_raw(address) {
            Some(ParamAddress::Compress) => self.compress,
            Some(ParamAddress::Speed) => self.speed,
            Some(ParamAddress::Gate) => self.gate_amount,
            Some(ParamAddress::OutputGain) => self.output_gain_db,
            Some(ParamAddress::Mix) => self.mix,
            Some(ParamAddress::Bypass) => {
                if self.bypassed {
                    1.0
                } else {
                    0.0
                }
            }
            None => 0.0,
        }
    }

    fn set_bypass(&mut self, bypassed: bool) {
        self.bypassed = bypassed;
    }

    fn is_bypassed(&self) -> bool {
        self.bypassed
    }

    fn process(
        &mut self,
        inputs: &[&[f32]],
        outputs: &mut [&mut [f32]],
        _start_time: i64,
        frames: usize,
    ) {
        if frames == 0 {
            return;
        }

        if self.bypassed {
            for (input, output) in inputs.iter().zip(outputs.iter_mut()) {
                let n = frames.min(input.len()).min(output.len());
                output[..n].copy_from_slice(&input[..n]);
            }
            // No envelope updates in bypass; the meter snaps to rest but
            // still counts the buffer.
            self.meter.clear();
            return;
        }

        let mut reduction_sum = 0.0_f32;
        for (ch, (input, output)) in inputs.iter().zip(outputs.iter_mut()).enumerate() {
            let n = frames.min(input.len()).min(output.len());
            for i in 0..n {
                let dry = self.gate.process_sample(ch, input[i]);

                let mut wet = dry;
                let mut frame_reduction = 0.0;
                for (s, stage) in self.stages.iter_mut().enumerate() {
                    let (next, reduction_db) = stage.process_sample(ch, wet);
                    wet = next;
                    frame_reduction += reduction_db;
                    if ch == 0 {
                        self.last_reduction_db[s] = reduction_db;
                    }
                }

                let shaped = self.saturator.shape(wet);
                output[i] = wet_dry_mix(dry, shaped, self.mix) * self.trim;

                if ch == 0 {
                    reduction_sum -= frame_reduction;
                }
            }
        }

        self.meter
            .publish(reduction_sum / frames as f32, frames as f32 / self.sample_rate);
    }

    fn meter(&self) -> &GainReductionMeter {
        &self.meter
    }
}
