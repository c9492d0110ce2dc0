//! Gain-only kernel variant.
//!
//! Same host contract as the cascade, trivial signal path: multiply by a
//! linear gain. Exists so a host can swap kernels without changing any of
//! its render plumbing, and as the smallest possible reference for what a
//! [`DynamicsKernel`] must do — including keeping the meter generation
//! advancing even though it never reduces gain.

use prensa_core::GainReductionMeter;

use crate::kernel::DynamicsKernel;
use crate::params::ParamSpec;

/// Linear gain parameter, address 0.
pub const TRIM_GAIN: u32 = 0;
/// Bypass flag, address 1.
pub const TRIM_BYPASS: u32 = 1;

const GAIN_SPEC: ParamSpec = ParamSpec {
    name: "Gain",
    identifier: "gain",
    min: 0.0,
    max: 2.0,
    default: 1.0,
};

/// A kernel that only applies output gain.
#[derive(Debug)]
pub struct TrimKernel {
    sample_rate: f32,
    gain: f32,
    bypassed: bool,
    meter: GainReductionMeter,
}

impl TrimKernel {
    /// Create a trim kernel at unity gain.
    pub fn new() -> Self {
        Self {
            sample_rate: 0.0,
            gain: GAIN_SPEC.default,
            bypassed: false,
            meter: GainReductionMeter::new(),
        }
    }
}

impl Default for TrimKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl DynamicsKernel for TrimKernel {
    fn initialize(&mut self, _input_channels: usize, _output_channels: usize, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.meter.reset();
    }

    fn de_initialize(&mut self) {
        self.sample_rate = 0.0;
        self.meter.reset();
    }

    fn set_parameter(&mut self, address: u32, value: f32) {
        match address {
            TRIM_GAIN => self.gain = GAIN_SPEC.clamp(value),
            TRIM_BYPASS => self.bypassed = value >= 0.5,
            _ => {}
        }
    }

    fn get_parameter(&self, address: u32) -> f32 {
        match address {
            TRIM_GAIN => self.gain,
            TRIM_BYPASS => {
                if self.bypassed {
                    1.0
                } else {
                    0.0
                }
            }
            _ => 0.0,
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
        let gain = if self.bypassed { 1.0 } else { self.gain };
        for (input, output) in inputs.iter().zip(outputs.iter_mut()) {
            let n = frames.min(input.len()).min(output.len());
            for i in 0..n {
                output[i] = input[i] * gain;
            }
        }
        if self.bypassed {
            self.meter.clear();
        } else {
            self.meter.publish(0.0, frames as f32 / self.sample_rate);
        }
    }

    fn meter(&self) -> &GainReductionMeter {
        &self.meter
    }
}
