//! Post-cascade saturation.
//!
//! A fixed, mild tanh shaper blended with its input. There is no dedicated
//! knob: the cascade runs it at one setting, chosen so the shaper adds a
//! touch of harmonic density to already-compressed material without reading
//! as distortion on its own.

use prensa_core::{soft_clip, wet_dry_mix};

/// Stateless tanh waveshaper with a dry blend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Saturator {
    drive: f32,
    blend: f32,
}

impl Saturator {
    /// Create a shaper. `drive` scales the input into the tanh curve,
    /// `blend` is the shaped share of the output (0 = dry, 1 = all shaped).
    pub const fn new(drive: f32, blend: f32) -> Self {
        Self { drive, blend }
    }

    /// Shape one sample.
    #[inline]
    pub fn shape(&self, x: f32) -> f32 {
        wet_dry_mix(x, soft_clip(x * self.drive), self.blend)
    }

    /// Input scale into the tanh curve.
    pub fn drive(&self) -> f32 {
        self.drive
    }

    /// Shaped share of the output.
    pub fn blend(&self) -> f32 {
        self.blend
    }
}
