//! Per-channel peak envelope detection.
//!
//! A [`DetectorBank`] is one leaky-integrator peak detector replicated across
//! a fixed channel arena. The kernel owns four banks (gate plus one per
//! cascade stage); each bank has its own [`Ballistics`] and its own
//! per-channel state.

use crate::ballistics::Ballistics;

/// Fixed maximum channel count for per-channel state arenas.
///
/// The processing path may not allocate, so channel state lives in fixed
/// arrays. Channels at or beyond this limit collapse onto the last slot —
/// a defined, bounded fallback rather than an error.
pub const MAX_CHANNELS: usize = 8;

/// Lower bound on envelope state.
///
/// Keeps `log` defined and keeps the state out of the denormal range where
/// IIR feedback would crawl along at a fraction of normal FPU speed.
pub const ENVELOPE_FLOOR: f32 = 1e-10;

/// Leaky-integrator peak detector with per-channel state.
///
/// Per sample: rectify, pull the state toward the rectified value with the
/// attack coefficient when rising and the release coefficient when falling,
/// then floor the state at [`ENVELOPE_FLOOR`].
///
/// # Example
///
/// ```rust
/// use prensa_core::{Ballistics, DetectorBank};
///
/// let mut bank = DetectorBank::new();
/// bank.set_ballistics(Ballistics::from_times(0.001, 0.050, 48000.0));
/// let level = bank.track(0, 0.5);
/// assert!(level > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct DetectorBank {
    ballistics: Ballistics,
    state: [f32; MAX_CHANNELS],
}

impl DetectorBank {
    /// Create a bank with frozen ballistics and quiescent state.
    pub fn new() -> Self {
        Self {
            ballistics: Ballistics::frozen(),
            state: [ENVELOPE_FLOOR; MAX_CHANNELS],
        }
    }

    /// Replace the coefficient pair.
    ///
    /// Called from the control path when the speed parameter or sample rate
    /// changes; never called per sample.
    pub fn set_ballistics(&mut self, ballistics: Ballistics) {
        self.ballistics = ballistics;
    }

    /// Current coefficient pair.
    pub fn ballistics(&self) -> Ballistics {
        self.ballistics
    }

    /// Advance one channel's envelope by one sample and return the new level.
    ///
    /// Channels beyond [`MAX_CHANNELS`] share the last slot.
    #[inline]
    pub fn track(&mut self, channel: usize, input: f32) -> f32 {
        let ch = channel.min(MAX_CHANNELS - 1);
        let rectified = input.abs();
        let state = self.state[ch];
        let coeff = if rectified > state {
            self.ballistics.attack
        } else {
            self.ballistics.release
        };
        let next = (state + coeff * (rectified - state)).max(ENVELOPE_FLOOR);
        self.state[ch] = next;
        next
    }

    /// Current level of one channel without advancing.
    #[inline]
    pub fn level(&self, channel: usize) -> f32 {
        self.state[channel.min(MAX_CHANNELS - 1)]
    }

    /// Reset every channel to the quiescent floor.
    pub fn reset(&mut self) {
        self.state = [ENVELOPE_FLOOR; MAX_CHANNELS];
    }
}

impl Default for DetectorBank {
    fn default() -> Self {
        Self::new()
    }
}
