//! Noise gate ahead of the compression cascade.
//!
//! The gate has to act before the cascade: heavy compression followed by
//! auto-makeup drags the noise floor up with it, so anything the gate is
//! meant to remove must be gone first. Detection and gain smoothing are
//! separate one-pole followers — the detector decides open/closed, the gain
//! follower glides between 0 and 1 so the gate never clicks.

use prensa_core::{Ballistics, DetectorBank, MAX_CHANNELS, db_to_linear, lerp, pull_coeff};

/// Fixed time constants and knob mapping for the gate.
///
/// Unlike the compression stages the gate does not follow the speed knob;
/// its ballistics are tuned once for click-free vocal gating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateConfig {
    /// Detector rise time in seconds.
    pub detector_attack_secs: f32,
    /// Detector fall time in seconds.
    pub detector_release_secs: f32,
    /// Gain-follower time toward open (1.0), in seconds.
    pub open_secs: f32,
    /// Gain-follower time toward closed (0.0), in seconds.
    pub close_secs: f32,
    /// Threshold at the lowest active knob position, in dB.
    pub floor_db: f32,
    /// Threshold at the highest knob position, in dB.
    pub ceiling_db: f32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            detector_attack_secs: 0.0005,
            detector_release_secs: 0.020,
            open_secs: 0.002,
            close_secs: 0.050,
            floor_db: -80.0,
            ceiling_db: -20.0,
        }
    }
}

/// Per-channel noise gate with smoothed gain.
#[derive(Debug, Clone)]
pub struct NoiseGate {
    config: GateConfig,
    detector: DetectorBank,
    gain: [f32; MAX_CHANNELS],
    open_coeff: f32,
    close_coeff: f32,
    /// Linear open threshold; 0.0 means the gate is disabled entirely.
    threshold_linear: f32,
}

impl NoiseGate {
    /// Create a disabled gate. Call [`set_sample_rate`](Self::set_sample_rate)
    /// before processing.
    pub fn new(config: GateConfig) -> Self {
        Self {
            config,
            detector: DetectorBank::new(),
            gain: [1.0; MAX_CHANNELS],
            open_coeff: 0.0,
            close_coeff: 0.0,
            threshold_linear: 0.0,
        }
    }

    /// Derive all coefficients for a sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.detector.set_ballistics(Ballistics::from_times(
            self.config.detector_attack_secs,
            self.config.detector_release_secs,
            sample_rate,
        ));
        self.open_coeff = pull_coeff(self.config.open_secs, sample_rate);
        self.close_coeff = pull_coeff(self.config.close_secs, sample_rate);
    }

    /// Map the 0..=10 knob onto the threshold range. Knob 0 disables the
    /// gate: the signal passes untouched and no state advances.
    pub fn set_amount(&mut self, knob: f32) {
        let knob = knob.clamp(0.0, 10.0);
        if knob <= 0.0 {
            self.threshold_linear = 0.0;
        } else {
            let db = lerp(self.config.floor_db, self.config.ceiling_db, knob / 10.0);
            self.threshold_linear = db_to_linear(db);
        }
    }

    /// Whether the gate participates in processing.
    pub fn is_active(&self) -> bool {
        self.threshold_linear > 0.0
    }

    /// Gate one sample of one channel.
    #[inline]
    pub fn process_sample(&mut self, channel: usize, input: f32) -> f32 {
        if self.threshold_linear <= 0.0 {
            return input;
        }
        let ch = channel.min(MAX_CHANNELS - 1);
        let level = self.detector.track(ch, input);
        let target = if level >= self.threshold_linear {
            1.0
        } else {
            0.0
        };
        let coeff = if target > self.gain[ch] {
            self.open_coeff
        } else {
            self.close_coeff
        };
        self.gain[ch] += coeff * (target - self.gain[ch]);
        input * self.gain[ch]
    }

    /// Return every channel to the open, quiescent state.
    pub fn reset(&mut self) {
        self.detector.reset();
        self.gain = [1.0; MAX_CHANNELS];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate_48k(knob: f32) -> NoiseGate {
        let mut gate = NoiseGate::new(GateConfig::default());
        gate.set_sample_rate(48000.0);
        gate.set_amount(knob);
        gate
    }

    #[test]
    fn knob_zero_is_transparent() {
        let mut gate = gate_48k(0.0);
        assert!(!gate.is_active());
        for &x in &[0.00001_f32, 0.5, -0.9] {
            assert_eq!(gate.process_sample(0, x), x);
        }
    }

    #[test]
    fn loud_signal_passes() {
        let mut gate = gate_48k(5.0);
        let mut out = 0.0;
        for _ in 0..4800 {
            out = gate.process_sample(0, 0.5);
        }
        assert!((out - 0.5).abs() < 0.01, "gate attenuated loud input: {out}");
    }

    #[test]
    fn quiet_signal_is_attenuated() {
        // Knob 8 -> threshold lerp(-80, -20, 0.8) = -32 dB. Feed -60 dB.
        let mut gate = gate_48k(8.0);
        let mut out = 0.0;
        for _ in 0..48000 {
            out = gate.process_sample(0, 0.001);
        }
        assert!(out.abs() < 1e-5, "gate left {out}");
    }

    #[test]
    fn gain_glides_without_jumps() {
        let mut gate = gate_48k(8.0);
        // Open on a loud burst, then go quiet and watch the closure glide.
        for _ in 0..4800 {
            gate.process_sample(0, 0.5);
        }
        let mut previous = gate.process_sample(0, 0.001);
        for _ in 0..2000 {
            let out = gate.process_sample(0, 0.001);
            assert!((out - previous).abs() < 0.01, "gain jumped");
            previous = out;
        }
    }

    #[test]
    fn channels_gate_independently() {
        let mut gate = gate_48k(8.0);
        for _ in 0..48000 {
            gate.process_sample(0, 0.5);
            gate.process_sample(1, 0.001);
        }
        let loud = gate.process_sample(0, 0.5);
        let quiet = gate.process_sample(1, 0.001);
        assert!(loud > 0.4);
        assert!(quiet.abs() < 1e-5);
    }

    #[test]
    fn reset_reopens_the_gate() {
        let mut gate = gate_48k(8.0);
        for _ in 0..48000 {
            gate.process_sample(0, 0.001);
        }
        gate.reset();
        // First loud sample after reset passes at (nearly) unity gain.
        let out = gate.process_sample(0, 0.5);
        assert!(out > 0.45);
    }
}
