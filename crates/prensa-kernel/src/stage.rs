//! One compression stage of the cascade.
//!
//! A stage is a [`DetectorBank`] feeding a [`GainComputer`], plus the
//! configuration that maps the shared intensity and speed knobs onto this
//! stage's curve and ballistics. All numeric bounds live in the curve map,
//! not in code: the cascade builds its three stages from three maps.

use prensa_core::{
    Ballistics, DetectorBank, GainComputer, db_to_linear, lerp, linear_to_db,
};

/// A threshold/ratio/knee triple at one knob position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    /// Threshold in dB.
    pub threshold_db: f32,
    /// Ratio, >= 1.
    pub ratio: f32,
    /// Knee width in dB.
    pub knee_db: f32,
}

impl CurvePoint {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        Self {
            threshold_db: lerp(a.threshold_db, b.threshold_db, t),
            ratio: lerp(a.ratio, b.ratio, t),
            knee_db: lerp(a.knee_db, b.knee_db, t),
        }
    }
}

/// Piecewise-linear mapping from the 0..=10 intensity knob to a curve.
///
/// Two regimes share the breakpoint as an endpoint, so the mapping is
/// continuous there by construction: below the breakpoint the knob lerps
/// `at_zero -> at_breakpoint`, above it `at_breakpoint -> at_max`. The
/// upper regime deliberately steepens much faster than the lower one.
/// A breakpoint at 10 (or a map whose three points coincide) yields a
/// fixed curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageCurveMap {
    /// Knob position where the upper regime begins.
    pub breakpoint: f32,
    /// Curve at knob 0.
    pub at_zero: CurvePoint,
    /// Curve at the breakpoint.
    pub at_breakpoint: CurvePoint,
    /// Curve at knob 10.
    pub at_max: CurvePoint,
}

impl StageCurveMap {
    /// A map that ignores the knob entirely.
    pub const fn fixed(point: CurvePoint) -> Self {
        Self {
            breakpoint: 10.0,
            at_zero: point,
            at_breakpoint: point,
            at_max: point,
        }
    }

    /// Curve for a knob position. The knob is clamped to 0..=10.
    pub fn curve(&self, knob: f32) -> CurvePoint {
        let knob = knob.clamp(0.0, 10.0);
        if knob <= self.breakpoint || self.breakpoint >= 10.0 {
            let span = self.breakpoint.max(f32::EPSILON);
            CurvePoint::lerp(self.at_zero, self.at_breakpoint, (knob / span).min(1.0))
        } else {
            let t = (knob - self.breakpoint) / (10.0 - self.breakpoint);
            CurvePoint::lerp(self.at_breakpoint, self.at_max, t)
        }
    }
}

/// Static configuration of one stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageConfig {
    /// Knob-to-curve mapping.
    pub curve_map: StageCurveMap,
    /// Multiplier applied to the shared attack/release times. Decorrelates
    /// the stages so they never pump in lockstep.
    pub time_scale: f32,
    /// Whether the stage compensates with static auto-makeup.
    pub auto_makeup: bool,
}

/// One envelope-plus-gain-computer compression stage.
#[derive(Debug, Clone)]
pub struct CompressorStage {
    config: StageConfig,
    detector: DetectorBank,
    computer: GainComputer,
    makeup_db: f32,
}

impl CompressorStage {
    /// Create a stage at knob 0 with frozen ballistics.
    pub fn new(config: StageConfig) -> Self {
        let curve = config.curve_map.curve(0.0);
        let mut stage = Self {
            config,
            detector: DetectorBank::new(),
            computer: GainComputer::new(curve.threshold_db, curve.ratio, curve.knee_db),
            makeup_db: 0.0,
        };
        stage.refresh_makeup();
        stage
    }

    /// Re-derive threshold/ratio/knee and makeup from the intensity knob.
    pub fn set_intensity(&mut self, knob: f32) {
        let curve = self.config.curve_map.curve(knob);
        self.computer = GainComputer::new(curve.threshold_db, curve.ratio, curve.knee_db);
        self.refresh_makeup();
    }

    /// Re-derive ballistics from the shared (unscaled) time constants.
    pub fn set_ballistics(&mut self, attack_secs: f32, release_secs: f32, sample_rate: f32) {
        self.detector.set_ballistics(Ballistics::from_times(
            attack_secs * self.config.time_scale,
            release_secs * self.config.time_scale,
            sample_rate,
        ));
    }

    fn refresh_makeup(&mut self) {
        self.makeup_db = if self.config.auto_makeup {
            self.computer.auto_makeup_db()
        } else {
            0.0
        };
    }

    /// The active transfer curve.
    pub fn computer(&self) -> &GainComputer {
        &self.computer
    }

    /// Static makeup gain in dB (0 when disabled).
    pub fn makeup_db(&self) -> f32 {
        self.makeup_db
    }

    /// Compress one sample of one channel.
    ///
    /// Returns the output sample and the gain reduction applied, in dB
    /// (<= 0, excluding makeup).
    #[inline]
    pub fn process_sample(&mut self, channel: usize, input: f32) -> (f32, f32) {
        let level = self.detector.track(channel, input);
        let reduction_db = self.computer.reduction_db(linear_to_db(level));
        let gain = db_to_linear(reduction_db + self.makeup_db);
        (input * gain, reduction_db)
    }

    /// Return every channel's envelope to the quiescent floor.
    pub fn reset(&mut self) {
        self.detector.reset();
    }
}
