//! Attack/release coefficient derivation.
//!
//! Detector smoothing uses pull coefficients: `state += coeff * (target - state)`.
//! A pull coefficient of 0 freezes the state, 1 snaps instantly. The mapping
//! from a time constant to a coefficient is the usual one-pole relation.

use libm::expf;

/// Derive a one-pole pull coefficient from a time constant in seconds.
///
/// `coeff = 1 - exp(-1 / (t_secs * sample_rate))`
///
/// Degenerate inputs (`t_secs <= 0` or `sample_rate <= 0`) yield 0.0 — the
/// detector freezes rather than producing NaN. The caller decides whether a
/// frozen detector is meaningful; for the kernel it only happens before
/// `initialize` has delivered a real sample rate.
#[inline]
pub fn pull_coeff(t_secs: f32, sample_rate: f32) -> f32 {
    if t_secs <= 0.0 || sample_rate <= 0.0 {
        return 0.0;
    }
    1.0 - expf(-1.0 / (t_secs * sample_rate))
}

/// A derived attack/release coefficient pair.
///
/// Recomputed only when the time constants or sample rate change — an
/// explicit cache, never touched per sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ballistics {
    /// Pull coefficient applied while the rectified input exceeds the state.
    pub attack: f32,
    /// Pull coefficient applied while the rectified input is below the state.
    pub release: f32,
}

impl Ballistics {
    /// Derive both coefficients from time constants in seconds.
    pub fn from_times(attack_secs: f32, release_secs: f32, sample_rate: f32) -> Self {
        Self {
            attack: pull_coeff(attack_secs, sample_rate),
            release: pull_coeff(release_secs, sample_rate),
        }
    }

    /// A frozen pair (both coefficients zero). The state never moves.
    pub const fn frozen() -> Self {
        Self {
            attack: 0.0,
            release: 0.0,
        }
    }
}
