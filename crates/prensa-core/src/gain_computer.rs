//! Log-domain gain computer with quadratic soft knee.
//!
//! Maps a detected level (dB) plus threshold/ratio/knee to a gain-reduction
//! value in dB. The knee region blends the unity and ratio slopes with a
//! quadratic so the transfer curve and its first derivative are continuous
//! at both knee boundaries.
//!
//! Reference: Giannoulis, Massberg & Reiss, "Digital Dynamic Range
//! Compressor Design — A Tutorial and Analysis", JAES vol. 60 no. 6, 2012.

/// Knee widths below this are treated as a hard knee.
const KNEE_EPSILON: f32 = 1e-3;

/// Static gain computer, parameterized per cascade stage.
///
/// # Example
///
/// ```rust
/// use prensa_core::GainComputer;
///
/// let gc = GainComputer::new(-20.0, 4.0, 6.0);
/// assert_eq!(gc.reduction_db(-40.0), 0.0);       // well below knee
/// assert!(gc.reduction_db(0.0) < -10.0);         // 20 dB over at 4:1
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainComputer {
    threshold_db: f32,
    ratio: f32,
    knee_db: f32,
}

impl GainComputer {
    /// Create a gain computer. Ratio is floored at 1.0 (no expansion).
    pub fn new(threshold_db: f32, ratio: f32, knee_db: f32) -> Self {
        Self {
            threshold_db,
            ratio: ratio.max(1.0),
            knee_db: knee_db.max(0.0),
        }
    }

    /// Threshold in dB.
    pub fn threshold_db(&self) -> f32 {
        self.threshold_db
    }

    /// Compression ratio (>= 1).
    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    /// Knee width in dB.
    pub fn knee_db(&self) -> f32 {
        self.knee_db
    }

    /// Gain reduction in dB for a detected level in dB. Always <= 0.
    ///
    /// - below the knee: 0
    /// - inside the knee: `(1/ratio - 1) * (over + knee/2)^2 / (2 * knee)`
    /// - above the knee: `(1/ratio - 1) * over`
    #[inline]
    pub fn reduction_db(&self, level_db: f32) -> f32 {
        let over = level_db - self.threshold_db;
        let half_knee = self.knee_db * 0.5;
        let slope = 1.0 / self.ratio - 1.0;

        if over < -half_knee {
            0.0
        } else if self.knee_db > KNEE_EPSILON && over < half_knee {
            let x = over + half_knee;
            slope * x * x / (2.0 * self.knee_db)
        } else {
            slope * over
        }
    }

    /// Static auto-makeup gain in dB.
    ///
    /// Half the gain lost at threshold at the current ratio, computed once
    /// per buffer — not adapted per sample.
    #[inline]
    pub fn auto_makeup_db(&self) -> f32 {
        -self.threshold_db * (1.0 - 1.0 / self.ratio) * 0.5
    }
}
