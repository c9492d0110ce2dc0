//! Lock-free gain-reduction metering.
//!
//! The audio thread publishes one ballistic (VU-style) gain-reduction value
//! per buffer; a lower-priority observer polls it from another thread. Both
//! sides use relaxed-ordering atomics: the value is cosmetic, a stale or
//! reordered read costs one display frame, and nothing here may block the
//! deadline-bound audio thread. The f32 payload travels as bits in an
//! `AtomicU32`, so reads can never tear.
//!
//! A monotone generation counter, bumped once per processed buffer, lets
//! the reader detect a stalled host: when the counter stops advancing the
//! reader decays its displayed value toward zero instead of freezing.

use core::sync::atomic::{AtomicU32, Ordering};

use libm::expf;

/// Meter rise time constant in seconds.
const METER_ATTACK_SECS: f32 = 0.050;

/// Meter fall time constant in seconds. Longer than attack, so the display
/// rises quickly and falls slowly like a mechanical VU needle.
const METER_RELEASE_SECS: f32 = 0.300;

/// Per-poll decay factor applied by the reader while processing is stalled.
const STALL_DECAY: f32 = 0.85;

/// Readings below this are snapped to zero so the stall decay terminates.
const METER_REST_DB: f32 = 1e-3;

/// Shared ballistic gain-reduction meter.
///
/// Owned by (or next to) the kernel; the audio thread calls
/// [`publish`](Self::publish) once per buffer, a UI thread polls through a
/// [`MeterReader`].
#[derive(Debug)]
pub struct GainReductionMeter {
    /// Smoothed gain reduction in dB (>= 0), stored as f32 bits.
    smoothed_bits: AtomicU32,
    /// Buffers processed since construction. Wrapping is harmless: the
    /// reader only compares for equality.
    generation: AtomicU32,
}

impl GainReductionMeter {
    /// Create a meter at rest (0 dB reduction, generation 0).
    pub const fn new() -> Self {
        Self {
            smoothed_bits: AtomicU32::new(0),
            generation: AtomicU32::new(0),
        }
    }

    /// Publish one buffer's average gain reduction (dB, >= 0).
    ///
    /// Applies asymmetric ballistics sized to the buffer duration, stores
    /// the smoothed value, and bumps the generation counter. Audio thread
    /// only; allocation-free and lock-free.
    pub fn publish(&self, average_reduction_db: f32, buffer_secs: f32) {
        let instant = average_reduction_db.max(0.0);
        let current = self.smoothed_db();

        let time_constant = if instant > current {
            METER_ATTACK_SECS
        } else {
            METER_RELEASE_SECS
        };
        let coeff = if buffer_secs > 0.0 {
            1.0 - expf(-buffer_secs / time_constant)
        } else {
            1.0
        };

        let next = (current + coeff * (instant - current)).max(0.0);
        self.smoothed_bits.store(next.to_bits(), Ordering::Relaxed);
        self.generation.fetch_add(1, Ordering::Relaxed);
    }

    /// Force the meter to rest immediately. Used by the bypass path.
    pub fn clear(&self) {
        self.smoothed_bits.store(0, Ordering::Relaxed);
        self.generation.fetch_add(1, Ordering::Relaxed);
    }

    /// Reset both value and generation. Control path only.
    pub fn reset(&self) {
        self.smoothed_bits.store(0, Ordering::Relaxed);
        self.generation.store(0, Ordering::Relaxed);
    }

    /// Current smoothed gain reduction in dB.
    pub fn smoothed_db(&self) -> f32 {
        f32::from_bits(self.smoothed_bits.load(Ordering::Relaxed))
    }

    /// Current generation count.
    pub fn generation(&self) -> u32 {
        self.generation.load(Ordering::Relaxed)
    }
}

impl Default for GainReductionMeter {
    fn default() -> Self {
        Self::new()
    }
}

/// Polling-side state for a [`GainReductionMeter`].
///
/// Tracks the last generation it observed. While the generation advances the
/// reader mirrors the published value; once it stalls (the host stopped
/// calling `process`) each poll multiplies the displayed value by a fixed
/// decay so the display returns to rest instead of freezing.
#[derive(Debug, Clone)]
pub struct MeterReader {
    last_generation: u32,
    displayed_db: f32,
}

impl MeterReader {
    /// Create a reader at rest.
    pub const fn new() -> Self {
        Self {
            last_generation: 0,
            displayed_db: 0.0,
        }
    }

    /// Poll the meter and return the value to display, in dB of reduction.
    pub fn poll(&mut self, meter: &GainReductionMeter) -> f32 {
        let generation = meter.generation();
        if generation != self.last_generation {
            self.last_generation = generation;
            self.displayed_db = meter.smoothed_db();
        } else {
            self.displayed_db *= STALL_DECAY;
            if self.displayed_db < METER_REST_DB {
                self.displayed_db = 0.0;
            }
        }
        self.displayed_db
    }

    /// Last displayed value without polling.
    pub fn displayed_db(&self) -> f32 {
        self.displayed_db
    }
}

impl Default for MeterReader {
    fn default() -> Self {
        Self::new()
    }
}
