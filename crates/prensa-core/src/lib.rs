//! Prensa Core - dynamics DSP primitives
//!
//! Foundational building blocks for the prensa dynamics processor, designed
//! for real-time use with zero allocation in the audio path.
//!
//! # Core Abstractions
//!
//! - [`DetectorBank`] - per-channel peak envelope follower with a denormal floor
//! - [`GainComputer`] - log-domain gain computer with quadratic soft knee
//! - [`Ballistics`] - attack/release pull-coefficient derivation
//! - [`GainReductionMeter`] / [`MeterReader`] - lock-free cross-thread metering
//! - Math utilities: [`db_to_linear`], [`linear_to_db`], [`soft_clip`], etc.
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! prensa-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: no allocations, no locks, no blocking anywhere
//! - **libm for math**: no dependency on std float intrinsics
//! - **Relaxed atomics for metering**: the cross-thread meter value is
//!   cosmetic, so it uses documented relaxed-ordering atomics instead of
//!   synchronization that could block the audio thread

#![cfg_attr(not(feature = "std"), no_std)]

pub mod ballistics;
pub mod detector;
pub mod gain_computer;
pub mod math;
pub mod meter;

pub use ballistics::{Ballistics, pull_coeff};
pub use detector::{DetectorBank, ENVELOPE_FLOOR, MAX_CHANNELS};
pub use gain_computer::GainComputer;
pub use math::{db_to_linear, lerp, linear_to_db, soft_clip, wet_dry_mix};
pub use meter::{GainReductionMeter, MeterReader};
