//! Prensa Kernel - multi-stage dynamics processing
//!
//! The host-facing layer of the prensa dynamics processor. A kernel owns the
//! whole per-sample signal path — noise gate, three cascaded compression
//! stages, saturation, dry/wet mix, and output trim — behind the
//! [`DynamicsKernel`] trait that a render host drives:
//!
//! ```text
//! initialize -> (set_parameter | handle_event | process)* -> de_initialize
//! ```
//!
//! Two kernels implement the trait: [`CascadeKernel`] is the full processor,
//! [`TrimKernel`] is a gain-only variant sharing the same host contract.
//!
//! The audio path never allocates, never locks, and never calls into the
//! host. Parameter changes land on the control path and are folded into
//! cached coefficients; `process` only reads them.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod cascade;
pub mod gate;
pub mod kernel;
pub mod params;
pub mod saturation;
pub mod stage;
pub mod trim;

pub use cascade::CascadeKernel;
pub use gate::{GateConfig, NoiseGate};
pub use kernel::{DynamicsKernel, RenderEvent};
pub use params::{ParamAddress, ParamSpec};
pub use saturation::Saturator;
pub use stage::{CompressorStage, CurvePoint, StageConfig, StageCurveMap};
pub use trim::TrimKernel;
