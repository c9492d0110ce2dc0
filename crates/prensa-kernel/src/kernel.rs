//! The host-facing kernel contract.
//!
//! A render host drives a kernel through this trait: configure it with
//! `initialize`, feed it parameter changes and render events, call `process`
//! once per buffer from the audio thread, and poll the meter from wherever
//! the display lives. Everything reachable from `process` must stay
//! allocation-free and lock-free.

use prensa_core::GainReductionMeter;

/// One event delivered to the kernel at render time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderEvent {
    /// A parameter change scheduled by the host.
    Parameter {
        /// Raw parameter address.
        address: u32,
        /// New value; clamped by the kernel.
        value: f32,
    },
    /// A raw MIDI message. The dynamics kernels ignore these.
    Midi {
        /// Status byte plus two data bytes.
        bytes: [u8; 3],
    },
}

/// Contract between a render host and a dynamics kernel.
///
/// Implemented by [`CascadeKernel`](crate::CascadeKernel) (the full
/// processor) and [`TrimKernel`](crate::TrimKernel) (gain only). Hosts hold
/// a `&mut dyn DynamicsKernel` and never care which.
pub trait DynamicsKernel {
    /// Configure for a channel layout and sample rate, resetting all
    /// per-channel state and the meter. Parameter values survive.
    fn initialize(&mut self, input_channels: usize, output_channels: usize, sample_rate: f32);

    /// Drop per-channel state. Parameter values survive; a later
    /// `initialize` starts clean.
    fn de_initialize(&mut self);

    /// Set a parameter by raw address. Out-of-range values are clamped,
    /// unknown addresses ignored. Control path only.
    fn set_parameter(&mut self, address: u32, value: f32);

    /// Read a parameter by raw address. Unknown addresses read 0.0.
    fn get_parameter(&self, address: u32) -> f32;

    /// Engage or release hard bypass.
    fn set_bypass(&mut self, bypassed: bool);

    /// Whether hard bypass is engaged.
    fn is_bypassed(&self) -> bool;

    /// Render one buffer: read `frames` samples per input channel, write
    /// `frames` per output channel. `start_time` is the host timeline
    /// position of the first frame. Audio thread; must not allocate.
    fn process(
        &mut self,
        inputs: &[&[f32]],
        outputs: &mut [&mut [f32]],
        start_time: i64,
        frames: usize,
    );

    /// Handle one render-time event. The default dispatches parameter
    /// events to [`set_parameter`](Self::set_parameter) and ignores MIDI.
    fn handle_event(&mut self, _time: i64, event: &RenderEvent) {
        if let RenderEvent::Parameter { address, value } = *event {
            self.set_parameter(address, value);
        }
    }

    /// The kernel's gain-reduction meter, for a reader to poll.
    fn meter(&self) -> &GainReductionMeter;

    /// Current smoothed gain reduction in dB (>= 0).
    fn gain_reduction_db(&self) -> f32 {
        self.meter().smoothed_db()
    }
}
