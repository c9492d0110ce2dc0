//! Parameter addresses and value ranges for the cascade kernel.
//!
//! Addresses are stable wire values: the host addresses parameters by raw
//! `u32`, and the kernel resolves them through [`ParamAddress::from_raw`].
//! Unknown addresses are a defined no-op on write and read back as 0.0.
//! Ranges and defaults live in a static table rather than inline literals,
//! so per-variant asymmetries stay in one place.

/// Range and default for one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    /// Display name.
    pub name: &'static str,
    /// Stable string identifier for hosts that address by name.
    pub identifier: &'static str,
    /// Inclusive lower bound.
    pub min: f32,
    /// Inclusive upper bound.
    pub max: f32,
    /// Value a fresh kernel starts with.
    pub default: f32,
}

impl ParamSpec {
    /// Clamp a value into this parameter's range.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

/// Addresses of the cascade kernel's parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ParamAddress {
    /// Compression intensity knob, 0..=10.
    Compress = 0,
    /// Attack/release speed knob, 0..=10.
    Speed = 1,
    /// Gate amount knob, 0..=10 (0 disables the gate).
    Gate = 2,
    /// Output trim in dB.
    OutputGain = 3,
    /// Dry/wet blend, 0..=1.
    Mix = 4,
    /// Hard bypass flag (0 or 1).
    Bypass = 5,
}

/// All addresses, in wire order.
pub const ALL_PARAMS: [ParamAddress; 6] = [
    ParamAddress::Compress,
    ParamAddress::Speed,
    ParamAddress::Gate,
    ParamAddress::OutputGain,
    ParamAddress::Mix,
    ParamAddress::Bypass,
];

impl ParamAddress {
    /// Resolve a raw host address. Unknown addresses yield `None`.
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Compress),
            1 => Some(Self::Speed),
            2 => Some(Self::Gate),
            3 => Some(Self::OutputGain),
            4 => Some(Self::Mix),
            5 => Some(Self::Bypass),
            _ => None,
        }
    }

    /// The raw wire value.
    pub fn raw(self) -> u32 {
        self as u32
    }

    /// Range and default for this parameter.
    pub fn spec(self) -> &'static ParamSpec {
        match self {
            Self::Compress => &ParamSpec {
                name: "Compress",
                identifier: "compress",
                min: 0.0,
                max: 10.0,
                default: 5.0,
            },
            Self::Speed => &ParamSpec {
                name: "Speed",
                identifier: "speed",
                min: 0.0,
                max: 10.0,
                default: 3.0,
            },
            Self::Gate => &ParamSpec {
                name: "Gate",
                identifier: "gate",
                min: 0.0,
                max: 10.0,
                default: 0.0,
            },
            Self::OutputGain => &ParamSpec {
                name: "Output Gain",
                identifier: "outputGain",
                min: -24.0,
                max: 24.0,
                default: 0.0,
            },
            Self::Mix => &ParamSpec {
                name: "Mix",
                identifier: "mix",
                min: 0.0,
                max: 1.0,
                default: 1.0,
            },
            Self::Bypass => &ParamSpec {
                name: "Bypass",
                identifier: "bypass",
                min: 0.0,
                max: 1.0,
                default: 0.0,
            },
        }
    }
}
