//! Pin identifiers and the enumerations attached to them.

use std::fmt;

use super::constants::{
    FSEL_BITS, FSEL_INPUT, FSEL_OUTPUT, GPFSEL0, PIN_COUNT, PINS_PER_BANK, PINS_PER_FSEL,
    WORD_SIZE,
};
use super::error::{GpioError, GpioResult};

/// A validated BCM pin number.
///
/// Construction checks the number against the chip's pin count, so every
/// register offset derived from a `PinId` lies inside the GPIO block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PinId(u8);

impl PinId {
    /// Validates `pin` against the full BCM range.
    ///
    /// # Errors
    ///
    /// Returns [`GpioError::InvalidPin`] when `pin >= PIN_COUNT`.
    pub fn new(pin: u32) -> GpioResult<Self> {
        Self::with_limit(pin, PIN_COUNT)
    }

    /// Validates `pin` against a board-specific limit (never above `PIN_COUNT`).
    ///
    /// # Errors
    ///
    /// Returns [`GpioError::InvalidPin`] when `pin` is at or above the limit.
    pub fn with_limit(pin: u32, limit: u8) -> GpioResult<Self> {
        let limit = limit.min(PIN_COUNT);
        if pin < u32::from(limit) {
            Ok(Self(pin as u8))
        } else {
            Err(GpioError::InvalidPin { pin, limit })
        }
    }

    /// Returns the raw BCM number.
    #[inline]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Byte offset of the function-select register holding this pin.
    #[inline]
    pub const fn fsel_offset(self) -> usize {
        GPFSEL0 + (self.0 / PINS_PER_FSEL) as usize * WORD_SIZE
    }

    /// Bit shift of this pin's 3-bit field inside its function-select register.
    #[inline]
    pub const fn fsel_shift(self) -> u32 {
        (self.0 % PINS_PER_FSEL) as u32 * FSEL_BITS
    }

    /// Byte offset of this pin's word within a set/clear/level bank starting at `base`.
    #[inline]
    pub const fn bank_offset(self, base: usize) -> usize {
        base + (self.0 / PINS_PER_BANK) as usize * WORD_SIZE
    }

    /// Single-bit mask of this pin inside its bank word.
    #[inline]
    pub const fn bank_mask(self) -> u32 {
        1 << (self.0 % PINS_PER_BANK)
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO{}", self.0)
    }
}

/// Pin direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PinMode {
    /// Input buffer enabled, output driver off.
    Input,
    /// Output driver enabled.
    Output,
}

impl PinMode {
    /// Function-select field encoding for this mode.
    #[inline]
    pub const fn fsel_bits(self) -> u32 {
        match self {
            Self::Input => FSEL_INPUT,
            Self::Output => FSEL_OUTPUT,
        }
    }

    /// Decodes a 3-bit function-select field; alternate functions yield `None`.
    #[inline]
    pub const fn from_fsel_bits(bits: u32) -> Option<Self> {
        match bits {
            FSEL_INPUT => Some(Self::Input),
            FSEL_OUTPUT => Some(Self::Output),
            _ => None,
        }
    }
}

/// Pull resistor configuration, applied when a pin is exported for interrupts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum PullState {
    /// No bias.
    #[default]
    None,
    /// Pull towards the supply rail.
    Up,
    /// Pull towards ground.
    Down,
}

impl PullState {
    /// Value written to the kernel's pull attribute.
    pub const fn as_sysfs(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

/// Edge-trigger policy, applied when a pin is exported for interrupts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Edge {
    /// No interrupt generation.
    #[default]
    None,
    /// Low-to-high transitions.
    Rising,
    /// High-to-low transitions.
    Falling,
    /// Both transitions.
    Both,
}

impl Edge {
    /// Value written to the kernel's `edge` attribute.
    pub const fn as_sysfs(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Rising => "rising",
            Self::Falling => "falling",
            Self::Both => "both",
        }
    }
}
