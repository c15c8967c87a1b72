//! Pin level access.
//!
//! Outputs are driven through the dedicated GPSETn/GPCLRn registers: writing a 1
//! bit acts on that pin only and 0 bits are ignored, so no read-modify-write is
//! needed and concurrent use from several threads is safe. Levels are read from
//! GPLEVn, which reflects the pad state whatever the configured direction.

use crate::common::constants::{GPCLR0, GPLEV0, GPSET0};
use crate::common::error::GpioResult;
use crate::common::pin::PinId;
use crate::soc::traits::RegisterAccess;

/// Drives and samples pin levels.
#[derive(Debug)]
pub struct PinIo<'a, R: RegisterAccess + ?Sized> {
    regs: &'a R,
}

impl<'a, R: RegisterAccess + ?Sized> PinIo<'a, R> {
    /// Creates a level accessor over `regs`.
    pub const fn new(regs: &'a R) -> Self {
        Self { regs }
    }

    /// Drives the pin high (has no visible effect until the pin is an output).
    ///
    /// # Errors
    ///
    /// Propagates register access failures.
    pub fn set(&self, pin: PinId) -> GpioResult<()> {
        self.regs.write_word(pin.bank_offset(GPSET0), pin.bank_mask())
    }

    /// Drives the pin low.
    ///
    /// # Errors
    ///
    /// Propagates register access failures.
    pub fn clear(&self, pin: PinId) -> GpioResult<()> {
        self.regs.write_word(pin.bank_offset(GPCLR0), pin.bank_mask())
    }

    /// Returns `true` if the pin is high.
    ///
    /// # Errors
    ///
    /// Propagates register access failures.
    pub fn read(&self, pin: PinId) -> GpioResult<bool> {
        let word = self.regs.read_word(pin.bank_offset(GPLEV0))?;
        Ok(word & pin.bank_mask() != 0)
    }

    /// Drives the pin to `level`.
    ///
    /// # Errors
    ///
    /// Propagates register access failures.
    pub fn write(&self, pin: PinId, level: bool) -> GpioResult<()> {
        if level { self.set(pin) } else { self.clear(pin) }
    }
}
