//! Function-select programming.
//!
//! Each GPFSELn register holds ten 3-bit fields, one per pin. Changing a pin's
//! mode is a read-modify-write of the whole word that touches only its field.

use tracing::debug;

use crate::common::constants::FSEL_MASK;
use crate::common::error::GpioResult;
use crate::common::pin::{PinId, PinMode};
use crate::soc::traits::RegisterAccess;

/// Programs pin direction through the function-select registers.
///
/// The read-modify-write is not atomic. Two threads configuring pins that share
/// a GPFSEL word (pins `10*n..10*n+9`) must serialize the calls themselves.
#[derive(Debug)]
pub struct PinConfigurator<'a, R: RegisterAccess + ?Sized> {
    regs: &'a R,
}

impl<'a, R: RegisterAccess + ?Sized> PinConfigurator<'a, R> {
    /// Creates a configurator over `regs`.
    pub const fn new(regs: &'a R) -> Self {
        Self { regs }
    }

    /// Writes `mode` into the pin's function-select field, preserving all other fields.
    ///
    /// # Errors
    ///
    /// Propagates register access failures.
    pub fn set_mode(&self, pin: PinId, mode: PinMode) -> GpioResult<()> {
        let offset = pin.fsel_offset();
        let shift = pin.fsel_shift();

        let current = self.regs.read_word(offset)?;
        let updated = (current & !(FSEL_MASK << shift)) | (mode.fsel_bits() << shift);
        self.regs.write_word(offset, updated)?;

        debug!(%pin, ?mode, offset, "function select updated");
        Ok(())
    }

    /// Reads back the pin's mode; `None` when an alternate function is selected.
    ///
    /// # Errors
    ///
    /// Propagates register access failures.
    pub fn mode(&self, pin: PinId) -> GpioResult<Option<PinMode>> {
        let word = self.regs.read_word(pin.fsel_offset())?;
        Ok(PinMode::from_fsel_bits(
            (word >> pin.fsel_shift()) & FSEL_MASK,
        ))
    }
}
