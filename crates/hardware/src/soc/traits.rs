//! Register access trait for the GPIO block.
//!
//! This module defines the `RegisterAccess` trait implemented by every register backing. It provides:
//! 1. **Geometry:** `len` of the accessible window in bytes.
//! 2. **Access:** Word-sized read and write at block-relative byte offsets.
//!
//! Accesses take `&self`: a register write is a side effect on hardware, not on the
//! Rust value, and the set/clear registers are safe to hit from several threads.
//! Implementors must be `Send + Sync` so a `Gpio` can be shared between threads.

use crate::common::error::GpioResult;

/// Word-level access to a memory-mapped register block.
///
/// Offsets are byte offsets from the start of the block. Implementations reject
/// misaligned or out-of-window offsets with `GpioError::OutOfRange` and must not
/// reorder or elide accesses.
pub trait RegisterAccess: Send + Sync {
    /// Returns the length of the accessible window in bytes.
    fn len(&self) -> usize;

    /// Returns `true` if the window is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads the 32-bit register at `offset`.
    ///
    /// # Errors
    ///
    /// `OutOfRange` for a bad offset, `Closed` once the backing is released.
    fn read_word(&self, offset: usize) -> GpioResult<u32>;

    /// Writes the 32-bit register at `offset`.
    ///
    /// # Errors
    ///
    /// `OutOfRange` for a bad offset, `Closed` once the backing is released.
    fn write_word(&self, offset: usize, value: u32) -> GpioResult<()>;
}
