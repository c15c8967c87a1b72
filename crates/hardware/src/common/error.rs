//! GPIO error definitions.
//!
//! This module defines the error taxonomy shared by every layer of the library. It provides:
//! 1. **Construction errors:** Device open and mapping failures that leave no usable instance.
//! 2. **Caller errors:** Invalid pin identifiers, rejected before any hardware access.
//! 3. **Interrupt-path errors:** Export and configuration failures of the kernel interface.
//! 4. **Internal errors:** Register offsets outside the mapped window.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by register access, pin configuration, and interrupt export.
#[derive(Debug, Error)]
pub enum GpioError {
    /// The register device file could not be opened (missing driver, permissions).
    #[error("cannot open GPIO device {}: {source}", path.display())]
    DeviceUnavailable {
        /// Path of the device file.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The register block could not be mapped into the process address space.
    #[error("cannot map GPIO registers from {}: {source}", path.display())]
    MapFailed {
        /// Path of the device file.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The pin number lies outside the chip's valid range.
    #[error("invalid BCM pin {pin} (valid range is 0..{limit})")]
    InvalidPin {
        /// Rejected pin number.
        pin: u32,
        /// Exclusive upper bound of valid pins.
        limit: u8,
    },

    /// A register offset is misaligned or outside the mapped window.
    #[error("register offset {offset:#x} is outside the {len:#x}-byte window or misaligned")]
    OutOfRange {
        /// Requested byte offset.
        offset: usize,
        /// Length of the mapped window in bytes.
        len: usize,
    },

    /// The kernel refused to export the pin, or the export interface is unavailable.
    #[error("cannot export pin {pin}: {source}")]
    ExportFailed {
        /// Pin being exported.
        pin: u8,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// A per-pin attribute could not be written or opened after export.
    #[error("cannot configure {attribute} of pin {pin}: {source}")]
    ConfigFailed {
        /// Pin being configured.
        pin: u8,
        /// Attribute node name (`pull`, `edge`, `value`).
        attribute: String,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The pin is already exported by this instance.
    #[error("pin {0} is already exported by this instance")]
    AlreadyExported(u8),

    /// The pin has no interrupt export owned by this instance.
    #[error("pin {0} is not exported by this instance")]
    NotExported(u8),

    /// The pin has an active interrupt export and cannot be driven as an output.
    #[error("pin {0} has an active interrupt export")]
    PinBusy(u8),

    /// The register map has been released.
    #[error("register map is closed")]
    Closed,

    /// The configuration document could not be read or parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Convenience alias used throughout the crate.
pub type GpioResult<T> = Result<T, GpioError>;
