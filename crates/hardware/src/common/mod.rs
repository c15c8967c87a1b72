//! Common types shared by the register, pin, and interrupt layers.
//!
//! This module provides the fundamental building blocks of the library. It includes:
//! 1. **Constants:** The BCM283x GPIO register layout.
//! 2. **Error Handling:** The `GpioError` taxonomy and `GpioResult` alias.
//! 3. **Pins:** The validated `PinId` and the mode, pull, and edge enumerations.

/// BCM283x GPIO register offsets and field widths.
pub mod constants;

/// Error types.
pub mod error;

/// Pin identifiers and configuration enums.
pub mod pin;

pub use constants::PIN_COUNT;
pub use error::{GpioError, GpioResult};
pub use pin::{Edge, PinId, PinMode, PullState};
