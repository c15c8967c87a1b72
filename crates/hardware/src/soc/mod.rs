//! Peripheral register access.
//!
//! This module owns the hardware side of the library. It provides:
//! 1. **Traits:** `RegisterAccess`, the seam between pin logic and the register backing.
//! 2. **MMIO:** `RegisterMap`, the `mmap`-backed implementation over the GPIO device file.

/// `mmap` of the GPIO register block.
pub mod mmio;

/// Register access trait.
pub mod traits;

pub use mmio::RegisterMap;
pub use traits::RegisterAccess;
