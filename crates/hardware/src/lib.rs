//! Memory-mapped GPIO access for BCM283x single-board computers.
//!
//! This crate drives the GPIO block of a Raspberry Pi class SoC from user space:
//! 1. **Registers:** `mmap` of `/dev/gpiomem` (or `/dev/mem`) with volatile word access.
//! 2. **Direction:** Function-select programming with per-pin read-modify-write.
//! 3. **Levels:** Atomic set/clear through GPSET/GPCLR and level reads from GPLEV.
//! 4. **Interrupts:** Export through the kernel sysfs interface, returning a descriptor for `poll(POLLPRI)`.
//! 5. **Configuration:** JSON-loadable device path, mapping window, sysfs root, and retry policy.
//!
//! ```no_run
//! use gpiomem_core::{Edge, Gpio, PullState};
//!
//! # fn main() -> Result<(), gpiomem_core::GpioError> {
//! let mut gpio = Gpio::new("/dev/gpiomem")?;
//! gpio.make_output(24)?;
//! gpio.set_pin(24)?;
//! let fd = gpio.try_set_single_kernel_driver(25, PullState::Down, Edge::Rising)?;
//! # let _ = fd;
//! # Ok(())
//! # }
//! ```

/// Pin types, register layout, and errors.
pub mod common;
/// Library configuration (defaults and JSON loading).
pub mod config;
/// The `Gpio` instance, pin configuration, and level access.
pub mod gpio;
/// Kernel interrupt export.
pub mod irq;
/// Register block mapping and the register access trait.
pub mod soc;

/// Error type returned by every fallible operation.
pub use crate::common::error::{GpioError, GpioResult};
/// Pin identifiers and configuration enums.
pub use crate::common::pin::{Edge, PinId, PinMode, PullState};
/// Runtime configuration; use `GpioConfig::default()` or load it from JSON.
pub use crate::config::GpioConfig;
/// Main entry point; construct with `Gpio::new` or `Gpio::from_config`.
pub use crate::gpio::Gpio;
/// Sentinel descriptor returned by `Gpio::set_single_kernel_driver` on failure.
pub use crate::irq::INVALID_HANDLE;
/// `mmap`-backed register block.
pub use crate::soc::RegisterMap;
