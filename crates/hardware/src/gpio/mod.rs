//! The GPIO instance.
//!
//! `Gpio` owns one register backing and one interrupt exporter and is the
//! single entry point of the library. Every method taking a raw pin number
//! validates it before touching any register or kernel node.
//!
//! # Thread safety
//!
//! `set_pin`, `clear_pin`, and `read_pin` take `&self` and are safe to call
//! concurrently. `make_input` and `make_output` also take `&self` but perform a
//! read-modify-write of a register shared by ten pins; concurrent callers
//! configuring pins in the same group of ten must hold their own lock.
//!
//! # Unconfigured pins
//!
//! Level operations do not check the direction. On an unconfigured pin
//! `read_pin` returns whatever the pad reports (all pins reset to input) and
//! `set_pin`/`clear_pin` only latch the output value for when the pin later
//! becomes an output.

/// Function-select programming.
pub mod function;

/// Set/clear/level access.
pub mod level;

use std::os::fd::RawFd;
use std::path::Path;

use tracing::debug;

use crate::common::error::{GpioError, GpioResult};
use crate::common::pin::{Edge, PinId, PinMode, PullState};
use crate::config::GpioConfig;
use crate::irq::exporter::{INVALID_HANDLE, InterruptExporter};
use crate::irq::sysfs::{KernelInterface, SysfsInterface};
use crate::soc::mmio::RegisterMap;
use crate::soc::traits::RegisterAccess;

pub use function::PinConfigurator;
pub use level::PinIo;

/// A GPIO controller over one register block and the kernel interrupt interface.
///
/// Dropping the instance unexports every pin it exported, closes their value
/// nodes, and then releases the register mapping.
#[derive(Debug)]
pub struct Gpio<R: RegisterAccess = RegisterMap, K: KernelInterface = SysfsInterface> {
    exporter: InterruptExporter<K>,
    regs: R,
    pin_limit: u8,
}

impl Gpio {
    /// Maps `device_path` with the default window and uses `/sys/class/gpio`.
    ///
    /// # Errors
    ///
    /// `DeviceUnavailable` or `MapFailed` if the register block cannot be mapped.
    pub fn new(device_path: impl AsRef<Path>) -> GpioResult<Self> {
        let config = GpioConfig {
            device_path: device_path.as_ref().to_path_buf(),
            ..GpioConfig::default()
        };
        Self::from_config(&config)
    }

    /// Builds an instance from a full configuration.
    ///
    /// # Errors
    ///
    /// `DeviceUnavailable` or `MapFailed` if the register block cannot be mapped.
    pub fn from_config(config: &GpioConfig) -> GpioResult<Self> {
        let regs = RegisterMap::open_with(&config.device_path, config.map_offset, config.map_len)?;
        let kernel = SysfsInterface::new(&config.sysfs_root);
        Ok(Self::with_backends(regs, kernel, config))
    }
}

impl<R: RegisterAccess, K: KernelInterface> Gpio<R, K> {
    /// Builds an instance over explicit register and kernel backends.
    pub fn with_backends(regs: R, kernel: K, config: &GpioConfig) -> Self {
        Self {
            exporter: InterruptExporter::from_config(kernel, config),
            regs,
            pin_limit: config.pin_limit(),
        }
    }

    /// Returns the register backing.
    pub const fn registers(&self) -> &R {
        &self.regs
    }

    /// Returns the interrupt exporter.
    pub const fn exporter(&self) -> &InterruptExporter<K> {
        &self.exporter
    }

    /// Validates a raw BCM pin number.
    ///
    /// # Errors
    ///
    /// `InvalidPin` when `pin` is outside the configured range.
    pub fn pin(&self, pin: u32) -> GpioResult<PinId> {
        PinId::with_limit(pin, self.pin_limit)
    }

    /// Configures `pin` as an input.
    ///
    /// Allowed while the pin is exported for interrupts.
    ///
    /// # Errors
    ///
    /// `InvalidPin` for a bad pin; register access errors otherwise.
    pub fn make_input(&self, pin: u32) -> GpioResult<()> {
        let pin = self.pin(pin)?;
        PinConfigurator::new(&self.regs).set_mode(pin, PinMode::Input)
    }

    /// Configures `pin` as an output.
    ///
    /// # Errors
    ///
    /// `InvalidPin` for a bad pin, `PinBusy` if the pin is exported for
    /// interrupts by this instance, register access errors otherwise.
    pub fn make_output(&self, pin: u32) -> GpioResult<()> {
        let pin = self.pin(pin)?;
        if self.exporter.is_exported(pin) {
            return Err(GpioError::PinBusy(pin.number()));
        }
        PinConfigurator::new(&self.regs).set_mode(pin, PinMode::Output)
    }

    /// Reads back the configured mode; `None` for an alternate function.
    ///
    /// # Errors
    ///
    /// `InvalidPin` for a bad pin; register access errors otherwise.
    pub fn mode(&self, pin: u32) -> GpioResult<Option<PinMode>> {
        let pin = self.pin(pin)?;
        PinConfigurator::new(&self.regs).mode(pin)
    }

    /// Drives `pin` high.
    ///
    /// # Errors
    ///
    /// `InvalidPin` for a bad pin; register access errors otherwise.
    pub fn set_pin(&self, pin: u32) -> GpioResult<()> {
        let pin = self.pin(pin)?;
        PinIo::new(&self.regs).set(pin)
    }

    /// Drives `pin` low.
    ///
    /// # Errors
    ///
    /// `InvalidPin` for a bad pin; register access errors otherwise.
    pub fn clear_pin(&self, pin: u32) -> GpioResult<()> {
        let pin = self.pin(pin)?;
        PinIo::new(&self.regs).clear(pin)
    }

    /// Returns `true` if `pin` is high.
    ///
    /// # Errors
    ///
    /// `InvalidPin` for a bad pin; register access errors otherwise.
    pub fn read_pin(&self, pin: u32) -> GpioResult<bool> {
        let pin = self.pin(pin)?;
        PinIo::new(&self.regs).read(pin)
    }

    /// Drives `pin` to `level`.
    ///
    /// # Errors
    ///
    /// `InvalidPin` for a bad pin; register access errors otherwise.
    pub fn write_pin(&self, pin: u32, level: bool) -> GpioResult<()> {
        let pin = self.pin(pin)?;
        PinIo::new(&self.regs).write(pin, level)
    }

    /// Inverts the level of `pin` and returns the new level.
    ///
    /// # Errors
    ///
    /// `InvalidPin` for a bad pin; register access errors otherwise.
    pub fn toggle_pin(&self, pin: u32) -> GpioResult<bool> {
        let pin = self.pin(pin)?;
        let io = PinIo::new(&self.regs);
        let level = !io.read(pin)?;
        io.write(pin, level)?;
        Ok(level)
    }

    /// Exports `pin` for edge interrupts and returns the descriptor to poll.
    ///
    /// Wait on the descriptor for `POLLPRI`. After every event, call
    /// [`Gpio::acknowledge`] (or seek to 0 and read the descriptor) before the
    /// next edge is reported. The descriptor belongs to this instance; release
    /// it with [`Gpio::unexport`] or by dropping the instance, never by `close`.
    ///
    /// # Errors
    ///
    /// `InvalidPin`, `AlreadyExported`, `ExportFailed`, or `ConfigFailed`.
    pub fn try_set_single_kernel_driver(
        &mut self,
        pin: u32,
        pull: PullState,
        edge: Edge,
    ) -> GpioResult<RawFd> {
        let pin = self.pin(pin)?;
        self.exporter.export(pin, pull, edge)
    }

    /// Like [`Gpio::try_set_single_kernel_driver`] but returns
    /// [`INVALID_HANDLE`] (a negative value) on failure.
    pub fn set_single_kernel_driver(&mut self, pin: u32, pull: PullState, edge: Edge) -> RawFd {
        match self.try_set_single_kernel_driver(pin, pull, edge) {
            Ok(fd) => fd,
            Err(e) => {
                debug!(pin, error = %e, "interrupt setup failed");
                INVALID_HANDLE
            }
        }
    }

    /// Acknowledges a pending edge on `pin` and returns the pin level.
    ///
    /// # Errors
    ///
    /// `InvalidPin`, `NotExported`, or `ConfigFailed` if the read fails.
    pub fn acknowledge(&self, pin: u32) -> GpioResult<bool> {
        let pin = self.pin(pin)?;
        self.exporter.acknowledge(pin)
    }

    /// Releases the interrupt export of `pin`. Unexporting twice is not an error.
    ///
    /// # Errors
    ///
    /// `InvalidPin`, or `ExportFailed` if the kernel rejects the request.
    pub fn unexport(&mut self, pin: u32) -> GpioResult<()> {
        let pin = self.pin(pin)?;
        self.exporter.unexport(pin)
    }
}
