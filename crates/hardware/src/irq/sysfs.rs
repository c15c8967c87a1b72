//! Kernel interrupt-export interface.
//!
//! This module defines the `KernelInterface` trait and its sysfs implementation. The protocol is:
//! 1. **Export:** Write the pin number to `<root>/export`; the kernel creates `<root>/gpioN/`.
//! 2. **Configure:** Write values into per-pin attribute nodes (`pull`, `edge`).
//! 3. **Open:** Open `<root>/gpioN/value`; edges are reported as `POLLPRI` on it.
//! 4. **Unexport:** Write the pin number to `<root>/unexport`.
//!
//! The interface is global state shared with every other process on the host.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::common::pin::PinId;

/// Attribute node selecting the edge trigger.
pub const EDGE_ATTRIBUTE: &str = "edge";

/// Attribute node carrying the pin level and edge events.
pub const VALUE_ATTRIBUTE: &str = "value";

/// Operations of the kernel's per-pin interrupt-export interface.
///
/// Implementations report raw I/O errors; classification into `GpioError`
/// happens in the exporter.
pub trait KernelInterface: Send {
    /// Requests export of `pin`. Fails if the pin is already exported.
    fn export(&mut self, pin: PinId) -> io::Result<()>;

    /// Releases `pin`. Succeeds when the pin is not exported.
    fn unexport(&mut self, pin: PinId) -> io::Result<()>;

    /// Writes `value` into the attribute node `attribute` of an exported pin.
    fn write_attribute(&mut self, pin: PinId, attribute: &str, value: &str) -> io::Result<()>;

    /// Opens the value node of an exported pin for level reads and `POLLPRI` waits.
    fn open_value(&mut self, pin: PinId) -> io::Result<File>;
}

/// `KernelInterface` over the legacy `/sys/class/gpio` tree.
#[derive(Debug, Clone)]
pub struct SysfsInterface {
    root: PathBuf,
}

impl SysfsInterface {
    /// Creates an interface rooted at `root` (normally `/sys/class/gpio`).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory the kernel creates for an exported pin.
    pub fn pin_dir(&self, pin: PinId) -> PathBuf {
        self.root.join(format!("gpio{}", pin.number()))
    }

    /// Returns `true` if the pin currently has an export directory.
    pub fn is_exported(&self, pin: PinId) -> bool {
        self.pin_dir(pin).is_dir()
    }

    /// Writes `value` to an existing node without creating it.
    fn write_node(path: &Path, value: &str) -> io::Result<()> {
        trace!(node = %path.display(), value, "sysfs write");
        let mut node = OpenOptions::new().write(true).open(path)?;
        node.write_all(value.as_bytes())
    }
}

impl KernelInterface for SysfsInterface {
    fn export(&mut self, pin: PinId) -> io::Result<()> {
        if self.is_exported(pin) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{pin} is already exported"),
            ));
        }
        Self::write_node(&self.root.join("export"), &pin.number().to_string())
    }

    fn unexport(&mut self, pin: PinId) -> io::Result<()> {
        if !self.is_exported(pin) {
            return Ok(());
        }
        match Self::write_node(&self.root.join("unexport"), &pin.number().to_string()) {
            // EINVAL: the pin went away between the check and the write.
            Err(e) if e.kind() == io::ErrorKind::InvalidInput => Ok(()),
            other => other,
        }
    }

    fn write_attribute(&mut self, pin: PinId, attribute: &str, value: &str) -> io::Result<()> {
        Self::write_node(&self.pin_dir(pin).join(attribute), value)
    }

    fn open_value(&mut self, pin: PinId) -> io::Result<File> {
        OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(self.pin_dir(pin).join(VALUE_ATTRIBUTE))
    }
}
