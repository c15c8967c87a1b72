//! Interrupt export, configuration, and tracking.
//!
//! The exporter runs the export -> pull -> edge -> open sequence against a
//! `KernelInterface`, retries attribute writes and the value open across the
//! window in which udev is still fixing up the freshly created nodes, and remembers every pin it
//! exported so the pins can be released again when the exporter is dropped.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, RawFd};
use std::thread;
use std::time::Duration;

use tracing::{debug, trace};

use crate::common::error::{GpioError, GpioResult};
use crate::common::pin::{Edge, PinId, PullState};
use crate::config::GpioConfig;
use crate::irq::sysfs::{EDGE_ATTRIBUTE, KernelInterface, VALUE_ATTRIBUTE};

/// Sentinel returned instead of a descriptor when interrupt setup fails.
pub const INVALID_HANDLE: RawFd = -1;

/// Bounded retry for attribute writes and the value open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one (at least 1).
    pub attempts: u32,
    /// Pause between attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    /// Builds the policy from configuration.
    pub fn from_config(config: &GpioConfig) -> Self {
        Self {
            attempts: config.config_retries.max(1),
            delay: config.retry_delay(),
        }
    }
}

/// Errors that appear while udev has not yet applied ownership to new nodes.
fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
    )
}

/// Reads the level from a value node, rewinding first.
///
/// This is the acknowledgment the kernel requires after every reported edge:
/// until the node is re-read from offset 0 no further edge is signalled.
fn read_level(mut node: &File) -> io::Result<bool> {
    node.seek(SeekFrom::Start(0))?;
    let mut buf = [0u8; 8];
    let n = node.read(&mut buf)?;
    Ok(buf[..n].first() == Some(&b'1'))
}

/// Acknowledges an edge on a raw value-node handle and returns the current level.
///
/// The descriptor is duplicated, so the file offset is shared with `fd` and the
/// caller's handle stays open.
///
/// # Errors
///
/// Returns the I/O error from `dup`, `lseek`, or `read`.
pub fn acknowledge_fd(fd: BorrowedFd<'_>) -> io::Result<bool> {
    let node = File::from(fd.try_clone_to_owned()?);
    read_level(&node)
}

/// A pin exported for interrupt delivery, holding its open value node.
#[derive(Debug)]
pub struct ExportedInterrupt {
    pin: PinId,
    pull: PullState,
    edge: Edge,
    value: File,
}

impl ExportedInterrupt {
    /// Pin this export belongs to.
    pub const fn pin(&self) -> PinId {
        self.pin
    }

    /// Pull resistor applied at export time.
    pub const fn pull(&self) -> PullState {
        self.pull
    }

    /// Edge trigger applied at export time.
    pub const fn edge(&self) -> Edge {
        self.edge
    }

    /// Raw descriptor of the value node, for `poll(POLLPRI)`.
    pub fn raw_fd(&self) -> RawFd {
        self.value.as_raw_fd()
    }

    /// Rewinds and reads the value node, acknowledging a pending edge.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from `lseek` or `read`.
    pub fn acknowledge(&self) -> io::Result<bool> {
        read_level(&self.value)
    }
}

impl AsFd for ExportedInterrupt {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.value.as_fd()
    }
}

/// Drives a `KernelInterface` and tracks the exports it created.
///
/// At most one export per pin exists at a time; a second request for a tracked
/// pin fails with `GpioError::AlreadyExported`.
#[derive(Debug)]
pub struct InterruptExporter<K: KernelInterface> {
    kernel: K,
    exports: BTreeMap<PinId, ExportedInterrupt>,
    pull_attribute: String,
    retry: RetryPolicy,
}

impl<K: KernelInterface> InterruptExporter<K> {
    /// Creates an exporter writing pulls to `pull_attribute`.
    pub fn new(kernel: K, pull_attribute: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            kernel,
            exports: BTreeMap::new(),
            pull_attribute: pull_attribute.into(),
            retry,
        }
    }

    /// Creates an exporter from configuration.
    pub fn from_config(kernel: K, config: &GpioConfig) -> Self {
        Self::new(
            kernel,
            config.pull_attribute.clone(),
            RetryPolicy::from_config(config),
        )
    }

    /// Returns the kernel interface.
    pub const fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Returns `true` if this exporter currently holds an export of `pin`.
    pub fn is_exported(&self, pin: PinId) -> bool {
        self.exports.contains_key(&pin)
    }

    /// Returns the tracked export of `pin`.
    pub fn get(&self, pin: PinId) -> Option<&ExportedInterrupt> {
        self.exports.get(&pin)
    }

    /// Iterates over the exported pins in ascending order.
    pub fn exported_pins(&self) -> impl Iterator<Item = PinId> + '_ {
        self.exports.keys().copied()
    }

    /// Exports `pin`, applies `pull` and `edge`, and opens its value node.
    ///
    /// On any failure after the export step the pin is unexported again.
    /// The returned descriptor stays owned by the exporter.
    ///
    /// # Errors
    ///
    /// `AlreadyExported` if this exporter holds the pin, `ExportFailed` if the
    /// kernel rejects the export, `ConfigFailed` if an attribute write or the
    /// open of the value node fails.
    pub fn export(&mut self, pin: PinId, pull: PullState, edge: Edge) -> GpioResult<RawFd> {
        if self.is_exported(pin) {
            return Err(GpioError::AlreadyExported(pin.number()));
        }

        self.kernel
            .export(pin)
            .map_err(|source| GpioError::ExportFailed {
                pin: pin.number(),
                source,
            })?;
        debug!(%pin, "exported for interrupts");

        let value = match self.configure(pin, pull, edge) {
            Ok(value) => value,
            Err(err) => {
                if let Err(e) = self.kernel.unexport(pin) {
                    debug!(%pin, error = %e, "rollback unexport failed");
                }
                return Err(err);
            }
        };

        let export = ExportedInterrupt {
            pin,
            pull,
            edge,
            value,
        };
        let fd = export.raw_fd();
        self.exports.insert(pin, export);
        debug!(%pin, ?pull, ?edge, fd, "interrupt ready");
        Ok(fd)
    }

    /// Writes pull and edge, then opens the value node.
    fn configure(&mut self, pin: PinId, pull: PullState, edge: Edge) -> GpioResult<File> {
        let kernel = &mut self.kernel;
        let pull_attribute = self.pull_attribute.as_str();
        with_retry(self.retry, pin, pull_attribute, || {
            kernel.write_attribute(pin, pull_attribute, pull.as_sysfs())
        })?;
        with_retry(self.retry, pin, EDGE_ATTRIBUTE, || {
            kernel.write_attribute(pin, EDGE_ATTRIBUTE, edge.as_sysfs())
        })?;
        let value = with_retry(self.retry, pin, VALUE_ATTRIBUTE, || {
            kernel.open_value(pin)
        })?;
        // A fresh value node reports POLLPRI until it has been read once.
        if let Err(e) = read_level(&value) {
            trace!(%pin, error = %e, "initial value read failed");
        }
        Ok(value)
    }

    /// Unexports a tracked `pin` and closes its value node.
    ///
    /// Pins this exporter does not hold are left alone, so unexporting twice
    /// succeeds and exports owned by other consumers are never released. If
    /// the kernel rejects the request the pin stays tracked and its handle
    /// stays open.
    ///
    /// # Errors
    ///
    /// `ExportFailed` if the kernel rejects the unexport request.
    pub fn unexport(&mut self, pin: PinId) -> GpioResult<()> {
        if !self.is_exported(pin) {
            trace!(%pin, "not exported here, nothing to release");
            return Ok(());
        }
        self.kernel
            .unexport(pin)
            .map_err(|source| GpioError::ExportFailed {
                pin: pin.number(),
                source,
            })?;
        if self.exports.remove(&pin).is_some() {
            debug!(%pin, "closed interrupt handle");
        }
        Ok(())
    }

    /// Acknowledges a pending edge on `pin` and returns its level.
    ///
    /// # Errors
    ///
    /// `NotExported` if the pin is not tracked, `ConfigFailed` if the value
    /// node cannot be read.
    pub fn acknowledge(&self, pin: PinId) -> GpioResult<bool> {
        let export = self
            .exports
            .get(&pin)
            .ok_or(GpioError::NotExported(pin.number()))?;
        export
            .acknowledge()
            .map_err(|source| GpioError::ConfigFailed {
                pin: pin.number(),
                attribute: VALUE_ATTRIBUTE.to_string(),
                source,
            })
    }
}

impl<K: KernelInterface> Drop for InterruptExporter<K> {
    fn drop(&mut self) {
        let pins: Vec<PinId> = self.exports.keys().copied().collect();
        for pin in pins {
            if let Err(e) = self.unexport(pin) {
                debug!(%pin, error = %e, "unexport on teardown failed");
            }
        }
    }
}

/// Runs one step on a freshly exported node, retrying transient failures per `retry`.
fn with_retry<T>(
    retry: RetryPolicy,
    pin: PinId,
    attribute: &str,
    mut step: impl FnMut() -> io::Result<T>,
) -> GpioResult<T> {
    let mut attempt = 1;
    loop {
        match step() {
            Ok(out) => return Ok(out),
            Err(e) if attempt < retry.attempts && is_transient(&e) => {
                trace!(%pin, attribute, attempt, error = %e, "node not ready, retrying");
                attempt += 1;
                thread::sleep(retry.delay);
            }
            Err(source) => {
                return Err(GpioError::ConfigFailed {
                    pin: pin.number(),
                    attribute: attribute.to_string(),
                    source,
                });
            }
        }
    }
}
