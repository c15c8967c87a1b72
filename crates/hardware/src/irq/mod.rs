//! Interrupt-driven edge notification.
//!
//! This module bridges the kernel's GPIO interrupt export into a pollable descriptor. It provides:
//! 1. **Kernel Interface:** The `KernelInterface` trait and the sysfs implementation.
//! 2. **Exporter:** Ordered export/configure/open with bounded retry and per-pin tracking.

/// Export tracking and the acknowledgment helpers.
pub mod exporter;

/// Kernel interface trait and sysfs backend.
pub mod sysfs;

pub use exporter::{
    ExportedInterrupt, INVALID_HANDLE, InterruptExporter, RetryPolicy, acknowledge_fd,
};
pub use sysfs::{KernelInterface, SysfsInterface};
