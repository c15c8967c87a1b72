//! Configuration for the GPIO library.
//!
//! This module defines the configuration structure used to construct a `Gpio` instance. It provides:
//! 1. **Defaults:** Device path, mapping window, sysfs root, and retry policy.
//! 2. **Loading:** JSON deserialization from a string or a file.
//!
//! Every field is optional in the JSON document; missing fields take the defaults below.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::common::constants::{DEFAULT_MAP_LEN, PIN_COUNT};
use crate::common::error::{GpioError, GpioResult};

/// Default configuration constants.
mod defaults {
    /// Device exposing only the GPIO block, usable without root on Raspberry Pi OS.
    pub const DEVICE_PATH: &str = "/dev/gpiomem";

    /// File offset of the GPIO block inside the device (0 for `/dev/gpiomem`).
    pub const MAP_OFFSET: u64 = 0;

    /// Root of the legacy sysfs GPIO interface.
    pub const SYSFS_ROOT: &str = "/sys/class/gpio";

    /// Per-pin attribute holding the pull resistor setting.
    pub const PULL_ATTRIBUTE: &str = "pull";

    /// Attempts per attribute write while udev fixes up freshly exported nodes.
    pub const CONFIG_RETRIES: u32 = 20;

    /// Delay between attribute write attempts in milliseconds.
    pub const RETRY_DELAY_MS: u64 = 50;
}

/// Runtime configuration of a `Gpio` instance.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct GpioConfig {
    /// Register device file.
    pub device_path: PathBuf,
    /// Byte offset of the register block within the device file.
    pub map_offset: u64,
    /// Length of the mapped window in bytes.
    pub map_len: usize,
    /// Root directory of the kernel interrupt-export interface.
    pub sysfs_root: PathBuf,
    /// Name of the per-pin pull resistor attribute.
    pub pull_attribute: String,
    /// Exclusive upper bound of accepted pin numbers (clamped to the chip's pin count).
    pub pin_count: u8,
    /// Maximum attempts for each attribute write after export.
    pub config_retries: u32,
    /// Delay between attempts in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for GpioConfig {
    fn default() -> Self {
        Self {
            device_path: PathBuf::from(defaults::DEVICE_PATH),
            map_offset: defaults::MAP_OFFSET,
            map_len: DEFAULT_MAP_LEN,
            sysfs_root: PathBuf::from(defaults::SYSFS_ROOT),
            pull_attribute: defaults::PULL_ATTRIBUTE.to_string(),
            pin_count: PIN_COUNT,
            config_retries: defaults::CONFIG_RETRIES,
            retry_delay_ms: defaults::RETRY_DELAY_MS,
        }
    }
}

impl GpioConfig {
    /// Parses a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`GpioError::Config`] if the document is malformed or has unknown fields.
    pub fn from_json(json: &str) -> GpioResult<Self> {
        serde_json::from_str(json).map_err(|e| GpioError::Config(e.to_string()))
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`GpioError::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> GpioResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| GpioError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    /// Delay between attribute write attempts.
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Effective pin limit after clamping to the chip's pin count.
    pub fn pin_limit(&self) -> u8 {
        self.pin_count.min(PIN_COUNT)
    }
}
