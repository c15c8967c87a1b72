//! Sysfs Interface Tests.
//!
//! Runs the sysfs backend against a temporary directory laid out like
//! `/sys/class/gpio`. The directory does not react to writes, so the tests
//! create the per-pin nodes the kernel would.

use crate::common::test_config;
use gpiomem_core::irq::{KernelInterface, SysfsInterface};
use gpiomem_core::soc::RegisterAccess;
use gpiomem_core::{Edge, Gpio, GpioConfig, GpioError, INVALID_HANDLE, PinId, PullState};
use pretty_assertions::assert_eq;
use std::fs;
use std::io::{ErrorKind, Read};
use std::path::Path;
use tempfile::{NamedTempFile, TempDir};

/// Creates the control nodes of an empty sysfs GPIO root.
fn sysfs_root() -> TempDir {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("export"), "").unwrap();
    fs::write(root.path().join("unexport"), "").unwrap();
    root
}

/// Creates the attribute nodes the kernel adds for an exported pin.
fn create_pin_nodes(root: &Path, pin: u8) {
    let dir = root.join(format!("gpio{pin}"));
    fs::create_dir(&dir).unwrap();
    for node in ["pull", "edge", "direction"] {
        fs::write(dir.join(node), "").unwrap();
    }
    fs::write(dir.join("value"), "1\n").unwrap();
}

fn pin(n: u32) -> PinId {
    PinId::new(n).unwrap()
}

#[test]
fn sysfs_export_writes_pin_number() {
    let root = sysfs_root();
    let mut sysfs = SysfsInterface::new(root.path());
    sysfs.export(pin(25)).unwrap();
    assert_eq!(fs::read_to_string(root.path().join("export")).unwrap(), "25");
}

#[test]
fn sysfs_export_of_exported_pin_fails() {
    let root = sysfs_root();
    create_pin_nodes(root.path(), 25);
    let mut sysfs = SysfsInterface::new(root.path());
    assert!(sysfs.is_exported(pin(25)));
    let err = sysfs.export(pin(25)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(fs::read_to_string(root.path().join("export")).unwrap(), "");
}

#[test]
fn sysfs_export_without_interface_fails() {
    let root = TempDir::new().unwrap();
    let mut sysfs = SysfsInterface::new(root.path().join("missing"));
    assert_eq!(sysfs.export(pin(4)).unwrap_err().kind(), ErrorKind::NotFound);
}

#[test]
fn sysfs_attribute_write_and_value_open() {
    let root = sysfs_root();
    create_pin_nodes(root.path(), 25);
    let mut sysfs = SysfsInterface::new(root.path());

    sysfs.write_attribute(pin(25), "pull", "down").unwrap();
    sysfs.write_attribute(pin(25), "edge", "rising").unwrap();
    let dir = sysfs.pin_dir(pin(25));
    assert_eq!(fs::read_to_string(dir.join("pull")).unwrap(), "down");
    assert_eq!(fs::read_to_string(dir.join("edge")).unwrap(), "rising");

    let mut value = sysfs.open_value(pin(25)).unwrap();
    let mut content = String::new();
    let _ = value.read_to_string(&mut content).unwrap();
    assert_eq!(content, "1\n");
}

#[test]
fn sysfs_attribute_write_never_creates_nodes() {
    let root = sysfs_root();
    let mut sysfs = SysfsInterface::new(root.path());
    let err = sysfs.write_attribute(pin(25), "edge", "both").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(!sysfs.pin_dir(pin(25)).exists());
}

#[test]
fn sysfs_unexport_is_idempotent() {
    let root = sysfs_root();
    let mut sysfs = SysfsInterface::new(root.path());

    // Not exported: nothing is written.
    sysfs.unexport(pin(25)).unwrap();
    sysfs.unexport(pin(25)).unwrap();
    assert_eq!(fs::read_to_string(root.path().join("unexport")).unwrap(), "");

    create_pin_nodes(root.path(), 25);
    sysfs.unexport(pin(25)).unwrap();
    assert_eq!(fs::read_to_string(root.path().join("unexport")).unwrap(), "25");
}

#[test]
fn gpio_over_sysfs_rolls_back_when_nodes_never_appear() {
    let root = sysfs_root();
    let device = NamedTempFile::new().unwrap();
    device.as_file().set_len(4096).unwrap();

    let config = GpioConfig {
        device_path: device.path().to_path_buf(),
        sysfs_root: root.path().to_path_buf(),
        ..test_config()
    };
    let mut gpio = Gpio::from_config(&config).unwrap();

    assert_eq!(
        gpio.set_single_kernel_driver(25, PullState::Down, Edge::Rising),
        INVALID_HANDLE
    );
    let err = gpio
        .try_set_single_kernel_driver(25, PullState::Down, Edge::Rising)
        .unwrap_err();
    assert!(
        matches!(&err, GpioError::ConfigFailed { pin: 25, attribute, .. } if attribute == "pull"),
        "{err:?}"
    );
    assert!(gpio.exporter().get(pin(25)).is_none());
}

#[test]
fn gpio_over_file_backed_registers() {
    let device = NamedTempFile::new().unwrap();
    device.as_file().set_len(4096).unwrap();

    let gpio = Gpio::new(device.path()).unwrap();
    gpio.make_output(24).unwrap();
    gpio.set_pin(24).unwrap();
    gpio.clear_pin(40).unwrap();
    // Plain memory has no set/clear side effects: the written words stay put.
    assert_eq!(gpio.registers().read_word(0x08).unwrap(), 0b001 << 12);
    drop(gpio);

    let bytes = fs::read(device.path()).unwrap();
    let word = |offset: usize| u32::from_ne_bytes(bytes[offset..offset + 4].try_into().unwrap());
    assert_eq!(word(0x08), 0b001 << 12);
    assert_eq!(word(0x1C), 1 << 24);
    assert_eq!(word(0x2C), 1 << 8);
}
