//! End-to-End Scenarios.
//!
//! Drives a whole `Gpio` the way the demo program does: an input on 23, an
//! output on 24, and a rising-edge interrupt with pull-down on 25.

use crate::common::mocks::kernel::{FakeKernel, MockKernel, value_file};
use crate::common::mocks::registers::{Access, FakeRegisters};
use crate::common::test_config;
use gpiomem_core::common::constants::{GPCLR0, GPLEV0, GPSET0};
use gpiomem_core::{Edge, Gpio, PinMode, PullState};
use mockall::Sequence;
use pretty_assertions::assert_eq;
use std::os::fd::AsRawFd;

const INPUT: u32 = 23;
const OUTPUT: u32 = 24;
const INTERRUPT: u32 = 25;

#[test]
fn scenario_input_output_levels() {
    let gpio = Gpio::with_backends(FakeRegisters::new(), FakeKernel::new(), &test_config());

    gpio.make_input(INPUT).unwrap();
    gpio.make_output(OUTPUT).unwrap();

    // GPFSEL2 holds pins 20-29: pin 23 at bits 9-11, pin 24 at bits 12-14.
    let fsel2 = gpio.registers().peek(0x08);
    assert_eq!((fsel2 >> 9) & 0b111, 0b000);
    assert_eq!((fsel2 >> 12) & 0b111, 0b001);
    assert_eq!(gpio.mode(INPUT).unwrap(), Some(PinMode::Input));
    assert_eq!(gpio.mode(OUTPUT).unwrap(), Some(PinMode::Output));

    gpio.registers().clear_log();
    gpio.set_pin(OUTPUT).unwrap();
    assert!(gpio.read_pin(OUTPUT).unwrap());
    gpio.clear_pin(OUTPUT).unwrap();
    assert!(!gpio.read_pin(OUTPUT).unwrap());

    assert_eq!(
        gpio.registers().accesses(),
        vec![
            Access::Write(GPSET0, 1 << 24),
            Access::Read(GPLEV0),
            Access::Write(GPCLR0, 1 << 24),
            Access::Read(GPLEV0),
        ]
    );
    // The input pin's level was never driven.
    assert!(!gpio.read_pin(INPUT).unwrap());
}

#[test]
fn scenario_interrupt_setup_order() {
    let mut kernel = MockKernel::new();
    let mut seq = Sequence::new();
    let file = value_file("0\n");
    let opened = file.as_raw_fd();

    kernel
        .expect_export()
        .withf(|p| p.number() == 25)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    kernel
        .expect_write_attribute()
        .withf(|p, a, v| p.number() == 25 && a.to_string() == "pull" && v.to_string() == "down")
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(()));
    kernel
        .expect_write_attribute()
        .withf(|p, a, v| p.number() == 25 && a.to_string() == "edge" && v.to_string() == "rising")
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(()));
    kernel
        .expect_open_value()
        .withf(|p| p.number() == 25)
        .times(1)
        .in_sequence(&mut seq)
        .return_once(move |_| Ok(file));
    kernel
        .expect_unexport()
        .withf(|p| p.number() == 25)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));

    let mut gpio = Gpio::with_backends(FakeRegisters::new(), kernel, &test_config());
    gpio.make_input(INPUT).unwrap();
    gpio.make_output(OUTPUT).unwrap();

    let fd = gpio.set_single_kernel_driver(INTERRUPT, PullState::Down, Edge::Rising);
    assert_eq!(fd, opened);

    // Consume the (simulated) edge, then toggle the output as the demo does.
    assert!(!gpio.acknowledge(INTERRUPT).unwrap());
    assert!(gpio.toggle_pin(OUTPUT).unwrap());
    assert!(gpio.read_pin(OUTPUT).unwrap());

    gpio.unexport(INTERRUPT).unwrap();
    // Already released: teardown does not unexport a second time.
    drop(gpio);
}
