//! # Unit Components
//!
//! This module organizes the tests by layer, from the register layout up to
//! the end-to-end scenarios that drive a whole `Gpio` instance.

/// Pin numbering, register layout, and configuration.
pub mod common;



/// End-to-end scenarios over fake register and kernel backends.
pub mod scenarios;
