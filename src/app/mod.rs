//! Application core: pure domain logic, zero I/O.
//!
//! Turns debounced button presses into speed and direction commands.
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
