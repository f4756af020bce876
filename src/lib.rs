//! TwinMotor firmware library.
//!
//! Dual brushed-DC motor control: two PWM channels on one shared
//! timebase, an H-bridge for direction and two debounced buttons driving
//! a speed/direction state machine.  Exposes the pure-logic modules and
//! the host simulation adapters for integration testing.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod events;
pub mod fsm;
pub mod pins;
pub mod safety;

pub use error::{Error, Result};
