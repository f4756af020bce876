//! Actuator drivers and input conditioning.

pub mod button;
pub mod hbridge;
pub mod pwm;
pub mod status_led;
