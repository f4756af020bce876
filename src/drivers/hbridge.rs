//! Dual-motor H-bridge direction driver (IN1-IN4).
//!
//! Four plain digital inputs select the drive mode of both motors:
//! `IN1/IN2` for motor A, `IN3/IN4` for motor B.  Patterns come from
//! [`pins::hbridge_pattern`]; speed is set separately on the PWM enable
//! lines.
//!
//! Switching direction first releases every line that must go low, then
//! raises the new ones, so `INx` and `INx+1` of one motor are never high
//! together.

use embedded_hal::digital::OutputPin;
use log::debug;

use crate::error::{PinError, Result};
use crate::fsm::Direction;
use crate::pins::{self, HBRIDGE_LINES};

pub struct HBridge<P> {
    lines: [P; HBRIDGE_LINES],
    direction: Direction,
}

impl<P: OutputPin> HBridge<P> {
    /// Take ownership of IN1..IN4 and drive them to the brake pattern.
    pub fn new(lines: [P; HBRIDGE_LINES]) -> Result<Self> {
        let mut bridge = Self {
            lines,
            direction: Direction::Brake,
        };
        bridge.write_pattern(pins::hbridge_pattern(Direction::Brake))?;
        Ok(bridge)
    }

    pub fn apply(&mut self, direction: Direction) -> Result<()> {
        let pattern = pins::hbridge_pattern(direction);
        self.write_pattern(pattern)?;
        self.direction = direction;
        debug!("H-bridge: {direction:?} (0x{pattern:02X})");
        Ok(())
    }

    pub fn brake(&mut self) -> Result<()> {
        self.apply(Direction::Brake)
    }

    /// Direction currently driven on the pins.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    fn write_pattern(&mut self, pattern: u8) -> Result<()> {
        // Lows first.
        for (i, line) in self.lines.iter_mut().enumerate() {
            if pattern & (1 << i) == 0 {
                line.set_low().map_err(|_| PinError::HBridge(i as u8))?;
            }
        }
        for (i, line) in self.lines.iter_mut().enumerate() {
            if pattern & (1 << i) != 0 {
                line.set_high().map_err(|_| PinError::HBridge(i as u8))?;
            }
        }
        Ok(())
    }
}
