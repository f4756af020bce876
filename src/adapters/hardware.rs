//! Hardware adapter: bridges the motor drivers to the [`MotorPort`] trait.
//!
//! Owns the PWM driver, the H-bridge and the indicator LEDs.  This is
//! the only module that touches output hardware; which hardware depends
//! on the `PwmPeripheral` and `OutputPin` implementations plugged in
//! (registers on the board, [`SimPwm`](super::sim_pwm::SimPwm) and
//! [`SimPin`](super::sim_gpio::SimPin) on the host).

use embedded_hal::digital::OutputPin;
use log::info;

use crate::app::ports::MotorPort;
use crate::drivers::hbridge::HBridge;
use crate::drivers::pwm::{PwmChannel, PwmDriver, PwmPeripheral};
use crate::drivers::status_led::StatusLeds;
use crate::error::Result;
use crate::fsm::Direction;
use crate::pins::{HBRIDGE_LINES, STATUS_LEDS};

/// Concrete adapter that combines all motor outputs behind [`MotorPort`].
pub struct HardwareAdapter<P: PwmPeripheral, O> {
    pwm: PwmDriver<P>,
    bridge: HBridge<O>,
    leds: StatusLeds<O>,
}

impl<P: PwmPeripheral, O: OutputPin> HardwareAdapter<P, O> {
    /// Bring up the outputs in a safe state: both channels configured at
    /// `period` with duty 0, bridge braked, red LED lit.
    pub fn init(
        pwm_hw: P,
        period: u16,
        bridge_pins: [O; HBRIDGE_LINES],
        led_pins: [O; STATUS_LEDS],
    ) -> Result<Self> {
        let bridge = HBridge::new(bridge_pins)?;
        let leds = StatusLeds::new(led_pins)?;

        let mut pwm = PwmDriver::new(pwm_hw);
        for channel in PwmChannel::ALL {
            pwm.configure(channel, period, 0)?;
        }
        info!("motor outputs ready: period {period} ticks, braked");

        Ok(Self { pwm, bridge, leds })
    }

    pub fn pwm(&self) -> &PwmDriver<P> {
        &self.pwm
    }

    pub fn pwm_mut(&mut self) -> &mut PwmDriver<P> {
        &mut self.pwm
    }

    pub fn bridge(&self) -> &HBridge<O> {
        &self.bridge
    }

    pub fn leds(&self) -> &StatusLeds<O> {
        &self.leds
    }
}

// ── MotorPort implementation ──────────────────────────────────

impl<P: PwmPeripheral, O: OutputPin> MotorPort for HardwareAdapter<P, O> {
    fn set_duty(&mut self, channel: PwmChannel, duty: u16) -> Result<()> {
        self.pwm.channel(channel).set_duty(duty)
    }

    fn set_direction(&mut self, direction: Direction) -> Result<()> {
        self.bridge.apply(direction)?;
        self.leds.show(direction)
    }
}
