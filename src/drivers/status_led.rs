//! Direction indicator LEDs.
//!
//! Three discrete LEDs on PF1-PF3: red = brake, blue = backward,
//! green = forward.  Exactly one is lit at a time.

use embedded_hal::digital::OutputPin;

use crate::error::{PinError, Result};
use crate::fsm::Direction;
use crate::pins::{self, STATUS_LED_SHIFT, STATUS_LEDS};

pub struct StatusLeds<P> {
    /// Indexed by port F bit minus [`STATUS_LED_SHIFT`]: red, blue, green.
    leds: [P; STATUS_LEDS],
    current: u8,
}

impl<P: OutputPin> StatusLeds<P> {
    /// Takes `[red, blue, green]` and lights red.
    pub fn new(leds: [P; STATUS_LEDS]) -> Result<Self> {
        let mut this = Self { leds, current: 0 };
        this.show(Direction::Brake)?;
        Ok(this)
    }

    pub fn show(&mut self, direction: Direction) -> Result<()> {
        let pattern = pins::led_pattern(direction);
        for (i, led) in self.leds.iter_mut().enumerate() {
            let lit = pattern & (1 << (i as u8 + STATUS_LED_SHIFT)) != 0;
            let written = if lit { led.set_high() } else { led.set_low() };
            written.map_err(|_| PinError::StatusLed(i as u8))?;
        }
        self.current = pattern;
        Ok(())
    }

    /// Port F bit image of the lit LED.
    pub fn current(&self) -> u8 {
        self.current
    }
}
