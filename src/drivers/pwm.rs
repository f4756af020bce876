//! Dual-channel PWM driver over one shared down-counter.
//!
//! Both motor outputs (PB6 = channel A, PB7 = channel B) come from the
//! two comparators of a single PWM generator.  There is exactly one load
//! register, so the period is latched by the first [`PwmDriver::configure`]
//! and every later channel must agree with it.
//!
//! ## Waveform
//!
//! The counter runs down from `period - 1` to 0 and reloads.  Each
//! comparator drives its pin low on reload and high when the falling
//! counter crosses `compare`, so the pin is high for `compare + 1` ticks.
//! Writing `compare = duty - 1` therefore gives exactly `duty` ticks of
//! on-time, and a larger duty means a longer pulse on both channels.
//!
//! ## Boundary policy
//!
//! | duty           | pin ownership       | output                       |
//! |----------------|---------------------|------------------------------|
//! | `0`            | plain GPIO          | static low                   |
//! | `1..period`    | timer alternate fn  | modulated, `compare = duty-1`|
//! | `period`       | plain GPIO          | static high                  |
//! | `> period`     | unchanged           | `Error::InvalidDutyCycle`    |
//!
//! Compare writes go to the shadow register and are latched on the next
//! reload, so a live update never produces a truncated pulse.

use log::{debug, info};

use crate::config::MIN_PERIOD;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Register-level port
// ---------------------------------------------------------------------------

/// One of the two comparator outputs of the shared generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PwmChannel {
    A = 0,
    B = 1,
}

impl PwmChannel {
    pub const ALL: [Self; 2] = [Self::A, Self::B];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// What a comparator does to its output on a counter event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputAction {
    Nothing,
    Invert,
    DriveLow,
    DriveHigh,
}

/// Comparator actions for the two events the driver uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorActions {
    /// Counter reloaded from the load register.
    pub on_load: OutputAction,
    /// Counter passed the compare value while counting down.
    pub on_compare_down: OutputAction,
}

/// Low on reload, high at the compare match.  Identical for both channels.
pub const MOTOR_ACTIONS: GeneratorActions = GeneratorActions {
    on_load: OutputAction::DriveLow,
    on_compare_down: OutputAction::DriveHigh,
};

/// Who drives the physical pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    /// Timer alternate function: the comparator drives the pin.
    Alternate,
    /// Plain digital output: the GPIO data register drives the pin.
    Gpio,
}

/// Register access to one PWM generator and its two output pins.
///
/// Implemented by the real peripheral block on target and by
/// [`SimPwm`](crate::adapters::sim_pwm::SimPwm) on the host.  Register
/// writes are infallible at this level.
pub trait PwmPeripheral {
    /// Stop the generator and program count-down mode, reloading from `load`.
    fn program_counter(&mut self, load: u16);

    /// Start (or keep running) the counter.
    fn start_counter(&mut self);

    /// Program the comparator actions of `channel`.
    fn set_actions(&mut self, channel: PwmChannel, actions: GeneratorActions);

    /// Write the (shadowed) compare register of `channel`.
    fn write_compare(&mut self, channel: PwmChannel, value: u16);

    /// Enable the generator output of `channel`.
    fn enable_output(&mut self, channel: PwmChannel);

    /// Hand the pin of `channel` to the timer or to the GPIO block.
    fn set_pin_mode(&mut self, channel: PwmChannel, mode: PinMode);

    /// Drive the GPIO data bit of `channel`'s pin.
    fn write_pin(&mut self, channel: PwmChannel, high: bool);
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Observable state of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOutput {
    Unconfigured,
    /// Timer owns the pin; `compare` is the value last written.
    Modulating { compare: u16 },
    /// GPIO owns the pin and holds it low (duty 0).
    ForcedLow,
    /// GPIO owns the pin and holds it high (duty == period).
    ForcedHigh,
}

/// Shared timebase owning the generator and the latched period.
pub struct PwmDriver<P: PwmPeripheral> {
    hw: P,
    period: Option<u16>,
    outputs: [ChannelOutput; 2],
}

impl<P: PwmPeripheral> PwmDriver<P> {
    pub fn new(hw: P) -> Self {
        Self {
            hw,
            period: None,
            outputs: [ChannelOutput::Unconfigured; 2],
        }
    }

    /// One-time setup of `channel`.
    ///
    /// The first call programs the shared counter (count-down, reload from
    /// `period - 1`).  Later calls must pass the same `period`; the counter
    /// is left untouched so a running channel is not disturbed.
    pub fn configure(&mut self, channel: PwmChannel, period: u16, initial_duty: u16) -> Result<()> {
        if u32::from(period) < MIN_PERIOD {
            return Err(Error::InvalidPeriod(period));
        }
        if initial_duty > period {
            return Err(Error::InvalidDutyCycle {
                duty: initial_duty,
                period,
            });
        }

        match self.period {
            Some(latched) if latched != period => {
                return Err(Error::ConfigurationConflict {
                    latched,
                    requested: period,
                });
            }
            Some(_) => {}
            None => {
                self.hw.program_counter(period - 1);
                self.period = Some(period);
            }
        }

        let compare = initial_duty.saturating_sub(1).min(period - 1);
        self.hw.set_actions(channel, MOTOR_ACTIONS);
        self.hw.write_compare(channel, compare);
        self.hw.start_counter();
        self.hw.enable_output(channel);

        // Boundary duties keep the pin on GPIO; the timer never drives it.
        self.outputs[channel.index()] = if initial_duty == 0 || initial_duty == period {
            self.force(channel, initial_duty == period)
        } else {
            self.hw.set_pin_mode(channel, PinMode::Alternate);
            ChannelOutput::Modulating { compare }
        };

        info!(
            "pwm: channel {:?} configured (period={}, duty={})",
            channel, period, initial_duty
        );
        Ok(())
    }

    /// Runtime duty update, see the module-level boundary table.
    pub fn set_duty(&mut self, channel: PwmChannel, duty: u16) -> Result<()> {
        let idx = channel.index();
        let period = match (self.period, self.outputs[idx]) {
            (Some(p), state) if state != ChannelOutput::Unconfigured => p,
            _ => return Err(Error::ChannelNotConfigured(channel)),
        };
        if duty > period {
            return Err(Error::InvalidDutyCycle { duty, period });
        }

        if duty == 0 || duty == period {
            self.outputs[idx] = self.force(channel, duty == period);
        } else {
            if !matches!(self.outputs[idx], ChannelOutput::Modulating { .. }) {
                self.hw.set_pin_mode(channel, PinMode::Alternate);
            }
            let compare = duty - 1;
            self.hw.write_compare(channel, compare);
            self.outputs[idx] = ChannelOutput::Modulating { compare };
        }

        debug!("pwm: channel {:?} duty={} -> {:?}", channel, duty, self.outputs[idx]);
        Ok(())
    }

    /// Latch the GPIO level, then take the pin away from the timer.
    fn force(&mut self, channel: PwmChannel, high: bool) -> ChannelOutput {
        self.hw.write_pin(channel, high);
        self.hw.set_pin_mode(channel, PinMode::Gpio);
        if high {
            ChannelOutput::ForcedHigh
        } else {
            ChannelOutput::ForcedLow
        }
    }

    /// Borrow a handle that can only touch `channel`.
    pub fn channel(&mut self, channel: PwmChannel) -> ChannelHandle<'_, P> {
        ChannelHandle {
            driver: self,
            channel,
        }
    }

    /// Latched period, `None` before the first `configure`.
    pub fn period(&self) -> Option<u16> {
        self.period
    }

    pub fn output(&self, channel: PwmChannel) -> ChannelOutput {
        self.outputs[channel.index()]
    }

    pub fn peripheral(&self) -> &P {
        &self.hw
    }

    pub fn peripheral_mut(&mut self) -> &mut P {
        &mut self.hw
    }
}

/// Per-channel view of the shared timebase.
pub struct ChannelHandle<'a, P: PwmPeripheral> {
    driver: &'a mut PwmDriver<P>,
    channel: PwmChannel,
}

impl<P: PwmPeripheral> ChannelHandle<'_, P> {
    pub fn id(&self) -> PwmChannel {
        self.channel
    }

    pub fn set_duty(&mut self, duty: u16) -> Result<()> {
        self.driver.set_duty(self.channel, duty)
    }

    pub fn output(&self) -> ChannelOutput {
        self.driver.output(self.channel)
    }
}
