//! In-memory model of the PWM generator for host runs and tests.
//!
//! Mirrors the register behaviour the driver relies on: one load register,
//! shadowed compare registers latched at reload, per-pin alternate-function
//! select and a GPIO data bit.  [`SimPwm::high_ticks`] walks one counter
//! cycle through the comparator so tests can check the real on-time.

use crate::drivers::pwm::{GeneratorActions, OutputAction, PinMode, PwmChannel, PwmPeripheral};

#[derive(Debug, Clone, Copy)]
struct SimChannel {
    actions: Option<GeneratorActions>,
    /// Value last written to the compare register.
    compare: u16,
    /// Value the comparator is currently using.
    active_compare: u16,
    output_enabled: bool,
    pin_mode: PinMode,
    pin_level: bool,
    /// Times the pin was handed to the timer.
    timer_connects: u32,
}

impl SimChannel {
    const fn reset() -> Self {
        Self {
            actions: None,
            compare: 0,
            active_compare: 0,
            output_enabled: false,
            pin_mode: PinMode::Gpio,
            pin_level: false,
            timer_connects: 0,
        }
    }
}

/// Simulated PWM generator with two comparator channels.
#[derive(Debug, Clone)]
pub struct SimPwm {
    load: u16,
    running: bool,
    counter_programs: u32,
    register_writes: u32,
    channels: [SimChannel; 2],
}

impl Default for SimPwm {
    fn default() -> Self {
        Self::new()
    }
}

impl SimPwm {
    pub fn new() -> Self {
        Self {
            load: 0,
            running: false,
            counter_programs: 0,
            register_writes: 0,
            channels: [SimChannel::reset(); 2],
        }
    }

    /// Counter reached zero and reloaded: shadow registers take effect.
    pub fn reload(&mut self) {
        for ch in &mut self.channels {
            ch.active_compare = ch.compare;
        }
    }

    pub fn load(&self) -> u16 {
        self.load
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// How many times the shared counter was (re)programmed.
    pub fn counter_programs(&self) -> u32 {
        self.counter_programs
    }

    /// Total register writes of any kind.
    pub fn register_writes(&self) -> u32 {
        self.register_writes
    }

    pub fn actions(&self, channel: PwmChannel) -> Option<GeneratorActions> {
        self.channels[channel.index()].actions
    }

    pub fn compare_register(&self, channel: PwmChannel) -> u16 {
        self.channels[channel.index()].compare
    }

    pub fn output_enabled(&self, channel: PwmChannel) -> bool {
        self.channels[channel.index()].output_enabled
    }

    pub fn pin_mode(&self, channel: PwmChannel) -> PinMode {
        self.channels[channel.index()].pin_mode
    }

    pub fn pin_level(&self, channel: PwmChannel) -> bool {
        self.channels[channel.index()].pin_level
    }

    /// How often `channel`'s pin was switched to the timer alternate function.
    pub fn timer_connects(&self, channel: PwmChannel) -> u32 {
        self.channels[channel.index()].timer_connects
    }

    /// Ticks the physical pin spends high during one full counter cycle.
    pub fn high_ticks(&self, channel: PwmChannel) -> u32 {
        let ch = &self.channels[channel.index()];
        let period = u32::from(self.load) + 1;

        if ch.pin_mode == PinMode::Gpio {
            return if ch.pin_level { period } else { 0 };
        }
        let Some(actions) = ch.actions else {
            return 0;
        };
        if !self.running || !ch.output_enabled {
            return 0;
        }

        let mut level = false;
        let mut high = 0;
        for count in (0..=self.load).rev() {
            if count == self.load {
                level = apply(actions.on_load, level);
            }
            if count == ch.active_compare {
                level = apply(actions.on_compare_down, level);
            }
            if level {
                high += 1;
            }
        }
        high
    }
}

fn apply(action: OutputAction, level: bool) -> bool {
    match action {
        OutputAction::Nothing => level,
        OutputAction::Invert => !level,
        OutputAction::DriveLow => false,
        OutputAction::DriveHigh => true,
    }
}

impl PwmPeripheral for SimPwm {
    fn program_counter(&mut self, load: u16) {
        self.register_writes += 1;
        self.counter_programs += 1;
        self.running = false;
        self.load = load;
    }

    fn start_counter(&mut self) {
        self.register_writes += 1;
        self.running = true;
    }

    fn set_actions(&mut self, channel: PwmChannel, actions: GeneratorActions) {
        self.register_writes += 1;
        self.channels[channel.index()].actions = Some(actions);
    }

    fn write_compare(&mut self, channel: PwmChannel, value: u16) {
        self.register_writes += 1;
        let ch = &mut self.channels[channel.index()];
        ch.compare = value;
        if !self.running {
            ch.active_compare = value;
        }
    }

    fn enable_output(&mut self, channel: PwmChannel) {
        self.register_writes += 1;
        self.channels[channel.index()].output_enabled = true;
    }

    fn set_pin_mode(&mut self, channel: PwmChannel, mode: PinMode) {
        self.register_writes += 1;
        let ch = &mut self.channels[channel.index()];
        if mode == PinMode::Alternate {
            ch.timer_connects += 1;
        }
        ch.pin_mode = mode;
    }

    fn write_pin(&mut self, channel: PwmChannel, high: bool) {
        self.register_writes += 1;
        self.channels[channel.index()].pin_level = high;
    }
}
