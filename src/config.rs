//! System configuration parameters
//!
//! All tunable parameters for the TwinMotor controller.  The defaults
//! match the bench board: 50 MHz bus, PWM clock divided by 2,
//! 1 kHz output (period 25 000) and the `{0, 30, 60, 80, 98}` % speed ladder.

use core::fmt;

use heapless::Vec;
use serde::{Deserialize, Serialize};

/// Maximum number of speed levels the duty table can hold.
pub const MAX_SPEED_LEVELS: usize = 8;

/// Smallest period the down-counter can produce a usable waveform with.
pub const MIN_PERIOD: u32 = 3;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Clocking ---
    /// System bus clock supplied by the PLL (Hz).
    pub bus_clock_hz: u32,
    /// PWM unit clock divider (power of two, 1..=64).
    pub pwm_clock_divider: u8,
    /// Target PWM output frequency (Hz), shared by both channels.
    pub pwm_frequency_hz: u32,

    // --- Speed ladder ---
    /// Duty cycle of each speed level in percent.  Level 0 must be 0 (stop).
    pub duty_levels_percent: Vec<u8, MAX_SPEED_LEVELS>,

    // --- Input ---
    /// Minimum spacing between two accepted edges of one button (ms).
    pub debounce_ms: u32,

    // --- Safety ---
    /// Brake hold applied before a reversal at speed (ms).  0 = reverse
    /// immediately.
    pub reverse_brake_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let mut levels = Vec::new();
        for pct in [0u8, 30, 60, 80, 98] {
            // Capacity is MAX_SPEED_LEVELS, five always fit.
            let _ = levels.push(pct);
        }

        Self {
            // Clocking
            bus_clock_hz: 50_000_000,
            pwm_clock_divider: 2,
            pwm_frequency_hz: 1_000,

            // Speed ladder
            duty_levels_percent: levels,

            // Input
            debounce_ms: 150,

            // Safety
            reverse_brake_ms: 0,
        }
    }
}

/// Errors from configuration validation and loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Serialized config could not be parsed.
    Corrupted,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::Corrupted => write!(f, "config corrupted"),
        }
    }
}

impl core::error::Error for ConfigError {}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
            ConfigError::Corrupted => Self::Config("corrupted"),
        }
    }
}

/// Compare values for every speed level, derived from the shared period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DutyTable {
    period: u16,
    duties: Vec<u16, MAX_SPEED_LEVELS>,
}

impl DutyTable {
    /// Number of speed levels.
    pub fn len(&self) -> usize {
        self.duties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.duties.is_empty()
    }

    /// Duty (in counter ticks) of `level`.  Out-of-range levels map to 0.
    pub fn duty(&self, level: usize) -> u16 {
        self.duties.get(level).copied().unwrap_or(0)
    }

    pub fn period(&self) -> u16 {
        self.period
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.duties
    }
}

impl SystemConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field range.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bus_clock_hz == 0 {
            return Err(ConfigError::ValidationFailed("bus_clock_hz must be non-zero"));
        }
        if !self.pwm_clock_divider.is_power_of_two() || self.pwm_clock_divider > 64 {
            return Err(ConfigError::ValidationFailed(
                "pwm_clock_divider must be a power of two in 1..=64",
            ));
        }
        if self.pwm_frequency_hz == 0 {
            return Err(ConfigError::ValidationFailed("pwm_frequency_hz must be non-zero"));
        }

        let ticks = self.period_ticks();
        if ticks < MIN_PERIOD {
            return Err(ConfigError::ValidationFailed("pwm_frequency_hz too high for clock"));
        }
        if ticks > u32::from(u16::MAX) {
            return Err(ConfigError::ValidationFailed("pwm_frequency_hz too low for 16-bit counter"));
        }

        let levels = &self.duty_levels_percent;
        if levels.len() < 2 {
            return Err(ConfigError::ValidationFailed("need at least two speed levels"));
        }
        if levels[0] != 0 {
            return Err(ConfigError::ValidationFailed("speed level 0 must be 0%"));
        }
        if levels.iter().any(|&pct| pct > 100) {
            return Err(ConfigError::ValidationFailed("duty level above 100%"));
        }
        if levels.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::ValidationFailed("duty levels must strictly increase"));
        }
        // Rounded to counter ticks, every running level must stay above
        // zero and above the level below it.
        let mut below = 0;
        for &pct in &levels[1..] {
            let duty = duty_ticks(pct, ticks);
            if duty == 0 {
                return Err(ConfigError::ValidationFailed("duty level rounds to zero ticks"));
            }
            if duty <= below {
                return Err(ConfigError::ValidationFailed(
                    "duty levels round to the same tick count",
                ));
            }
            below = duty;
        }

        if self.debounce_ms == 0 {
            return Err(ConfigError::ValidationFailed("debounce_ms must be non-zero"));
        }

        Ok(())
    }

    /// PWM clock frequency after the divider (Hz).
    pub fn pwm_clock_hz(&self) -> u32 {
        self.bus_clock_hz / u32::from(self.pwm_clock_divider.max(1))
    }

    fn period_ticks(&self) -> u32 {
        self.pwm_clock_hz() / self.pwm_frequency_hz.max(1)
    }

    /// Counter ticks per PWM cycle: `pwm_clock / pwm_frequency`.
    pub fn period(&self) -> Result<u16, ConfigError> {
        self.validate()?;
        Ok(self.period_ticks() as u16)
    }

    /// Pre-computed duty for every level: `round(percent × period / 100)`.
    pub fn duty_table(&self) -> Result<DutyTable, ConfigError> {
        let period = self.period()?;
        let mut duties = Vec::new();
        for &pct in &self.duty_levels_percent {
            let duty = duty_ticks(pct, u32::from(period));
            duties
                .push(duty as u16)
                .map_err(|_| ConfigError::ValidationFailed("too many speed levels"))?;
        }
        Ok(DutyTable { period, duties })
    }
}

/// `round(percent × period / 100)`.
fn duty_ticks(pct: u8, period: u32) -> u32 {
    (u32::from(pct) * period + 50) / 100
}
