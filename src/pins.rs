//! Pin assignments and output bit patterns for the motor board.
//!
//! Single source of truth: the drivers index into the lookup tables here
//! rather than spelling bit masks inline.
//!
//! | Signal          | Pin      | Notes                                   |
//! |-----------------|----------|-----------------------------------------|
//! | PWM channel A   | PB6      | M0PWM0, generator 0 comparator A        |
//! | PWM channel B   | PB7      | M0PWM1, generator 0 comparator B        |
//! | H-bridge IN1-4  | PB0-PB3  | plain digital outputs                   |
//! | LED red         | PF1      | brake indicator                         |
//! | LED blue        | PF2      | backward indicator                      |
//! | LED green       | PF3      | forward indicator                       |
//! | SW1 (speed)     | PF4      | active-low, pull-up, falling edge       |
//! | SW2 (direction) | PF0      | active-low, pull-up, falling edge       |

use crate::fsm::Direction;

// ---------------------------------------------------------------------------
// PWM outputs (port B)
// ---------------------------------------------------------------------------

pub const PWM_A_PIN: u8 = 6;
pub const PWM_B_PIN: u8 = 7;

// ---------------------------------------------------------------------------
// H-bridge inputs (port B, bits 0-3)
// ---------------------------------------------------------------------------

/// Number of H-bridge input lines (IN1..IN4).
pub const HBRIDGE_LINES: usize = 4;

/// IN1 + IN3 high: both motors forward.
pub const HBRIDGE_FORWARD: u8 = 0b0000_0101;
/// IN2 + IN4 high: both motors backward.
pub const HBRIDGE_BACKWARD: u8 = 0b0000_1010;
/// All inputs low: brake.
pub const HBRIDGE_BRAKE: u8 = 0b0000_0000;

/// H-bridge input pattern for a direction, indexed by `Direction as usize`.
const HBRIDGE_PATTERNS: [u8; Direction::COUNT] = [HBRIDGE_BRAKE, HBRIDGE_FORWARD, HBRIDGE_BACKWARD];

pub const fn hbridge_pattern(direction: Direction) -> u8 {
    HBRIDGE_PATTERNS[direction as usize]
}

// ---------------------------------------------------------------------------
// Status LEDs (port F, bits 1-3)
// ---------------------------------------------------------------------------

/// Number of indicator LEDs (red, blue, green).
pub const STATUS_LEDS: usize = 3;

/// Port F bit of the first LED (red on PF1); the LED index is `bit - 1`.
pub const STATUS_LED_SHIFT: u8 = 1;

pub const LED_RED: u8 = 0x02;
pub const LED_BLUE: u8 = 0x04;
pub const LED_GREEN: u8 = 0x08;

/// Indicator pattern (port F bits) for a direction.
const LED_PATTERNS: [u8; Direction::COUNT] = [LED_RED, LED_GREEN, LED_BLUE];

pub const fn led_pattern(direction: Direction) -> u8 {
    LED_PATTERNS[direction as usize]
}

// ---------------------------------------------------------------------------
// Buttons (port F)
// ---------------------------------------------------------------------------

/// SW1: advance speed level.
pub const SPEED_BUTTON_PIN: u8 = 4;
/// SW2: toggle direction.
pub const DIRECTION_BUTTON_PIN: u8 = 0;
