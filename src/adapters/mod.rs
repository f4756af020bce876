//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements       | Connects to                         |
//! |-------------|------------------|-------------------------------------|
//! | `hardware`  | MotorPort        | PWM driver, H-bridge, status LEDs   |
//! | `log_sink`  | EventSink        | `log` facade                        |
//! | `time`      | -                | monotonic millisecond clock         |
//! | `sim_pwm`   | PwmPeripheral    | in-memory PWM generator model       |
//! | `sim_gpio`  | OutputPin        | in-memory digital outputs           |

pub mod hardware;
pub mod log_sink;
pub mod sim_gpio;
pub mod sim_pwm;
pub mod time;
