//! TwinMotor: host simulation entry point.
//!
//! Runs the full input pipeline against simulated peripherals:
//!
//! ```text
//! ┌──────────────┐  ButtonEdge  ┌──────────────┐  ButtonPress  ┌──────────────┐
//! │ edge replay  │─────────────▶│  EdgeQueue   │──────────────▶│  AppService  │
//! │ (ISR thread) │   bounces    │  (bounded)   │   debounced   │  (consumer)  │
//! └──────────────┘              └──────────────┘               └──────┬───────┘
//!                                                                      │ MotorPort
//!                                               SimPwm · SimPin ◀──────┘
//! ```
//!
//! Usage: `twinmotor-sim [config.json]`.  Log level via `RUST_LOG`.

#![deny(unused_must_use)]

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use log::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use twinmotor::adapters::hardware::HardwareAdapter;
use twinmotor::adapters::log_sink::LogEventSink;
use twinmotor::adapters::sim_gpio::{SimPin, probe_pattern};
use twinmotor::adapters::sim_pwm::SimPwm;
use twinmotor::adapters::time::MonotonicClock;
use twinmotor::app::service::AppService;
use twinmotor::config::SystemConfig;
use twinmotor::drivers::button::EdgeDebouncer;
use twinmotor::drivers::pwm::PwmChannel;
use twinmotor::events::{ButtonId, EdgeQueue, on_falling_edge};
use twinmotor::pins::{
    DIRECTION_BUTTON_PIN, HBRIDGE_LINES, PWM_A_PIN, PWM_B_PIN, SPEED_BUTTON_PIN, STATUS_LEDS,
};

/// Shared between the edge producer and the control loop.
static EDGES: EdgeQueue = EdgeQueue::new();

/// Control loop pass interval.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Gap between scripted presses.
const PRESS_GAP_MS: u64 = 400;

/// Contact bounce after each press edge (ms offsets).
const BOUNCE_OFFSETS_MS: [u64; 3] = [0, 2, 5];

/// Two speed steps, a reversal and back, a full wrap to brake, a
/// direction press while braked, then a restart.
const DEMO_SCRIPT: [ButtonId; 10] = [
    ButtonId::Speed,
    ButtonId::Speed,
    ButtonId::Direction,
    ButtonId::Direction,
    ButtonId::Speed,
    ButtonId::Speed,
    ButtonId::Speed,
    ButtonId::Direction,
    ButtonId::Speed,
    ButtonId::Direction,
];

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    info!("TwinMotor sim v{}", env!("CARGO_PKG_VERSION"));

    // ── 1. Configuration ──────────────────────────────────────
    let config = match std::env::args().nth(1) {
        Some(path) => load_config(&path)?,
        None => SystemConfig::default(),
    };
    let period = config.period()?;
    info!(
        "clock {} Hz / {} -> {} Hz PWM, period {} ticks, debounce {} ms",
        config.bus_clock_hz, config.pwm_clock_divider, config.pwm_frequency_hz, period, config.debounce_ms
    );

    // ── 2. Outputs ────────────────────────────────────────────
    info!(
        "pins: PWM A=PB{} B=PB{}, H-bridge PB0-3, LEDs PF1-3, speed=PF{} direction=PF{}",
        PWM_A_PIN, PWM_B_PIN, SPEED_BUTTON_PIN, DIRECTION_BUTTON_PIN
    );
    let bridge_pins: [SimPin; HBRIDGE_LINES] = core::array::from_fn(|_| SimPin::new());
    let bridge_probes: Vec<_> = bridge_pins.iter().map(SimPin::probe).collect();
    let led_pins: [SimPin; STATUS_LEDS] = core::array::from_fn(|_| SimPin::new());

    let mut hw = HardwareAdapter::init(SimPwm::new(), period, bridge_pins, led_pins)?;
    let mut sink = LogEventSink::new();
    let mut app = AppService::new(&config)?;
    app.start(&mut hw, &mut sink)?;

    // ── 3. Edge producer ("ISR") ──────────────────────────────
    let clock = MonotonicClock::new();
    let producer = thread::spawn(move || replay(&DEMO_SCRIPT, clock));

    // ── 4. Control loop ───────────────────────────────────────
    let mut debouncer = EdgeDebouncer::new(config.debounce_ms);
    loop {
        let presses = debouncer.service(&EDGES);
        app.handle_presses(&presses, &mut hw, &mut sink)?;
        app.poll(clock.uptime_ms(), &mut hw, &mut sink)?;

        if producer.is_finished() && EDGES.is_empty() && app.pending_reversal().is_none() {
            break;
        }
        thread::sleep(POLL_INTERVAL);
    }
    producer.join().map_err(|_| anyhow!("edge producer panicked"))?;

    // ── 5. Report ─────────────────────────────────────────────
    if EDGES.dropped() > 0 {
        warn!("{} edges dropped on a full queue", EDGES.dropped());
    }
    let snap = app.snapshot();
    info!(
        "final: {:?} level {} duty {}/{} ({}%), {} presses, {} bounces rejected",
        snap.direction,
        snap.level,
        snap.duty,
        snap.period,
        snap.duty_percent(),
        app.commands_handled(),
        debouncer.rejected()
    );
    for channel in PwmChannel::ALL {
        info!(
            "channel {:?}: {:?}, {} high ticks per cycle",
            channel,
            hw.pwm().output(channel),
            hw.pwm().peripheral().high_ticks(channel)
        );
    }
    info!(
        "H-bridge IN1-4 = 0b{:04b}, LEDs = 0x{:02X}",
        probe_pattern(&bridge_probes),
        hw.leds().current()
    );
    Ok(())
}

fn load_config(path: &str) -> Result<SystemConfig> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let config = SystemConfig::from_json(&text).with_context(|| format!("parsing {path}"))?;
    info!("config loaded from {path}");
    Ok(config)
}

/// Play `script` as falling edges with contact bounce.
fn replay(script: &[ButtonId], clock: MonotonicClock) {
    for &button in script {
        thread::sleep(Duration::from_millis(PRESS_GAP_MS));
        let mut last = 0;
        for offset in BOUNCE_OFFSETS_MS {
            thread::sleep(Duration::from_millis(offset - last));
            last = offset;
            on_falling_edge(&EDGES, button, clock.uptime_ms());
        }
    }
}
