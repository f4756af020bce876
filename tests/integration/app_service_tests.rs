//! Integration tests for the AppService → FSM → MotorPort pipeline.
//!
//! These verify the command history each button press produces, using a
//! recording mock in place of the PWM driver and H-bridge.

use crate::mock_hw::{MotorCall, MockMotor, RecordingSink};

use twinmotor::app::commands::AppCommand;
use twinmotor::app::events::AppEvent;
use twinmotor::app::service::AppService;
use twinmotor::config::SystemConfig;
use twinmotor::drivers::pwm::PwmChannel;
use twinmotor::events::ButtonId;
use twinmotor::fsm::Direction;

fn make_app(config: SystemConfig) -> (AppService, MockMotor, RecordingSink) {
    let mut app = AppService::new(&config).unwrap();
    let mut hw = MockMotor::new();
    let mut sink = RecordingSink::new();
    app.start(&mut hw, &mut sink).unwrap();
    (app, hw, sink)
}

fn press(app: &mut AppService, cmd: AppCommand, hw: &mut MockMotor, sink: &mut RecordingSink) {
    app.handle_command(cmd, 0, hw, sink).unwrap();
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn boot_state_is_brake_level_zero() {
    let (app, hw, sink) = make_app(SystemConfig::default());
    assert_eq!(app.state().direction, Direction::Brake);
    assert_eq!(app.state().level.index(), 0);
    assert_eq!(hw.direction(), Some(Direction::Brake));
    assert_eq!(hw.duty(PwmChannel::A), 0);
    assert_eq!(hw.duty(PwmChannel::B), 0);
    assert!(matches!(sink.events.first(), Some(AppEvent::Started(_))));
}

// ── Speed sequence ────────────────────────────────────────────

#[test]
fn five_speed_presses_cycle_through_the_ladder() {
    let (mut app, mut hw, mut sink) = make_app(SystemConfig::default());
    let mut observed = Vec::new();

    for _ in 0..5 {
        press(&mut app, AppCommand::AdvanceSpeed, &mut hw, &mut sink);
        observed.push((hw.duty(PwmChannel::A), hw.duty(PwmChannel::B), hw.direction()));
    }

    assert_eq!(
        observed,
        [
            (7_500, 7_500, Some(Direction::Forward)),
            (15_000, 15_000, Some(Direction::Forward)),
            (20_000, 20_000, Some(Direction::Forward)),
            (24_500, 24_500, Some(Direction::Forward)),
            (0, 0, Some(Direction::Brake)),
        ]
    );
}

#[test]
fn bridge_is_only_rewritten_on_start_and_stop() {
    let (mut app, mut hw, mut sink) = make_app(SystemConfig::default());
    hw.clear();
    for _ in 0..5 {
        press(&mut app, AppCommand::AdvanceSpeed, &mut hw, &mut sink);
    }
    // Brake -> Forward, then Forward -> Brake.
    assert_eq!(hw.direction_writes(), 2);
}

#[test]
fn every_duty_write_covers_both_channels() {
    let (mut app, mut hw, mut sink) = make_app(SystemConfig::default());
    hw.clear();
    press(&mut app, AppCommand::AdvanceSpeed, &mut hw, &mut sink);
    press(&mut app, AppCommand::AdvanceSpeed, &mut hw, &mut sink);

    let duties: Vec<_> = hw
        .calls
        .iter()
        .filter_map(|c| match *c {
            MotorCall::SetDuty { channel, duty } => Some((channel, duty)),
            MotorCall::SetDirection(_) => None,
        })
        .collect();
    assert_eq!(
        duties,
        [
            (PwmChannel::A, 7_500),
            (PwmChannel::B, 7_500),
            (PwmChannel::A, 15_000),
            (PwmChannel::B, 15_000),
        ]
    );
}

// ── Direction ─────────────────────────────────────────────────

#[test]
fn direction_press_at_level_two_reverses_without_touching_duty() {
    let (mut app, mut hw, mut sink) = make_app(SystemConfig::default());
    press(&mut app, AppCommand::AdvanceSpeed, &mut hw, &mut sink);
    press(&mut app, AppCommand::AdvanceSpeed, &mut hw, &mut sink);
    hw.clear();

    press(&mut app, AppCommand::ToggleDirection, &mut hw, &mut sink);

    assert_eq!(hw.calls, [MotorCall::SetDirection(Direction::Backward)]);
    assert_eq!(app.state().level.index(), 2);
    assert_eq!(app.duty(), 15_000);
    assert_eq!(
        sink.last(),
        Some(&AppEvent::DirectionChanged {
            from: Direction::Forward,
            to: Direction::Backward
        })
    );
}

#[test]
fn direction_press_while_braked_changes_nothing() {
    let (mut app, mut hw, mut sink) = make_app(SystemConfig::default());
    hw.clear();
    press(&mut app, AppCommand::ToggleDirection, &mut hw, &mut sink);

    assert!(hw.calls.is_empty());
    assert_eq!(app.state().direction, Direction::Brake);
    assert_eq!(sink.last(), Some(&AppEvent::PressIgnored(ButtonId::Direction)));
}

#[test]
fn parity_restarts_after_each_stop() {
    let (mut app, mut hw, mut sink) = make_app(SystemConfig::default());

    // Forward, reverse twice (back to Forward), reverse once more.
    press(&mut app, AppCommand::AdvanceSpeed, &mut hw, &mut sink);
    for _ in 0..3 {
        press(&mut app, AppCommand::ToggleDirection, &mut hw, &mut sink);
    }
    assert_eq!(hw.direction(), Some(Direction::Backward));

    // Wrap to brake from level 1: four more speed presses.
    for _ in 0..4 {
        press(&mut app, AppCommand::AdvanceSpeed, &mut hw, &mut sink);
    }
    assert_eq!(hw.direction(), Some(Direction::Brake));

    press(&mut app, AppCommand::AdvanceSpeed, &mut hw, &mut sink);
    assert_eq!(hw.direction(), Some(Direction::Forward));
    press(&mut app, AppCommand::ToggleDirection, &mut hw, &mut sink);
    assert_eq!(hw.direction(), Some(Direction::Backward));
}

// ── Reversal interlock ────────────────────────────────────────

#[test]
fn reversal_hold_brakes_bridge_then_releases() {
    let config = SystemConfig {
        reverse_brake_ms: 250,
        ..SystemConfig::default()
    };
    let (mut app, mut hw, mut sink) = make_app(config);
    app.handle_command(AppCommand::AdvanceSpeed, 0, &mut hw, &mut sink).unwrap();
    app.handle_command(AppCommand::AdvanceSpeed, 10, &mut hw, &mut sink).unwrap();
    hw.clear();

    app.handle_command(AppCommand::ToggleDirection, 1_000, &mut hw, &mut sink).unwrap();
    assert_eq!(hw.calls, [MotorCall::SetDirection(Direction::Brake)]);
    assert!(
        sink.events
            .contains(&AppEvent::ReversalDeferred { target: Direction::Backward })
    );
    // Duty stays commanded through the hold.
    assert_eq!(app.duty(), 15_000);

    app.poll(1_249, &mut hw, &mut sink).unwrap();
    assert_eq!(hw.direction(), Some(Direction::Brake));
    app.poll(1_250, &mut hw, &mut sink).unwrap();
    assert_eq!(hw.direction(), Some(Direction::Backward));
}

#[test]
fn first_start_is_never_held() {
    let config = SystemConfig {
        reverse_brake_ms: 250,
        ..SystemConfig::default()
    };
    let (mut app, mut hw, mut sink) = make_app(config);
    app.handle_command(AppCommand::AdvanceSpeed, 0, &mut hw, &mut sink).unwrap();
    assert_eq!(hw.direction(), Some(Direction::Forward));
    assert_eq!(app.pending_reversal(), None);
}
