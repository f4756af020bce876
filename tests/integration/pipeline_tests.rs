//! Full pipeline: edge queue → debouncer → AppService → HardwareAdapter
//! over the simulated PWM generator and pins.

use twinmotor::adapters::hardware::HardwareAdapter;
use twinmotor::adapters::sim_gpio::{PinProbe, SimPin, probe_pattern};
use twinmotor::adapters::sim_pwm::SimPwm;
use twinmotor::app::service::AppService;
use twinmotor::config::SystemConfig;
use twinmotor::drivers::button::EdgeDebouncer;
use twinmotor::drivers::pwm::{ChannelOutput, PwmChannel};
use twinmotor::events::{ButtonId, EdgeQueue, on_falling_edge};
use twinmotor::fsm::Direction;
use twinmotor::pins::{self, HBRIDGE_LINES, STATUS_LEDS};

use crate::mock_hw::RecordingSink;

struct Rig {
    queue: EdgeQueue,
    debouncer: EdgeDebouncer,
    app: AppService,
    hw: HardwareAdapter<SimPwm, SimPin>,
    bridge: Vec<PinProbe>,
    sink: RecordingSink,
}

impl Rig {
    fn new() -> Self {
        let config = SystemConfig::default();
        let bridge_pins: [SimPin; HBRIDGE_LINES] = core::array::from_fn(|_| SimPin::new());
        let bridge = bridge_pins.iter().map(SimPin::probe).collect();
        let led_pins: [SimPin; STATUS_LEDS] = core::array::from_fn(|_| SimPin::new());

        let mut hw =
            HardwareAdapter::init(SimPwm::new(), config.period().unwrap(), bridge_pins, led_pins)
                .unwrap();
        let mut sink = RecordingSink::new();
        let mut app = AppService::new(&config).unwrap();
        app.start(&mut hw, &mut sink).unwrap();

        Self {
            queue: EdgeQueue::new(),
            debouncer: EdgeDebouncer::new(config.debounce_ms),
            app,
            hw,
            bridge,
            sink,
        }
    }

    /// One physical press with contact bounce at `at_ms`.
    fn bounce(&self, button: ButtonId, at_ms: u32) {
        for off in [0, 1, 3, 7] {
            on_falling_edge(&self.queue, button, at_ms + off);
        }
    }

    fn service(&mut self) {
        let presses = self.debouncer.service(&self.queue);
        self.app
            .handle_presses(&presses, &mut self.hw, &mut self.sink)
            .unwrap();
        // Shadowed compare values take effect on the next counter reload.
        self.hw.pwm_mut().peripheral_mut().reload();
    }

    fn high_ticks(&self, channel: PwmChannel) -> u32 {
        self.hw.pwm().peripheral().high_ticks(channel)
    }
}

#[test]
fn bounced_presses_step_the_ladder_once_each() {
    let mut rig = Rig::new();
    let mut t = 1_000;
    let mut bridge_writes = None;
    for expected in [7_500u16, 15_000, 20_000, 24_500] {
        rig.bounce(ButtonId::Speed, t);
        rig.service();
        t += 300;
        // Only the start drives the bridge; later steps leave it alone.
        let writes: u32 = rig.bridge.iter().map(PinProbe::writes).sum();
        assert_eq!(*bridge_writes.get_or_insert(writes), writes);
        assert_eq!(rig.app.duty(), expected);
        for ch in PwmChannel::ALL {
            assert_eq!(
                rig.hw.pwm().output(ch),
                ChannelOutput::Modulating { compare: expected - 1 }
            );
            assert_eq!(rig.high_ticks(ch), u32::from(expected));
        }
    }
    assert_eq!(rig.debouncer.rejected(), 12);
    assert_eq!(probe_pattern(&rig.bridge), pins::HBRIDGE_FORWARD);

    rig.bounce(ButtonId::Speed, t);
    rig.service();
    assert_eq!(rig.app.state().direction, Direction::Brake);
    assert_eq!(probe_pattern(&rig.bridge), pins::HBRIDGE_BRAKE);
    for ch in PwmChannel::ALL {
        assert_eq!(rig.hw.pwm().output(ch), ChannelOutput::ForcedLow);
        assert_eq!(rig.high_ticks(ch), 0);
    }
    assert_eq!(rig.hw.leds().current(), pins::LED_RED);
}

#[test]
fn simultaneous_presses_apply_speed_before_direction() {
    let mut rig = Rig::new();
    // Direction edge arrives first but both land in one batch.
    on_falling_edge(&rig.queue, ButtonId::Direction, 500);
    on_falling_edge(&rig.queue, ButtonId::Speed, 501);
    rig.service();

    // Speed auto-started Forward, then direction reversed it.
    assert_eq!(rig.app.state().direction, Direction::Backward);
    assert_eq!(rig.app.state().level.index(), 1);
    assert_eq!(probe_pattern(&rig.bridge), pins::HBRIDGE_BACKWARD);
    assert_eq!(rig.hw.leds().current(), pins::LED_BLUE);
}

#[test]
fn late_drain_keeps_presses_in_time_order() {
    let mut rig = Rig::new();
    // Direction while braked (ignored), then a start well after it.
    rig.bounce(ButtonId::Direction, 1_000);
    rig.bounce(ButtonId::Speed, 1_600);
    rig.service();

    assert_eq!(rig.app.state().direction, Direction::Forward);
    assert_eq!(rig.app.state().level.index(), 1);
    assert_eq!(probe_pattern(&rig.bridge), pins::HBRIDGE_FORWARD);
    assert_eq!(rig.hw.leds().current(), pins::LED_GREEN);
}

#[test]
fn direction_reversal_keeps_pwm_running() {
    let mut rig = Rig::new();
    rig.bounce(ButtonId::Speed, 100);
    rig.service();
    rig.bounce(ButtonId::Speed, 400);
    rig.service();
    let writes = rig.hw.pwm().peripheral().register_writes();

    rig.bounce(ButtonId::Direction, 700);
    rig.service();

    assert_eq!(rig.app.state().direction, Direction::Backward);
    assert_eq!(rig.hw.pwm().peripheral().register_writes(), writes);
    assert_eq!(
        rig.hw.pwm().output(PwmChannel::A),
        ChannelOutput::Modulating { compare: 14_999 }
    );
    assert_eq!(probe_pattern(&rig.bridge), pins::HBRIDGE_BACKWARD);
}

#[test]
fn overflowing_queue_counts_drops() {
    let rig = Rig::new();
    for i in 0..20 {
        on_falling_edge(&rig.queue, ButtonId::Speed, i);
    }
    assert_eq!(rig.queue.dropped(), 20 - twinmotor::events::EDGE_QUEUE_DEPTH as u32);
}
