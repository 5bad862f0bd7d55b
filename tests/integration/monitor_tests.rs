//! Full-tick tests for the AppService → SensorHub → outputs pipeline.
//!
//! Each test drives one or more monitoring ticks against the mock probes
//! and checks what reached the display, the notifier and the event sink.

use aquasense::app::events::AppEvent;
use aquasense::app::service::AppService;
use aquasense::config::SystemConfig;
use aquasense::error::{CommsError, SensorError};

use crate::mock_hw::{MockClock, MockDisplay, MockNotifier, MockProbes, RecordingSink};

struct Rig {
    app: AppService,
    probes: MockProbes,
    clock: MockClock,
    display: MockDisplay,
    notifier: MockNotifier,
    sink: RecordingSink,
}

impl Rig {
    fn new() -> Self {
        let mut sink = RecordingSink::default();
        let mut app = AppService::new(SystemConfig::default());
        app.start(&mut sink);
        Self {
            app,
            probes: MockProbes::new(),
            clock: MockClock::new(),
            display: MockDisplay::default(),
            notifier: MockNotifier::default(),
            sink,
        }
    }

    fn tick(&mut self) -> aquasense::sensors::Readings {
        self.app.tick(
            &mut self.probes,
            &self.clock,
            &mut self.display,
            &mut self.notifier,
            &mut self.sink,
        )
    }

    /// Tick, then let one loop period pass.
    fn tick_and_wait(&mut self) -> aquasense::sensors::Readings {
        let r = self.tick();
        self.clock.advance(2_000);
        r
    }
}

// ── Lifecycle ─────────────────────────────────────────────────

#[test]
fn start_announces_device_name() {
    let rig = Rig::new();
    match rig.sink.events.first() {
        Some(AppEvent::Started { device_name }) => assert_eq!(device_name.as_str(), "AquaSense"),
        other => panic!("expected Started, got {other:?}"),
    }
}

#[test]
fn one_tick_polls_samples_renders_publishes_and_reports() {
    let mut rig = Rig::new();
    rig.probes.ph_script = vec![0];
    rig.probes.turbidity_raw = 1400;
    rig.probes.set_oxygen_ascii("8.42");

    let r = rig.tick();

    assert_eq!(rig.notifier.polls, 1);
    assert_eq!(rig.app.tick_count(), 1);
    assert_eq!(r.turbidity_ntu, 50.0);
    assert_eq!(r.dissolved_oxygen_mg_l, 8.42);

    assert_eq!(
        rig.display.frames,
        vec![("pH:21.3 TDS:0".to_owned(), "T:25.0C DO:8.4".to_owned())]
    );
    assert_eq!(
        rig.notifier.published,
        vec!["pH:21.34,TDS:0,T:25.0,DO:8.4,NTU:50".to_owned()]
    );
    assert!(matches!(rig.sink.events.last(), Some(AppEvent::Readings(x)) if *x == r));
}

#[test]
fn ph_window_blocks_for_fifty_ms() {
    let mut rig = Rig::new();
    rig.tick();
    assert_eq!(rig.probes.delayed_ms, 50);
}

// ── Temperature / TDS ─────────────────────────────────────────

#[test]
fn temperature_commits_on_the_tick_after_the_request() {
    let mut rig = Rig::new();
    rig.probes.queue_temperature(20.0);

    let first = rig.tick_and_wait();
    assert_eq!(rig.probes.temperature_requests, 1);
    assert_eq!(first.temperature_c, 25.0);

    let second = rig.tick_and_wait();
    assert_eq!(second.temperature_c, 20.0);
    assert_eq!(rig.sink.faults(), 0);

    // Idle again: the third tick issues a fresh conversion.
    rig.tick();
    assert_eq!(rig.probes.temperature_requests, 2);
}

#[test]
fn tds_is_compensated_with_the_committed_temperature() {
    let mut rig = Rig::new();
    rig.probes.tds_raw = 1241;
    rig.probes.queue_temperature(20.0);

    let at_reference = rig.tick_and_wait().tds_ppm;
    let at_twenty = rig.tick_and_wait().tds_ppm;

    assert!(at_reference > 300.0 && at_reference < 400.0, "{at_reference}");
    assert!(at_twenty > at_reference, "{at_twenty} <= {at_reference}");
}

#[test]
fn disconnected_probe_keeps_last_temperature_and_reports_fault() {
    let mut rig = Rig::new();
    rig.probes.queue_temperature(18.5);
    rig.tick_and_wait();
    rig.tick_and_wait();
    assert_eq!(rig.app.readings().temperature_c, 18.5);

    // Nothing queued: the mock answers with the -127 sentinel.
    rig.tick_and_wait();
    let r = rig.tick_and_wait();
    assert_eq!(r.temperature_c, 18.5);
    assert_eq!(rig.sink.faults(), 1);
    assert!(rig.sink.events.iter().any(|e| matches!(
        e,
        AppEvent::SensorFault(SensorError::Disconnected)
    )));
}

#[test]
fn failed_conversion_request_is_retried_every_tick() {
    let mut rig = Rig::new();
    rig.probes.request_result = Err(SensorError::BusError);
    for _ in 0..3 {
        rig.tick_and_wait();
    }
    assert_eq!(rig.probes.temperature_requests, 3);
    assert_eq!(rig.sink.faults(), 3);
    assert_eq!(rig.app.readings().temperature_c, 25.0);
}

// ── pH ────────────────────────────────────────────────────────

#[test]
fn ph_scenario_from_known_samples() {
    let mut rig = Rig::new();
    rig.probes.ph_script = vec![500, 502, 501, 499, 503, 504, 498, 500, 505, 497];
    let r = rig.tick();
    assert!((r.ph - 19.04).abs() < 0.01, "got {}", r.ph);
}

// ── Dissolved oxygen ──────────────────────────────────────────

#[test]
fn silent_oxygen_probe_keeps_previous_value() {
    let mut rig = Rig::new();
    rig.probes.set_oxygen_ascii("\u{1}7.75");
    assert_eq!(rig.tick_and_wait().dissolved_oxygen_mg_l, 7.75);

    rig.probes.oxygen_reply = Err(SensorError::BusError);
    assert_eq!(rig.tick_and_wait().dissolved_oxygen_mg_l, 7.75);

    rig.probes.oxygen_reply = Ok(vec![0; 20]);
    assert_eq!(rig.tick_and_wait().dissolved_oxygen_mg_l, 7.75);
    assert_eq!(rig.probes.oxygen_reads, 3);
    assert_eq!(rig.sink.faults(), 0);
}

// ── Output failures ───────────────────────────────────────────

#[test]
fn display_failure_does_not_stop_publishing() {
    let mut rig = Rig::new();
    rig.display.fail = true;
    rig.tick();
    assert_eq!(rig.sink.output_failures(), 1);
    assert_eq!(rig.notifier.published.len(), 1);
    assert!(matches!(rig.sink.events.last(), Some(AppEvent::Readings(_))));
}

#[test]
fn notify_failure_is_reported_and_tick_completes() {
    let mut rig = Rig::new();
    rig.notifier.fail = true;
    rig.tick();
    assert!(rig
        .sink
        .events
        .iter()
        .any(|e| matches!(e, AppEvent::OutputFailed(CommsError::NotifyFailed))));
    assert_eq!(rig.display.frames.len(), 1);
}

#[test]
fn every_tick_renders_and_publishes_once() {
    let mut rig = Rig::new();
    for _ in 0..5 {
        rig.tick_and_wait();
    }
    assert_eq!(rig.display.frames.len(), 5);
    assert_eq!(rig.notifier.published.len(), 5);
    assert_eq!(rig.notifier.polls, 5);
    assert!(rig.display.frames.iter().all(|(a, b)| a.len() <= 16 && b.len() <= 16));
}
