//! Real host-side adapters wired into the monitor loop.
//!
//! Uses the simulated BLE notifier and the logging sink instead of the
//! recording mocks, so the adapter state machines see real tick traffic.

use aquasense::adapters::ble::{BleNotifier, BleState};
use aquasense::adapters::log_sink::LogEventSink;
use aquasense::app::ports::NotifierPort;
use aquasense::app::service::AppService;
use aquasense::config::SystemConfig;

use crate::mock_hw::{MockClock, MockDisplay, MockProbes};

fn started_ble(config: &SystemConfig) -> BleNotifier {
    let mut ble = BleNotifier::new(config.device_name.clone());
    ble.start().unwrap();
    ble
}

#[test]
fn ble_notifies_each_tick_only_while_a_central_is_connected() {
    let config = SystemConfig::default();
    let mut ble = started_ble(&config);
    let mut app = AppService::new(config);
    let mut probes = MockProbes::new();
    let clock = MockClock::new();
    let mut display = MockDisplay::default();
    let mut sink = LogEventSink::new();

    app.tick(&mut probes, &clock, &mut display, &mut ble, &mut sink);
    assert_eq!(ble.notifications_sent(), 0);
    assert!(ble.status().starts_with("pH:"));

    ble.sim_set_connected(true);
    for _ in 0..3 {
        clock.advance(2_000);
        app.tick(&mut probes, &clock, &mut display, &mut ble, &mut sink);
    }
    assert_eq!(ble.state(), BleState::Connected);
    assert_eq!(ble.notifications_sent(), 3);
    assert!(ble.status().ends_with(",TDS:0,T:25.0,DO:0.0,NTU:0"), "{}", ble.status());
}

#[test]
fn disconnect_is_noticed_on_the_next_tick_and_readvertises() {
    let config = SystemConfig::default();
    let mut ble = started_ble(&config);
    let mut app = AppService::new(config);
    let mut probes = MockProbes::new();
    let clock = MockClock::new();
    let mut display = MockDisplay::default();
    let mut sink = LogEventSink::new();

    ble.sim_set_connected(true);
    app.tick(&mut probes, &clock, &mut display, &mut ble, &mut sink);
    assert!(ble.is_connected());

    ble.sim_set_connected(false);
    clock.advance(2_000);
    app.tick(&mut probes, &clock, &mut display, &mut ble, &mut sink);

    assert_eq!(ble.state(), BleState::Advertising);
    assert_eq!(ble.readvertisements(), 1);
    // The tick that saw the disconnect still refreshed the cached value.
    assert_eq!(ble.notifications_sent(), 1);
    assert_eq!(display.frames.len(), 2);
}

#[test]
fn status_value_tracks_latest_readings() {
    let config = SystemConfig::default();
    let mut ble = started_ble(&config);
    let mut app = AppService::new(config);
    let mut probes = MockProbes::new();
    let clock = MockClock::new();
    let mut display = MockDisplay::default();
    let mut sink = LogEventSink::new();

    probes.turbidity_raw = 1400;
    probes.set_oxygen_ascii("6.30");
    app.tick(&mut probes, &clock, &mut display, &mut ble, &mut sink);

    assert!(ble.status().ends_with(",DO:6.3,NTU:50"), "{}", ble.status());
    assert!(ble.status().len() <= aquasense::app::format::PAYLOAD_CAPACITY);
}
