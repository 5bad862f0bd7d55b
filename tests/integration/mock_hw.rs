//! Mock adapters for integration tests.
//!
//! Every port gets a scripted or recording stand-in so tests can drive full
//! ticks and assert on what reached the display, the notifier and the
//! event sink without touching real ADC/I2C/1-Wire hardware.

use std::cell::Cell;
use std::collections::VecDeque;

use aquasense::app::events::AppEvent;
use aquasense::app::ports::{DisplayPort, EventSink, NotifierPort, SensorPort, TimePort};
use aquasense::error::{CommsError, SensorError};
use aquasense::sensors::AnalogChannel;

// ── MockProbes ────────────────────────────────────────────────

pub struct MockProbes {
    pub tds_raw: u16,
    pub turbidity_raw: u16,
    /// Cycled through for every pH read.
    pub ph_script: Vec<u16>,
    ph_cursor: usize,
    /// Results of successive `read_temperature` calls. Empty → sentinel.
    pub temperatures: VecDeque<Result<f32, SensorError>>,
    pub request_result: Result<(), SensorError>,
    /// Raw bytes the DO probe answers with, or a bus error.
    pub oxygen_reply: Result<Vec<u8>, SensorError>,
    pub temperature_requests: u32,
    pub oxygen_reads: u32,
    pub delayed_ms: u32,
}

#[allow(dead_code)]
impl MockProbes {
    pub fn new() -> Self {
        Self {
            tds_raw: 0,
            turbidity_raw: 2800,
            ph_script: vec![2048],
            ph_cursor: 0,
            temperatures: VecDeque::new(),
            request_result: Ok(()),
            oxygen_reply: Err(SensorError::BusError),
            temperature_requests: 0,
            oxygen_reads: 0,
            delayed_ms: 0,
        }
    }

    pub fn queue_temperature(&mut self, celsius: f32) {
        self.temperatures.push_back(Ok(celsius));
    }

    pub fn set_oxygen_ascii(&mut self, text: &str) {
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        self.oxygen_reply = Ok(bytes);
    }
}

impl Default for MockProbes {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockProbes {
    fn read_analog(&mut self, channel: AnalogChannel) -> u16 {
        match channel {
            AnalogChannel::Tds => self.tds_raw,
            AnalogChannel::Turbidity => self.turbidity_raw,
            AnalogChannel::Ph => {
                let v = self.ph_script[self.ph_cursor % self.ph_script.len()];
                self.ph_cursor += 1;
                v
            }
        }
    }

    fn request_temperature(&mut self) -> Result<(), SensorError> {
        self.temperature_requests += 1;
        self.request_result
    }

    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        self.temperatures.pop_front().unwrap_or(Ok(-127.0))
    }

    fn read_oxygen(&mut self, _address: u8, buf: &mut [u8]) -> Result<(), SensorError> {
        self.oxygen_reads += 1;
        let reply = self.oxygen_reply.as_ref().map_err(|e| *e)?;
        buf.fill(0);
        let n = reply.len().min(buf.len());
        buf[..n].copy_from_slice(&reply[..n]);
        Ok(())
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delayed_ms += ms;
    }
}

// ── MockClock ─────────────────────────────────────────────────

pub struct MockClock {
    now_ms: Cell<u64>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn new() -> Self {
        Self { now_ms: Cell::new(0) }
    }

    pub fn advance(&self, ms: u64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }
}

impl TimePort for MockClock {
    fn uptime_ms(&self) -> u64 {
        self.now_ms.get()
    }
}

// ── MockDisplay ───────────────────────────────────────────────

#[derive(Default)]
pub struct MockDisplay {
    pub frames: Vec<(String, String)>,
    pub fail: bool,
}

impl DisplayPort for MockDisplay {
    fn show(&mut self, line1: &str, line2: &str) -> Result<(), CommsError> {
        if self.fail {
            return Err(CommsError::DisplayFailed);
        }
        self.frames.push((line1.to_owned(), line2.to_owned()));
        Ok(())
    }
}

// ── MockNotifier ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockNotifier {
    pub published: Vec<String>,
    pub polls: u32,
    pub connected: bool,
    pub fail: bool,
}

impl NotifierPort for MockNotifier {
    fn poll(&mut self) {
        self.polls += 1;
    }

    fn publish(&mut self, payload: &str) -> Result<(), CommsError> {
        if self.fail {
            return Err(CommsError::NotifyFailed);
        }
        self.published.push(payload.to_owned());
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn faults(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::SensorFault(_)))
            .count()
    }

    pub fn output_failures(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::OutputFailed(_)))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
