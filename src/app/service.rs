//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the [`SensorHub`] and the last committed readings.
//! All I/O flows through port traits injected at call sites, making the
//! whole tick testable with mock adapters.
//!
//! ```text
//!   SensorPort ──▶ ┌──────────────────────┐ ──▶ DisplayPort
//!     TimePort ──▶ │      AppService      │ ──▶ NotifierPort
//!                  │  SensorHub · format  │ ──▶ EventSink
//!                  └──────────────────────┘
//! ```

use log::{info, warn};

use crate::config::SystemConfig;
use crate::sensors::{Readings, SensorHub};

use super::events::AppEvent;
use super::format;
use super::ports::{DisplayPort, EventSink, NotifierPort, SensorPort, TimePort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

pub struct AppService {
    config: SystemConfig,
    hub: SensorHub,
    readings: Readings,
    tick_count: u64,
}

impl AppService {
    /// Construct the service from a validated configuration.
    pub fn new(config: SystemConfig) -> Self {
        let hub = SensorHub::new(&config);
        let readings = hub.readings();
        Self {
            config,
            hub,
            readings,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started {
            device_name: self.config.device_name.clone(),
        });
        info!(
            "AppService started, tick every {} ms",
            self.config.tick_interval_ms
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one monitoring cycle:
    /// wireless poll → sample → display → publish → diagnostic event.
    ///
    /// Output failures are reported and the tick carries on; nothing here
    /// is fatal.
    pub fn tick(
        &mut self,
        hw: &mut impl SensorPort,
        clock: &impl TimePort,
        display: &mut impl DisplayPort,
        notifier: &mut impl NotifierPort,
        sink: &mut impl EventSink,
    ) -> Readings {
        self.tick_count += 1;

        // 1. Wireless bookkeeping
        notifier.poll();

        // 2. Sample every probe
        let outcome = self.hub.sample_all(hw, clock.uptime_ms());
        self.readings = outcome.readings;
        if let Some(error) = outcome.temperature_fault {
            sink.emit(&AppEvent::SensorFault(error));
        }

        // 3. Local display
        let (line1, line2) = format::display_lines(&self.readings);
        if let Err(e) = display.show(&line1, &line2) {
            warn!("display update failed: {}", e);
            sink.emit(&AppEvent::OutputFailed(e));
        }

        // 4. Wireless publish
        let payload = format::status_payload(&self.readings);
        if let Err(e) = notifier.publish(&payload) {
            warn!("status publish failed: {}", e);
            sink.emit(&AppEvent::OutputFailed(e));
        }

        // 5. Diagnostic line
        sink.emit(&AppEvent::Readings(self.readings));

        self.readings
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn readings(&self) -> Readings {
        self.readings
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// How long to sleep after a tick that took `elapsed_ms`.
    pub fn sleep_budget_ms(&self, elapsed_ms: u64) -> u32 {
        let remaining = u64::from(self.config.tick_interval_ms).saturating_sub(elapsed_ms);
        u32::try_from(remaining).unwrap_or(u32::MAX)
    }
}
