//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the `log`
//! facade (UART / USB-CDC through `esp_idf_logger` in production). The
//! `Readings` event is the per-tick diagnostic line.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::format;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Readings(r) => {
                info!("{}", format::diagnostic_line(r));
            }
            AppEvent::SensorFault(error) => {
                warn!("FAULT | temperature: {}", error);
            }
            AppEvent::OutputFailed(e) => {
                warn!("OUTPUT | {}", e);
            }
            AppEvent::Started { device_name } => {
                info!("START | advertising as \"{}\"", device_name);
            }
        }
    }
}
