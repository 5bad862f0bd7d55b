//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port. The log adapter turns them
//! into serial output.

use crate::error::{CommsError, SensorError};
use crate::sensors::Readings;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The monitor has started (carries the BLE device name).
    Started { device_name: heapless::String<24> },

    /// End-of-tick snapshot of every channel.
    Readings(Readings),

    /// The temperature probe failed this tick; the previous temperature
    /// was kept. The other probes never report faults.
    SensorFault(SensorError),

    /// The display or BLE publish failed this tick.
    OutputFailed(CommsError),
}
