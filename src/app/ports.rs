//! Port traits: the boundary between the monitoring core and the hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (probes, display, BLE, clock, event sinks) implement
//! these traits. The [`AppService`](super::service::AppService) consumes
//! them via generics, so the sampling core never touches a register.

use crate::error::{CommsError, SensorError};
use crate::sensors::AnalogChannel;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Raw access to every probe on the board.
///
/// Conversion from raw codes to engineering units happens in the samplers;
/// implementations only move bytes and codes.
pub trait SensorPort {
    /// One 12-bit ADC conversion on `channel`.
    fn read_analog(&mut self, channel: AnalogChannel) -> u16;

    /// Start a temperature conversion on the 1-Wire probe.
    fn request_temperature(&mut self) -> Result<(), SensorError>;

    /// Read the result of the last conversion (°C).
    ///
    /// May return [`DISCONNECTED_C`](crate::sensors::temperature::DISCONNECTED_C)
    /// instead of an error, like common Dallas drivers do.
    fn read_temperature(&mut self) -> Result<f32, SensorError>;

    /// I2C read of `buf.len()` bytes from the dissolved-oxygen probe.
    fn read_oxygen(&mut self, address: u8, buf: &mut [u8]) -> Result<(), SensorError>;

    /// Blocking delay between consecutive samples.
    fn delay_ms(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Output ports (driven adapters: domain → user)
// ───────────────────────────────────────────────────────────────

/// Two-line character display.
pub trait DisplayPort {
    /// Clear and write both lines. Lines longer than the panel are cut.
    fn show(&mut self, line1: &str, line2: &str) -> Result<(), CommsError>;
}

/// Wireless status publisher (BLE GATT characteristic).
pub trait NotifierPort {
    /// Service connection bookkeeping (re-advertise after a drop, etc.).
    fn poll(&mut self);

    /// Store `payload` as the current value and notify a connected peer.
    fn publish(&mut self, payload: &str) -> Result<(), CommsError>;

    fn is_connected(&self) -> bool;
}

/// Monotonic clock.
pub trait TimePort {
    /// Milliseconds since boot.
    fn uptime_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Configuration rejected at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}
