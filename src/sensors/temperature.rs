//! DS18B20 water temperature sampler.
//!
//! Drives the probe through a [`Deferred`] conversion: one tick issues the
//! convert command, a later tick (once `temperature_conversion_ms` has
//! elapsed) reads the scratchpad. A failed read or the disconnected
//! sentinel discards the sample; the last good value is kept.

use log::warn;

use super::deferred::{Deferred, Step};
use crate::app::ports::SensorPort;
use crate::config::SystemConfig;
use crate::error::SensorError;

/// Value reported by Dallas-style drivers when no probe answers.
pub const DISCONNECTED_C: f32 = -127.0;

/// `true` for the sentinel and for values no probe can produce.
pub fn is_disconnected(celsius: f32) -> bool {
    celsius == DISCONNECTED_C || !celsius.is_finite()
}

/// What happened on one [`TemperatureSampler::poll`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TemperatureStatus {
    /// Conversion command issued this tick.
    Requested,
    /// Conversion still running.
    Converting,
    /// New value committed.
    Committed(f32),
}

pub struct TemperatureSampler {
    celsius: f32,
    conversion: Deferred,
}

impl TemperatureSampler {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            // Start at the compensation reference so the first TDS sample
            // is uncompensated.
            celsius: config.tds.reference_c,
            conversion: Deferred::new(config.temperature_conversion_ms),
        }
    }

    /// Last committed temperature (°C).
    pub fn celsius(&self) -> f32 {
        self.celsius
    }

    pub fn conversion(&self) -> &Deferred {
        &self.conversion
    }

    pub fn poll(
        &mut self,
        hw: &mut impl SensorPort,
        now_ms: u64,
    ) -> Result<TemperatureStatus, SensorError> {
        match self.conversion.step(now_ms) {
            Step::Start => {
                hw.request_temperature().inspect_err(|e| {
                    warn!("temperature: conversion request failed ({})", e);
                })?;
                self.conversion.begin(now_ms);
                Ok(TemperatureStatus::Requested)
            }
            Step::Wait => Ok(TemperatureStatus::Converting),
            Step::Collect => {
                self.conversion.reset();
                let celsius = hw.read_temperature().inspect_err(|e| {
                    warn!("temperature: read failed ({}), keeping {:.1}C", e, self.celsius);
                })?;
                if is_disconnected(celsius) {
                    warn!("temperature: probe disconnected, keeping {:.1}C", self.celsius);
                    return Err(SensorError::Disconnected);
                }
                self.celsius = celsius;
                Ok(TemperatureStatus::Committed(celsius))
            }
        }
    }
}
