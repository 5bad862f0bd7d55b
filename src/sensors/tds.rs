//! Total dissolved solids via a Gravity-style analog conductivity probe.
//!
//! The probe voltage is temperature-compensated to the reference
//! temperature, pushed through the cubic EC curve, then scaled to ppm.

use log::debug;

use super::{AdcScale, AnalogChannel};
use crate::app::ports::SensorPort;
use crate::config::{SystemConfig, TdsCalibration};

/// `1 + k * (T - T_ref)`. Exactly 1.0 at the reference temperature.
pub fn compensation_coefficient(temperature_c: f32, cal: &TdsCalibration) -> f32 {
    1.0 + cal.temp_coefficient * (temperature_c - cal.reference_c)
}

/// Probe voltage and water temperature to ppm.
///
/// A non-positive compensation divisor (water far below the reference
/// temperature with an aggressive coefficient) falls back to the
/// uncompensated voltage. The result is never negative.
pub fn voltage_to_ppm(voltage: f32, temperature_c: f32, cal: &TdsCalibration) -> f32 {
    let coefficient = compensation_coefficient(temperature_c, cal);
    let v = if coefficient > 0.0 {
        voltage / coefficient
    } else {
        voltage
    };

    let ec = 133.42 * v * v * v - 255.86 * v * v + 857.39 * v;
    let ppm = ec * cal.tds_factor;
    // f32::max also maps NaN to 0.
    ppm.max(0.0)
}

pub struct TdsSampler {
    ppm: f32,
    last_sample_ms: Option<u64>,
    min_interval_ms: u32,
    scale: AdcScale,
    cal: TdsCalibration,
}

impl TdsSampler {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            ppm: 0.0,
            last_sample_ms: None,
            min_interval_ms: config.tds_min_interval_ms,
            scale: AdcScale::from_config(config),
            cal: config.tds,
        }
    }

    pub fn ppm(&self) -> f32 {
        self.ppm
    }

    /// Sample if the rate limit allows; always returns the current value.
    pub fn sample(&mut self, hw: &mut impl SensorPort, now_ms: u64, temperature_c: f32) -> f32 {
        if let Some(last) = self.last_sample_ms {
            if now_ms.saturating_sub(last) < u64::from(self.min_interval_ms) {
                return self.ppm;
            }
        }
        self.last_sample_ms = Some(now_ms);

        let raw = hw.read_analog(AnalogChannel::Tds);
        let voltage = self.scale.to_volts(f32::from(raw));
        self.ppm = voltage_to_ppm(voltage, temperature_c, &self.cal);
        debug!("tds: raw={} v={:.3} t={:.1}C -> {:.0}ppm", raw, voltage, temperature_c, self.ppm);
        self.ppm
    }
}
