//! Analog turbidity sensor.
//!
//! Clear water gives the highest ADC code, so the map is inverted: the
//! calibration's `raw_low` corresponds to `ntu_max` and `raw_high` to 0 NTU.

use super::AnalogChannel;
use crate::app::ports::SensorPort;
use crate::config::{SystemConfig, TurbidityCalibration};

/// Inverted linear map, clamped to `[0, ntu_max]`.
pub fn raw_to_ntu(raw: u16, cal: &TurbidityCalibration) -> f32 {
    let span = f32::from(cal.raw_high) - f32::from(cal.raw_low);
    if span <= 0.0 {
        return 0.0;
    }
    let ntu = cal.ntu_max * (f32::from(cal.raw_high) - f32::from(raw)) / span;
    ntu.clamp(0.0, cal.ntu_max)
}

pub struct TurbiditySampler {
    raw: u16,
    ntu: f32,
    cal: TurbidityCalibration,
}

impl TurbiditySampler {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            raw: 0,
            ntu: 0.0,
            cal: config.turbidity,
        }
    }

    pub fn raw(&self) -> u16 {
        self.raw
    }

    pub fn ntu(&self) -> f32 {
        self.ntu
    }

    pub fn sample(&mut self, hw: &mut impl SensorPort) -> f32 {
        self.raw = hw.read_analog(AnalogChannel::Turbidity);
        self.ntu = raw_to_ntu(self.raw, &self.cal);
        self.ntu
    }
}
