//! pH probe sampler.
//!
//! Ten ADC samples spaced a few milliseconds apart, median of the middle
//! pair, then a linear voltage → pH fit.

use super::{AdcScale, AnalogChannel};
use crate::app::ports::SensorPort;
use crate::config::{PhCalibration, SystemConfig};

pub const PH_SAMPLES: usize = 10;

/// Sort in place and average the two middle samples.
pub fn median_of_ten(samples: &mut [u16; PH_SAMPLES]) -> f32 {
    samples.sort_unstable();
    (f32::from(samples[4]) + f32::from(samples[5])) / 2.0
}

pub fn voltage_to_ph(voltage: f32, cal: &PhCalibration) -> f32 {
    cal.slope * voltage + cal.intercept + cal.offset
}

pub struct PhSampler {
    ph: f32,
    sample_delay_ms: u32,
    scale: AdcScale,
    cal: PhCalibration,
}

impl PhSampler {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            ph: 0.0,
            sample_delay_ms: config.ph_sample_delay_ms,
            scale: AdcScale::from_config(config),
            cal: config.ph,
        }
    }

    pub fn ph(&self) -> f32 {
        self.ph
    }

    pub fn sample(&mut self, hw: &mut impl SensorPort) -> f32 {
        let mut samples = [0u16; PH_SAMPLES];
        for slot in &mut samples {
            *slot = hw.read_analog(AnalogChannel::Ph);
            hw.delay_ms(self.sample_delay_ms);
        }

        let voltage = self.scale.to_volts(median_of_ten(&mut samples));
        self.ph = voltage_to_ph(voltage, &self.cal);
        self.ph
    }
}
