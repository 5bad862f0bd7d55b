//! Sensor subsystem: individual samplers and the aggregating [`SensorHub`].
//!
//! The hub owns every sampler and produces a [`Readings`] snapshot each
//! tick. Samplers never talk to each other: the committed temperature is
//! handed to the TDS sampler by the hub as an explicit argument.

pub mod deferred;
pub mod dissolved_oxygen;
pub mod ph;
pub mod tds;
pub mod temperature;
pub mod turbidity;

use serde::{Deserialize, Serialize};

use crate::app::ports::SensorPort;
use crate::config::SystemConfig;
use crate::error::SensorError;
use dissolved_oxygen::OxygenSampler;
use ph::PhSampler;
use tds::TdsSampler;
use temperature::TemperatureSampler;
use turbidity::TurbiditySampler;

/// Analog inputs wired to ADC1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalogChannel {
    Tds,
    Ph,
    Turbidity,
}

/// ADC code → volts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdcScale {
    pub vref: f32,
    pub range: f32,
}

impl AdcScale {
    pub fn from_config(config: &SystemConfig) -> Self {
        Self {
            vref: config.adc_vref,
            range: config.adc_range,
        }
    }

    pub fn to_volts(&self, raw: f32) -> f32 {
        raw * self.vref / self.range
    }
}

/// The latest value of every channel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Readings {
    pub ph: f32,
    pub temperature_c: f32,
    pub tds_ppm: f32,
    pub turbidity_raw: u16,
    pub turbidity_ntu: f32,
    pub dissolved_oxygen_mg_l: f32,
}

/// Result of one pass over every sampler.
#[derive(Debug, Clone, Copy)]
pub struct SampleOutcome {
    pub readings: Readings,
    /// Set when the temperature probe reported a failure this tick.
    pub temperature_fault: Option<SensorError>,
}

/// Owns every sampler and runs them in a fixed order.
pub struct SensorHub {
    pub temperature: TemperatureSampler,
    pub tds: TdsSampler,
    pub ph: PhSampler,
    pub turbidity: TurbiditySampler,
    pub oxygen: OxygenSampler,
}

impl SensorHub {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            temperature: TemperatureSampler::new(config),
            tds: TdsSampler::new(config),
            ph: PhSampler::new(config),
            turbidity: TurbiditySampler::new(config),
            oxygen: OxygenSampler::new(config),
        }
    }

    /// Invoke each sampler once.
    ///
    /// A temperature fault leaves the previous temperature in place; the
    /// TDS sampler then compensates against that retained value.
    pub fn sample_all(&mut self, hw: &mut impl SensorPort, now_ms: u64) -> SampleOutcome {
        let temperature_fault = self.temperature.poll(hw, now_ms).err();

        let temperature_c = self.temperature.celsius();
        self.tds.sample(hw, now_ms, temperature_c);
        self.ph.sample(hw);
        self.turbidity.sample(hw);
        self.oxygen.sample(hw);

        SampleOutcome {
            readings: self.readings(),
            temperature_fault,
        }
    }

    /// Snapshot of the current values without touching hardware.
    pub fn readings(&self) -> Readings {
        Readings {
            ph: self.ph.ph(),
            temperature_c: self.temperature.celsius(),
            tds_ppm: self.tds.ppm(),
            turbidity_raw: self.turbidity.raw(),
            turbidity_ntu: self.turbidity.ntu(),
            dissolved_oxygen_mg_l: self.oxygen.mg_per_l(),
        }
    }
}
