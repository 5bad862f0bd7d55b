//! Hardware adapter: bridges real peripherals to [`SensorPort`].
//!
//! Owns the DS18B20 probe, the dissolved-oxygen I2C handle (one
//! `RefCellDevice` on the shared bus) and a millisecond delay. Analog
//! reads go straight to the ADC1 oneshot unit configured by `hw_init`;
//! on host builds those return the injected simulation values.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use embedded_hal_p2::{
    blocking::delay::{DelayMs, DelayUs},
    digital::v2::{InputPin, OutputPin},
};

use crate::app::ports::SensorPort;
use crate::drivers::ds18b20_probe::Ds18b20Probe;
use crate::drivers::hw_init;
use crate::error::SensorError;
use crate::pins;
use crate::sensors::AnalogChannel;

/// ADC1 channel wired to each analog probe.
pub fn adc_channel(channel: AnalogChannel) -> u32 {
    match channel {
        AnalogChannel::Tds => pins::ADC1_CH_TDS,
        AnalogChannel::Ph => pins::ADC1_CH_PH,
        AnalogChannel::Turbidity => pins::ADC1_CH_TURBIDITY,
    }
}

pub struct HardwareAdapter<P, E, OD, I2C, D>
where
    P: InputPin<Error = E> + OutputPin<Error = E>,
    OD: DelayMs<u16> + DelayUs<u16>,
{
    probe: Ds18b20Probe<P, E, OD>,
    i2c: I2C,
    delay: D,
}

impl<P, E, OD, I2C, D> HardwareAdapter<P, E, OD, I2C, D>
where
    P: InputPin<Error = E> + OutputPin<Error = E>,
    E: core::fmt::Debug,
    OD: DelayMs<u16> + DelayUs<u16>,
    I2C: I2c,
    D: DelayNs,
{
    pub fn new(probe: Ds18b20Probe<P, E, OD>, i2c: I2C, delay: D) -> Self {
        Self { probe, i2c, delay }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<P, E, OD, I2C, D> SensorPort for HardwareAdapter<P, E, OD, I2C, D>
where
    P: InputPin<Error = E> + OutputPin<Error = E>,
    E: core::fmt::Debug,
    OD: DelayMs<u16> + DelayUs<u16>,
    I2C: I2c,
    D: DelayNs,
{
    fn read_analog(&mut self, channel: AnalogChannel) -> u16 {
        hw_init::adc1_read(adc_channel(channel))
    }

    fn request_temperature(&mut self) -> Result<(), SensorError> {
        self.probe.start_conversion()
    }

    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        self.probe.read_celsius()
    }

    fn read_oxygen(&mut self, address: u8, buf: &mut [u8]) -> Result<(), SensorError> {
        self.i2c
            .read(address, buf)
            .map_err(|_| SensorError::BusError)
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
