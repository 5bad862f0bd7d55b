//! DS18B20 water-temperature probe on a 1-Wire bus.
//!
//! Wraps `one-wire-bus` + `ds18b20` with the split request/read API the
//! temperature sampler needs. The probe address is discovered by a ROM
//! search on first use and forgotten after any bus failure, so a probe that
//! is unplugged and plugged back in is picked up again without a reboot.
//!
//! Resolution is left at the power-on default (12 bit, 750 ms conversion).

use ds18b20::Ds18b20;
use embedded_hal_p2::{
    blocking::delay::{DelayMs, DelayUs},
    digital::v2::{InputPin, OutputPin},
};
use log::{debug, info};
use one_wire_bus::{OneWire, OneWireError};

use crate::error::SensorError;

pub struct Ds18b20Probe<P, E, D>
where
    P: InputPin<Error = E> + OutputPin<Error = E>,
    D: DelayMs<u16> + DelayUs<u16>,
{
    bus: OneWire<P>,
    delay: D,
    sensor: Option<Ds18b20>,
}

/// Collapse the bus error space onto what the sampler reports.
pub fn map_bus_error<E>(e: &OneWireError<E>) -> SensorError {
    match e {
        OneWireError::CrcMismatch => SensorError::CrcMismatch,
        OneWireError::FamilyCodeMismatch => SensorError::Disconnected,
        _ => SensorError::BusError,
    }
}

impl<P, E, D> Ds18b20Probe<P, E, D>
where
    P: InputPin<Error = E> + OutputPin<Error = E>,
    E: core::fmt::Debug,
    D: DelayMs<u16> + DelayUs<u16>,
{
    pub fn new(bus: OneWire<P>, delay: D) -> Self {
        Self {
            bus,
            delay,
            sensor: None,
        }
    }

    /// First DS18B20 found on the bus, if any.
    fn discover(&mut self) -> Result<Ds18b20, SensorError> {
        for address in self.bus.devices(false, &mut self.delay) {
            let address = address.map_err(|e| map_bus_error(&e))?;
            if address.family_code() != ds18b20::FAMILY_CODE {
                debug!("1-wire: skipping device {:?}", address);
                continue;
            }
            let sensor = Ds18b20::new::<E>(address).map_err(|e| map_bus_error(&e))?;
            info!("1-wire: DS18B20 at {:?}", address);
            return Ok(sensor);
        }
        Err(SensorError::Disconnected)
    }

    /// Broadcast a convert-T to every probe on the bus.
    pub fn start_conversion(&mut self) -> Result<(), SensorError> {
        if self.sensor.is_none() {
            self.sensor = Some(self.discover()?);
        }
        ds18b20::start_simultaneous_temp_measurement(&mut self.bus, &mut self.delay).map_err(
            |e| {
                self.sensor = None;
                map_bus_error(&e)
            },
        )
    }

    /// Read the scratchpad of the discovered probe (°C).
    pub fn read_celsius(&mut self) -> Result<f32, SensorError> {
        let sensor = self.sensor.as_ref().ok_or(SensorError::Disconnected)?;
        match sensor.read_data(&mut self.bus, &mut self.delay) {
            Ok(data) => Ok(data.temperature),
            Err(e) => {
                self.sensor = None;
                Err(map_bus_error(&e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc_failures_are_kept_distinct() {
        assert_eq!(
            map_bus_error::<()>(&OneWireError::CrcMismatch),
            SensorError::CrcMismatch
        );
    }

    #[test]
    fn missing_probe_reads_as_disconnected() {
        assert_eq!(
            map_bus_error::<()>(&OneWireError::FamilyCodeMismatch),
            SensorError::Disconnected
        );
    }

    #[test]
    fn pin_faults_are_bus_errors() {
        assert_eq!(
            map_bus_error(&OneWireError::PinError(())),
            SensorError::BusError
        );
        assert_eq!(
            map_bus_error::<()>(&OneWireError::BusNotHigh),
            SensorError::BusError
        );
    }
}
