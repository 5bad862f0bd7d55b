//! Fuzz target: dissolved-oxygen response parsing
//!
//! Feeds arbitrary probe replies through `parse_response` and through a
//! full `OxygenSampler::sample` and checks:
//! - No panics for any byte pattern or length
//! - An empty reply (after the status byte) never replaces the reading
//! - The sampler never asks for more than `MAX_RESPONSE_LEN` bytes
//!
//! cargo fuzz run fuzz_do_response

#![no_main]

use aquasense::app::ports::SensorPort;
use aquasense::config::SystemConfig;
use aquasense::error::SensorError;
use aquasense::sensors::AnalogChannel;
use aquasense::sensors::dissolved_oxygen::{MAX_RESPONSE_LEN, OxygenSampler, parse_response};
use libfuzzer_sys::fuzz_target;

struct Reply<'a> {
    bytes: &'a [u8],
}

impl SensorPort for Reply<'_> {
    fn read_analog(&mut self, _channel: AnalogChannel) -> u16 {
        0
    }
    fn request_temperature(&mut self) -> Result<(), SensorError> {
        Ok(())
    }
    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        Err(SensorError::BusError)
    }
    fn read_oxygen(&mut self, _address: u8, buf: &mut [u8]) -> Result<(), SensorError> {
        assert!(buf.len() <= MAX_RESPONSE_LEN, "sampler over-read");
        buf.fill(0);
        let n = self.bytes.len().min(buf.len());
        buf[..n].copy_from_slice(&self.bytes[..n]);
        Ok(())
    }
    fn delay_ms(&mut self, _ms: u32) {}
}

fuzz_target!(|data: &[u8]| {
    let direct = parse_response(data);

    let mut sampler = OxygenSampler::new(&SystemConfig::default());
    let before = sampler.mg_per_l();
    let after = sampler.sample(&mut Reply { bytes: data });

    if direct.is_none() {
        assert_eq!(after.to_bits(), before.to_bits());
    }
});
