//! System configuration parameters
//!
//! All tunable parameters for the AquaSense monitor: loop timing, ADC
//! reference, per-probe calibration, bus addresses and the BLE identity.
//! Calibration values are placeholders that should be adjusted per probe;
//! they are configuration, not invariants.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::pins;

/// Linear pH probe calibration: `pH = slope * V + intercept + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhCalibration {
    pub slope: f32,
    pub intercept: f32,
    /// Static field offset applied after the linear fit.
    pub offset: f32,
}

impl Default for PhCalibration {
    fn default() -> Self {
        Self {
            slope: -5.70,
            intercept: 21.34,
            offset: 0.0,
        }
    }
}

/// Gravity TDS probe: temperature compensation and EC → ppm factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TdsCalibration {
    /// Fractional conductivity change per °C (2 %/°C for most salts).
    pub temp_coefficient: f32,
    /// Temperature at which the compensation divisor is exactly 1.0.
    pub reference_c: f32,
    /// Linear EC → TDS scale factor.
    pub tds_factor: f32,
}

impl Default for TdsCalibration {
    fn default() -> Self {
        Self {
            temp_coefficient: 0.02,
            reference_c: 25.0,
            tds_factor: 0.5,
        }
    }
}

/// Inverted linear turbidity map: `raw_low` → `ntu_max`, `raw_high` → 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurbidityCalibration {
    pub raw_low: u16,
    pub raw_high: u16,
    pub ntu_max: f32,
}

impl Default for TurbidityCalibration {
    fn default() -> Self {
        Self {
            raw_low: 0,
            raw_high: 2800,
            ntu_max: 100.0,
        }
    }
}

/// Dissolved-oxygen probe on the shared I2C bus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OxygenConfig {
    /// 7-bit I2C address.
    pub i2c_address: u8,
    /// Maximum response length read per request (bytes).
    pub response_cap: usize,
}

impl Default for OxygenConfig {
    fn default() -> Self {
        Self {
            i2c_address: pins::DO_I2C_ADDR,
            response_cap: 20,
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Timing ---
    /// Driver loop period (milliseconds)
    pub tick_interval_ms: u32,
    /// DS18B20 conversion wait before the result is read (milliseconds)
    pub temperature_conversion_ms: u32,
    /// Minimum spacing between two TDS samples (milliseconds)
    pub tds_min_interval_ms: u32,
    /// Delay between the ten pH samples (milliseconds)
    pub ph_sample_delay_ms: u32,

    // --- ADC ---
    /// ADC full-scale reference voltage
    pub adc_vref: f32,
    /// Number of ADC codes across the reference (4096 for 12-bit)
    pub adc_range: f32,

    // --- Calibration ---
    pub ph: PhCalibration,
    pub tds: TdsCalibration,
    pub turbidity: TurbidityCalibration,
    pub oxygen: OxygenConfig,

    // --- Wireless ---
    /// BLE advertised device name
    pub device_name: heapless::String<24>,
}

/// Waits shorter than this are spun on the CPU instead of yielding to the
/// scheduler, which only sleeps in whole ticks (10 ms at 100 Hz).
pub const BUSY_WAIT_LIMIT_US: u32 = 10_000;

/// Default BLE device name.
pub const DEFAULT_DEVICE_NAME: &str = "AquaSense";

impl Default for SystemConfig {
    fn default() -> Self {
        let mut device_name = heapless::String::new();
        // DEFAULT_DEVICE_NAME is well under the 24-byte capacity.
        let _ = device_name.push_str(DEFAULT_DEVICE_NAME);

        Self {
            // Timing
            tick_interval_ms: 2000,
            temperature_conversion_ms: 750,
            tds_min_interval_ms: 20,
            ph_sample_delay_ms: 5,

            // ADC
            adc_vref: 3.3,
            adc_range: 4096.0,

            // Calibration
            ph: PhCalibration::default(),
            tds: TdsCalibration::default(),
            turbidity: TurbidityCalibration::default(),
            oxygen: OxygenConfig::default(),

            device_name,
        }
    }
}

impl SystemConfig {
    /// Reject values that would make a sampler meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("tick_interval_ms must be > 0"));
        }
        if self.temperature_conversion_ms >= self.tick_interval_ms.saturating_mul(4) {
            return Err(ConfigError::ValidationFailed(
                "temperature_conversion_ms must be shorter than four ticks",
            ));
        }
        if self.ph_sample_delay_ms.saturating_mul(1_000) >= BUSY_WAIT_LIMIT_US {
            return Err(ConfigError::ValidationFailed(
                "ph_sample_delay_ms must stay below the busy-wait limit",
            ));
        }
        if !(self.adc_vref > 0.0) || !(self.adc_range > 0.0) {
            return Err(ConfigError::ValidationFailed("ADC reference and range must be > 0"));
        }
        if !self.ph.slope.is_finite() || !self.ph.intercept.is_finite() || !self.ph.offset.is_finite() {
            return Err(ConfigError::ValidationFailed("pH calibration must be finite"));
        }
        if !(self.tds.tds_factor > 0.0) {
            return Err(ConfigError::ValidationFailed("tds_factor must be > 0"));
        }
        if self.turbidity.raw_high <= self.turbidity.raw_low {
            return Err(ConfigError::ValidationFailed("turbidity raw_high must exceed raw_low"));
        }
        if !(self.turbidity.ntu_max > 0.0) {
            return Err(ConfigError::ValidationFailed("turbidity ntu_max must be > 0"));
        }
        if self.oxygen.response_cap == 0 || self.oxygen.response_cap > crate::sensors::dissolved_oxygen::MAX_RESPONSE_LEN {
            return Err(ConfigError::ValidationFailed("oxygen response_cap out of range"));
        }
        if self.oxygen.i2c_address > 0x7F {
            return Err(ConfigError::ValidationFailed("oxygen i2c_address must be 7-bit"));
        }
        if self.device_name.is_empty() {
            return Err(ConfigError::ValidationFailed("device_name must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SystemConfig::default().validate().is_ok());
    }

    #[test]
    fn default_timing_matches_loop_contract() {
        let c = SystemConfig::default();
        assert_eq!(c.tick_interval_ms, 2000);
        assert_eq!(c.temperature_conversion_ms, 750);
        assert_eq!(c.tds_min_interval_ms, 20);
        assert_eq!(c.ph_sample_delay_ms * 10, 50);
        assert!(c.temperature_conversion_ms < c.tick_interval_ms);
    }

    #[test]
    fn rejects_inverted_turbidity_range() {
        let mut c = SystemConfig::default();
        c.turbidity.raw_low = 3000;
        c.turbidity.raw_high = 1000;
        assert!(matches!(c.validate(), Err(ConfigError::ValidationFailed(_))));
    }

    #[test]
    fn ph_spacing_is_a_busy_wait() {
        let mut c = SystemConfig::default();
        assert!(c.ph_sample_delay_ms * 1_000 < BUSY_WAIT_LIMIT_US);
        c.ph_sample_delay_ms = 10;
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_zero_tick() {
        let mut c = SystemConfig::default();
        c.tick_interval_ms = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_nan_adc_reference() {
        let mut c = SystemConfig::default();
        c.adc_vref = f32::NAN;
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_oversized_oxygen_cap() {
        let mut c = SystemConfig::default();
        c.oxygen.response_cap = 4096;
        assert!(c.validate().is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let c = SystemConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: SystemConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c, c2);
        assert_eq!(c2.device_name.as_str(), DEFAULT_DEVICE_NAME);
    }

    #[test]
    fn postcard_roundtrip() {
        let c = SystemConfig::default();
        let bytes = postcard::to_allocvec(&c).unwrap();
        let c2: SystemConfig = postcard::from_bytes(&bytes).unwrap();
        assert!((c.ph.slope - c2.ph.slope).abs() < 0.001);
        assert_eq!(c.turbidity.raw_high, c2.turbidity.raw_high);
    }
}
