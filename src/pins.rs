//! GPIO / peripheral pin assignments for the AquaSense probe board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers or bus addresses.

// ---------------------------------------------------------------------------
// Sensors: Analog (ADC1, 12-bit, 12 dB attenuation)
// ---------------------------------------------------------------------------

/// Gravity TDS probe signal. ADC1 channel 6 (GPIO 34 on ESP32).
pub const TDS_ADC_GPIO: i32 = 34;
pub const ADC1_CH_TDS: u32 = 6;

/// pH probe amplifier output. ADC1 channel 7 (GPIO 35).
pub const PH_ADC_GPIO: i32 = 35;
pub const ADC1_CH_PH: u32 = 7;

/// Turbidity sensor analog output via divider. ADC1 channel 0 (GPIO 36).
pub const TURBIDITY_ADC_GPIO: i32 = 36;
pub const ADC1_CH_TURBIDITY: u32 = 0;

// ---------------------------------------------------------------------------
// Sensors: Digital
// ---------------------------------------------------------------------------

/// DS18B20 1-Wire data line (open drain, external 4.7 kOhm pull-up).
pub const ONEWIRE_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// I²C bus (LCD backpack + dissolved-oxygen probe)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 21;
pub const I2C_SCL_GPIO: i32 = 22;
/// Standard-mode bus clock.
pub const I2C_FREQ_HZ: u32 = 100_000;

/// PCF8574 backpack on the 16x2 HD44780 LCD.
pub const LCD_I2C_ADDR: u8 = 0x27;
/// Dissolved-oxygen probe (EZO-DO factory address, decimal 97).
pub const DO_I2C_ADDR: u8 = 0x61;
