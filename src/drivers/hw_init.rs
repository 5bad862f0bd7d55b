//! One-shot hardware peripheral initialization.
//!
//! Configures the ADC1 oneshot unit for the three analog probes using raw
//! ESP-IDF sys calls. Called once from `main()` before the loop starts.
//! The I2C bus and the 1-Wire pin are owned by `esp-idf-hal` drivers and
//! set up in `main()` directly.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    AdcChannelFailed { channel: u32, rc: i32 },
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::AdcChannelFailed { channel, rc } => {
                write!(f, "ADC1 channel {} config failed (rc={})", channel, rc)
            }
        }
    }
}

/// ADC1 channels used by the probes, in wiring order.
pub const ANALOG_CHANNELS: [u32; 3] = [
    pins::ADC1_CH_TDS,
    pins::ADC1_CH_PH,
    pins::ADC1_CH_TURBIDITY,
];

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the loop; single-threaded.
    unsafe { init_adc()? };
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path. `init_adc()` completes before the loop starts.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    // 12 dB attenuation: full 0–3.3 V input span.
    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    for channel in ANALOG_CHANNELS {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::AdcChannelFailed { channel, rc: ret });
        }
    }

    info!(
        "hw_init: ADC1 configured (CH{}=TDS, CH{}=pH, CH{}=turbidity)",
        pins::ADC1_CH_TDS,
        pins::ADC1_CH_PH,
        pins::ADC1_CH_TURBIDITY
    );
    Ok(())
}

/// One conversion. A failed read returns 0, like an unconnected input.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract, single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return 0;
    }
    raw.clamp(0, 4095) as u16
}

// ── Simulation ────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

/// Injected ADC1 codes, indexed by channel number (ADC1 has 8 on ESP32).
#[cfg(not(target_os = "espidf"))]
static SIM_ADC: [AtomicU16; 8] = [const { AtomicU16::new(0) }; 8];

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(channel: u32) -> u16 {
    SIM_ADC
        .get(channel as usize)
        .map_or(0, |slot| slot.load(Ordering::Relaxed))
}

/// Inject the code the next `adc1_read(channel)` returns (host only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_adc(channel: u32, raw: u16) {
    if let Some(slot) = SIM_ADC.get(channel as usize) {
        slot.store(raw.min(4095), Ordering::Relaxed);
    }
}
