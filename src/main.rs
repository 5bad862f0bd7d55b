//! AquaSense firmware: main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LcdDisplay    BleNotifier   LogEventSink    │
//! │  (SensorPort)      (Display)     (Notifier)    (EventSink)     │
//! │  Esp32TimeAdapter (TimePort)                                   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  SensorHub · Deferred temperature · formatting         │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use core::cell::RefCell;

use anyhow::Result;
use embedded_hal_bus::i2c::RefCellDevice;
use esp_idf_hal::delay::{Delay, Ets, FreeRtos};
use esp_idf_hal::gpio::PinDriver;
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::info;
use one_wire_bus::OneWire;

use aquasense::adapters::ble::BleNotifier;
use aquasense::adapters::display::LcdDisplay;
use aquasense::adapters::hardware::HardwareAdapter;
use aquasense::adapters::log_sink::LogEventSink;
use aquasense::adapters::time::Esp32TimeAdapter;
use aquasense::app::ports::TimePort;
use aquasense::app::service::AppService;
use aquasense::config::{BUSY_WAIT_LIMIT_US, SystemConfig};
use aquasense::drivers::ds18b20_probe::Ds18b20Probe;
use aquasense::drivers::hw_init;
use aquasense::drivers::lcd1602::Lcd1602;
use aquasense::error::Error;
use aquasense::pins;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  AquaSense v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();
    config.validate().map_err(Error::from)?;
    info!("Config: {}", serde_json::to_string(&config)?);

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    // Bluedroid keeps its bonding state in NVS.
    let _nvs = EspDefaultNvsPartition::take()?;

    hw_init::init_peripherals().map_err(Error::from)?;

    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio21,
        peripherals.pins.gpio22,
        &I2cConfig::new().baudrate(Hertz(pins::I2C_FREQ_HZ)),
    )?;
    let i2c_bus = RefCell::new(i2c);

    let onewire_pin = PinDriver::input_output_od(peripherals.pins.gpio4)?;
    let onewire = OneWire::new(onewire_pin)
        .map_err(|e| anyhow::anyhow!("1-Wire bus on GPIO{}: {:?}", pins::ONEWIRE_GPIO, e))?;

    // ── 4. Adapters ───────────────────────────────────────────
    // pH spacing and LCD strobes spin; only the loop sleep yields.
    let mut hw = HardwareAdapter::new(
        Ds18b20Probe::new(onewire, Ets),
        RefCellDevice::new(&i2c_bus),
        Delay::new(BUSY_WAIT_LIMIT_US),
    );
    let mut display = LcdDisplay::new(Lcd1602::new(
        RefCellDevice::new(&i2c_bus),
        pins::LCD_I2C_ADDR,
        Delay::new(BUSY_WAIT_LIMIT_US),
    ));
    let clock = Esp32TimeAdapter::new();
    let mut sink = LogEventSink::new();

    // A stack that fails to come up is fatal: returning the error makes
    // the ESP-IDF runtime abort and reset the chip.
    let mut ble = BleNotifier::new(config.device_name.clone());
    ble.start().map_err(Error::from)?;

    // ── 5. Monitor loop ───────────────────────────────────────
    let mut app = AppService::new(config);
    app.start(&mut sink);
    info!("System ready. Entering monitor loop.");

    loop {
        let started = clock.uptime_ms();
        app.tick(&mut hw, &clock, &mut display, &mut ble, &mut sink);
        let elapsed = clock.uptime_ms().saturating_sub(started);
        FreeRtos::delay_ms(app.sleep_budget_ms(elapsed));
    }
}
