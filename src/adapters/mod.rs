//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements   | Connects to                        |
//! |------------|--------------|------------------------------------|
//! | `hardware` | SensorPort   | ADC1, DS18B20 (1-Wire), DO (I2C)   |
//! | `display`  | DisplayPort  | HD44780 16x2 over PCF8574 (I2C)    |
//! | `ble`      | NotifierPort | Bluedroid GATT server              |
//! | `log_sink` | EventSink    | Serial log output                  |
//! | `time`     | TimePort     | ESP32 high-resolution timer        |

pub mod ble;
pub mod display;
pub mod hardware;
pub mod log_sink;
pub mod time;
