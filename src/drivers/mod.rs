//! Peripheral drivers and one-shot hardware initialisation.

pub mod ds18b20_probe;
pub mod hw_init;
pub mod lcd1602;
