//! LCD display adapter.
//!
//! Implements [`DisplayPort`] on top of the [`Lcd1602`] driver: clear, then
//! one line per row, each cut to the panel width.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{Error as _, I2c};
use log::warn;

use crate::app::ports::DisplayPort;
use crate::drivers::lcd1602::{self, Lcd1602};
use crate::error::CommsError;

pub struct LcdDisplay<I2C, D> {
    lcd: Lcd1602<I2C, D>,
    ready: bool,
}

impl<I2C: I2c, D: DelayNs> LcdDisplay<I2C, D> {
    /// Run the controller init sequence. A panel that does not answer is
    /// reported but not fatal: the next [`DisplayPort::show`] retries init.
    pub fn new(mut lcd: Lcd1602<I2C, D>) -> Self {
        let ready = match lcd.init() {
            Ok(()) => true,
            Err(e) => {
                warn!("lcd: init failed ({:?}), will retry", e.kind());
                false
            }
        };
        Self { lcd, ready }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    fn write_lines(&mut self, line1: &str, line2: &str) -> Result<(), I2C::Error> {
        if !self.ready {
            self.lcd.init()?;
            self.ready = true;
        }
        self.lcd.clear()?;
        for (row, text) in [line1, line2].into_iter().enumerate() {
            let cut = text
                .char_indices()
                .nth(usize::from(lcd1602::COLS))
                .map_or(text, |(end, _)| &text[..end]);
            self.lcd.set_cursor(0, row as u8)?;
            self.lcd.write_str(cut)?;
        }
        Ok(())
    }
}

impl<I2C: I2c, D: DelayNs> DisplayPort for LcdDisplay<I2C, D> {
    fn show(&mut self, line1: &str, line2: &str) -> Result<(), CommsError> {
        self.write_lines(line1, line2).map_err(|_| {
            self.ready = false;
            CommsError::DisplayFailed
        })
    }
}
