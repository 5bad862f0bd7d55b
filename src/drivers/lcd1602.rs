//! HD44780 16x2 character LCD behind a PCF8574 I2C backpack.
//!
//! The backpack maps its eight outputs onto the LCD as
//! `P0=RS P1=RW P2=EN P3=backlight P4..P7=D4..D7`, so every byte goes out
//! as two 4-bit nibbles, each latched by pulsing EN.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

pub const COLS: u8 = 16;
pub const ROWS: u8 = 2;

const RS: u8 = 0x01;
const EN: u8 = 0x04;
const BACKLIGHT: u8 = 0x08;

// HD44780 instructions
const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE: u8 = 0x04;
const CMD_DISPLAY_CONTROL: u8 = 0x08;
const CMD_FUNCTION_SET: u8 = 0x20;
const CMD_SET_DDRAM: u8 = 0x80;

const ENTRY_LEFT: u8 = 0x02;
const DISPLAY_ON: u8 = 0x04;
const FUNCTION_2LINE: u8 = 0x08;

/// DDRAM address of the first column of each row.
const ROW_OFFSETS: [u8; ROWS as usize] = [0x00, 0x40];

pub struct Lcd1602<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C: I2c, D: DelayNs> Lcd1602<I2C, D> {
    pub fn new(i2c: I2C, address: u8, delay: D) -> Self {
        Self {
            i2c,
            delay,
            address,
        }
    }

    /// Power-on sequence: force 4-bit mode, then 2 lines, display on,
    /// cursor off, left-to-right entry.
    pub fn init(&mut self) -> Result<(), I2C::Error> {
        self.delay.delay_ms(50);
        self.expander_write(0)?;

        // Three 8-bit "function set" nibbles, then switch to 4-bit.
        self.write_nibble(0x30)?;
        self.delay.delay_us(4_500);
        self.write_nibble(0x30)?;
        self.delay.delay_us(4_500);
        self.write_nibble(0x30)?;
        self.delay.delay_us(150);
        self.write_nibble(0x20)?;

        self.command(CMD_FUNCTION_SET | FUNCTION_2LINE)?;
        self.command(CMD_DISPLAY_CONTROL | DISPLAY_ON)?;
        self.clear()?;
        self.command(CMD_ENTRY_MODE | ENTRY_LEFT)
    }

    pub fn clear(&mut self) -> Result<(), I2C::Error> {
        self.command(CMD_CLEAR)?;
        // Clear is the one slow instruction.
        self.delay.delay_ms(2);
        Ok(())
    }

    pub fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), I2C::Error> {
        let row = usize::from(row.min(ROWS - 1));
        self.command(CMD_SET_DDRAM | (ROW_OFFSETS[row] + col.min(COLS - 1)))
    }

    /// Write ASCII text at the cursor. Non-ASCII characters become `?`.
    pub fn write_str(&mut self, text: &str) -> Result<(), I2C::Error> {
        for ch in text.chars() {
            let byte = if ch.is_ascii() { ch as u8 } else { b'?' };
            self.send(byte, RS)?;
        }
        Ok(())
    }

    fn command(&mut self, cmd: u8) -> Result<(), I2C::Error> {
        self.send(cmd, 0)
    }

    fn send(&mut self, byte: u8, mode: u8) -> Result<(), I2C::Error> {
        self.write_nibble((byte & 0xF0) | mode)?;
        self.write_nibble(((byte << 4) & 0xF0) | mode)
    }

    fn write_nibble(&mut self, bits: u8) -> Result<(), I2C::Error> {
        self.expander_write(bits)?;
        self.expander_write(bits | EN)?;
        self.delay.delay_us(1);
        self.expander_write(bits & !EN)?;
        self.delay.delay_us(50);
        Ok(())
    }

    fn expander_write(&mut self, bits: u8) -> Result<(), I2C::Error> {
        self.i2c.write(self.address, &[bits | BACKLIGHT])
    }
}
