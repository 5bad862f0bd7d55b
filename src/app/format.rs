//! Text renderings of a [`Readings`] snapshot.
//!
//! All three outputs are fixed-capacity `heapless` strings so the tick
//! path never allocates.

use core::fmt::Write;

use heapless::String;

use crate::sensors::Readings;

/// Columns on the character display.
pub const LCD_COLS: usize = 16;

/// BLE characteristic value capacity.
pub const PAYLOAD_CAPACITY: usize = 64;

pub type LcdLine = String<LCD_COLS>;
pub type Payload = String<PAYLOAD_CAPACITY>;
pub type DiagnosticLine = String<128>;

/// `fmt::Write` into a fixed string that keeps every character that fits
/// and silently drops the rest.
struct Clipped<'a, const N: usize>(&'a mut String<N>);

impl<const N: usize> Write for Clipped<'_, N> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for ch in s.chars() {
            if self.0.push(ch).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// `pH:<1dp> TDS:<0dp>` and `T:<1dp>C DO:<1dp>`, cut to the panel width.
pub fn display_lines(r: &Readings) -> (LcdLine, LcdLine) {
    let mut line1 = LcdLine::new();
    let _ = write!(Clipped(&mut line1), "pH:{:.1} TDS:{:.0}", r.ph, r.tds_ppm);

    let mut line2 = LcdLine::new();
    let _ = write!(
        Clipped(&mut line2),
        "T:{:.1}C DO:{:.1}",
        r.temperature_c, r.dissolved_oxygen_mg_l
    );

    (line1, line2)
}

/// BLE status value: `pH:<2dp>,TDS:<0dp>,T:<1dp>,DO:<1dp>,NTU:<0dp>`,
/// cut at [`PAYLOAD_CAPACITY`].
pub fn status_payload(r: &Readings) -> Payload {
    let mut out = Payload::new();
    let _ = write!(
        Clipped(&mut out),
        "pH:{:.2},TDS:{:.0},T:{:.1},DO:{:.1},NTU:{:.0}",
        r.ph, r.tds_ppm, r.temperature_c, r.dissolved_oxygen_mg_l, r.turbidity_ntu
    );
    out
}

/// One serial line per tick.
pub fn diagnostic_line(r: &Readings) -> DiagnosticLine {
    let mut out = DiagnosticLine::new();
    let _ = write!(
        Clipped(&mut out),
        "pH: {:.2} | TDS: {:.0}ppm | Temp: {:.1}C | DO: {:.1}mg/L | Turb: {} ({:.0} NTU)",
        r.ph,
        r.tds_ppm,
        r.temperature_c,
        r.dissolved_oxygen_mg_l,
        r.turbidity_raw,
        r.turbidity_ntu
    );
    out
}
