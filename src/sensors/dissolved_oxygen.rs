//! Dissolved-oxygen probe on the shared I2C bus.
//!
//! The probe answers a read with a short ASCII decimal string, optionally
//! preceded by a one-byte status code and padded with NULs. A silent probe
//! or an empty reply leaves the previous value untouched.

use log::debug;

use crate::app::ports::SensorPort;
use crate::config::SystemConfig;

/// Largest response the sampler will ever request.
pub const MAX_RESPONSE_LEN: usize = 32;

/// Extract a reading from a raw response.
///
/// Bytes up to the first NUL are considered. A leading non-printable byte
/// (status code) is skipped. `None` when nothing remains; otherwise the
/// longest leading decimal number, or `0.0` if there is none.
pub fn parse_response(bytes: &[u8]) -> Option<f32> {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let mut payload = &bytes[..end];
    if let Some((&first, rest)) = payload.split_first() {
        if !(first.is_ascii_graphic() || first == b' ') {
            payload = rest;
        }
    }
    if payload.is_empty() {
        return None;
    }
    Some(leading_decimal(payload))
}

/// Parse the longest `[ws][+-]digits[.digits][e[+-]digits]` prefix.
fn leading_decimal(bytes: &[u8]) -> f32 {
    let mut i = 0;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    let start = i;

    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    let mut digits = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        digits += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return 0.0;
    }

    // Exponent only counts when followed by at least one digit.
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    core::str::from_utf8(&bytes[start..i])
        .ok()
        .and_then(|s| s.parse::<f32>().ok())
        .unwrap_or(0.0)
}

pub struct OxygenSampler {
    mg_per_l: f32,
    address: u8,
    response_cap: usize,
}

impl OxygenSampler {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            mg_per_l: 0.0,
            address: config.oxygen.i2c_address,
            response_cap: config.oxygen.response_cap.min(MAX_RESPONSE_LEN),
        }
    }

    pub fn mg_per_l(&self) -> f32 {
        self.mg_per_l
    }

    pub fn sample(&mut self, hw: &mut impl SensorPort) -> f32 {
        let mut buf = [0u8; MAX_RESPONSE_LEN];
        let buf = &mut buf[..self.response_cap];

        match hw.read_oxygen(self.address, buf) {
            Ok(()) => match parse_response(buf) {
                Some(value) => self.mg_per_l = value,
                None => debug!("oxygen: empty response, keeping {:.1}", self.mg_per_l),
            },
            Err(e) => debug!("oxygen: no answer ({}), keeping {:.1}", e, self.mg_per_l),
        }
        self.mg_per_l
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ascii() {
        assert_eq!(parse_response(b"8.42\0\0\0"), Some(8.42));
    }

    #[test]
    fn status_byte_is_skipped() {
        assert_eq!(parse_response(b"\x017.91\0\0"), Some(7.91));
    }

    #[test]
    fn all_nul_is_empty() {
        assert_eq!(parse_response(&[0u8; 20]), None);
        assert_eq!(parse_response(&[]), None);
    }

    #[test]
    fn lone_status_byte_is_empty() {
        assert_eq!(parse_response(&[0xFF, 0, 0]), None);
    }

    #[test]
    fn garbage_parses_as_zero() {
        assert_eq!(parse_response(b"abc"), Some(0.0));
        assert_eq!(parse_response(b"."), Some(0.0));
    }

    #[test]
    fn trailing_text_is_ignored() {
        assert_eq!(parse_response(b"6.5,mg/L\0"), Some(6.5));
        assert_eq!(parse_response(b"1e\0"), Some(1.0));
        assert_eq!(parse_response(b" -2.5e1x"), Some(-25.0));
    }

    #[test]
    fn unterminated_buffer_uses_everything() {
        assert_eq!(parse_response(b"12.25"), Some(12.25));
    }
}
