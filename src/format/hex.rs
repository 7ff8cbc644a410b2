//! Hex rendering helpers.

use std::fmt;

/// Encode bytes as a lowercase hex string with no separators.
pub fn encode(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Encode bytes as uppercase hex pairs separated by spaces, the
/// net-snmp `Hex-STRING` body (`"AA BB CC"`).
pub fn encode_spaced(bytes: &[u8]) -> String {
    use fmt::Write as _;
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{b:02X}");
    }
    out
}

/// Lazy hex formatter for logging; formats only when actually displayed.
pub struct Bytes<'a>(pub &'a [u8]);

impl fmt::Debug for Bytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl fmt::Display for Bytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_lowercase() {
        assert_eq!(encode(&[0xDE, 0xAD, 0xBE, 0xEF]), "deadbeef");
        assert_eq!(encode(&[]), "");
    }

    #[test]
    fn encode_spaced_uppercase() {
        assert_eq!(encode_spaced(&[0xDE, 0xAD, 0xBE]), "DE AD BE");
        assert_eq!(encode_spaced(&[0x0F]), "0F");
        assert_eq!(encode_spaced(&[]), "");
    }

    #[test]
    fn lazy_formatter() {
        assert_eq!(format!("{}", Bytes(&[0x00, 0xFF])), "00ff");
    }
}
