//! BER decoding.
//!
//! Zero-copy over `Bytes`. Strict: overruns, indefinite lengths and
//! malformed primitives surface as `Error::MalformedBer` with the offset of
//! the offending octet.

use super::length::decode_length;
use super::tag;
use crate::error::{DecodeErrorKind, Error, Result};
use crate::oid::Oid;
use bytes::Bytes;

/// Offset-tracking BER reader.
pub struct Decoder {
    data: Bytes,
    offset: usize,
    /// Offset of this buffer inside the outermost message, for error reports
    /// from sub-decoders.
    base: usize,
}

impl Decoder {
    /// Create a decoder over owned bytes.
    pub fn new(data: Bytes) -> Self {
        Self {
            data,
            offset: 0,
            base: 0,
        }
    }

    /// Create a decoder from a slice (copies).
    pub fn from_slice(data: &[u8]) -> Self {
        Self::new(Bytes::copy_from_slice(data))
    }

    /// Offset within the outermost message.
    pub fn offset(&self) -> usize {
        self.base + self.offset
    }

    /// Remaining unread octets.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// True when fully consumed.
    pub fn is_empty(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Peek the next tag octet without consuming it.
    pub fn peek_tag(&self) -> Option<u8> {
        self.data.get(self.offset).copied()
    }

    /// Error unless every octet has been consumed. Call after reading the
    /// last expected field of a constructed element.
    pub fn expect_end(&self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::decode(
                self.offset(),
                DecodeErrorKind::TrailingBytes {
                    remaining: self.remaining(),
                },
            ))
        }
    }

    /// Read one octet.
    pub fn read_byte(&mut self) -> Result<u8> {
        let Some(&byte) = self.data.get(self.offset) else {
            return Err(Error::decode(self.offset(), DecodeErrorKind::Truncated));
        };
        self.offset += 1;
        Ok(byte)
    }

    /// Read a tag octet.
    pub fn read_tag(&mut self) -> Result<u8> {
        self.read_byte()
    }

    /// Read a length field.
    pub fn read_length(&mut self) -> Result<usize> {
        let (len, consumed) = decode_length(&self.data[self.offset..], self.offset())?;
        self.offset += consumed;
        Ok(len)
    }

    /// Read raw content without copying.
    pub fn read_bytes(&mut self, len: usize) -> Result<Bytes> {
        if self.offset.saturating_add(len) > self.data.len() {
            return Err(Error::decode(self.offset(), DecodeErrorKind::Truncated));
        }
        let bytes = self.data.slice(self.offset..self.offset + len);
        self.offset += len;
        Ok(bytes)
    }

    /// Require a specific tag, returning its content length.
    pub fn expect_tag(&mut self, expected: u8) -> Result<usize> {
        let at = self.offset();
        let actual = self.read_tag()?;
        if actual != expected {
            return Err(Error::decode(
                at,
                DecodeErrorKind::UnexpectedTag { expected, actual },
            ));
        }
        self.read_length()
    }

    /// Read a full INTEGER element as i64.
    pub fn read_integer(&mut self) -> Result<i64> {
        let len = self.expect_tag(tag::universal::INTEGER)?;
        self.read_integer_content(len)
    }

    /// Read a full INTEGER element narrowed to i32 (PDU header fields).
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_integer()? as i32)
    }

    /// Read signed integer content of a pre-read length.
    pub fn read_integer_content(&mut self, len: usize) -> Result<i64> {
        if len == 0 {
            return Err(Error::decode(
                self.offset(),
                DecodeErrorKind::ZeroLengthInteger,
            ));
        }
        if len > 8 {
            return Err(Error::decode(
                self.offset(),
                DecodeErrorKind::IntegerTooLong { length: len },
            ));
        }

        let bytes = self.read_bytes(len)?;
        let mut value: i64 = if bytes[0] & 0x80 != 0 { -1 } else { 0 };
        for &b in bytes.iter() {
            value = (value << 8) | i64::from(b);
        }
        Ok(value)
    }

    /// Read unsigned 32-bit content of a pre-read length. Accepts one
    /// leading zero pad octet (5 octets total).
    pub fn read_unsigned32_content(&mut self, len: usize) -> Result<u32> {
        if len == 0 {
            return Err(Error::decode(
                self.offset(),
                DecodeErrorKind::ZeroLengthInteger,
            ));
        }
        if len > 5 {
            return Err(Error::decode(
                self.offset(),
                DecodeErrorKind::IntegerTooLong { length: len },
            ));
        }

        let bytes = self.read_bytes(len)?;
        let mut value: u64 = 0;
        for &b in bytes.iter() {
            value = (value << 8) | u64::from(b);
        }
        if value > u64::from(u32::MAX) {
            return Err(Error::decode(
                self.offset(),
                DecodeErrorKind::IntegerTooLong { length: len },
            ));
        }
        Ok(value as u32)
    }

    /// Read an application-tagged unsigned 32-bit element.
    pub fn read_unsigned32(&mut self, expected_tag: u8) -> Result<u32> {
        let len = self.expect_tag(expected_tag)?;
        self.read_unsigned32_content(len)
    }

    /// Read unsigned 64-bit content (Counter64) of a pre-read length.
    pub fn read_unsigned64_content(&mut self, len: usize) -> Result<u64> {
        if len == 0 {
            return Err(Error::decode(
                self.offset(),
                DecodeErrorKind::ZeroLengthInteger,
            ));
        }
        if len > 9 {
            return Err(Error::decode(
                self.offset(),
                DecodeErrorKind::IntegerTooLong { length: len },
            ));
        }

        let bytes = self.read_bytes(len)?;
        let mut value: u64 = 0;
        for (i, &b) in bytes.iter().enumerate() {
            if i == 0 && len == 9 && b != 0 {
                return Err(Error::decode(
                    self.offset(),
                    DecodeErrorKind::IntegerTooLong { length: len },
                ));
            }
            value = value.wrapping_shl(8) | u64::from(b);
        }
        Ok(value)
    }

    /// Read an OCTET STRING element.
    pub fn read_octet_string(&mut self) -> Result<Bytes> {
        let at = self.offset();
        if self.peek_tag() == Some(tag::universal::OCTET_STRING_CONSTRUCTED) {
            return Err(Error::decode(at, DecodeErrorKind::ConstructedOctetString));
        }
        let len = self.expect_tag(tag::universal::OCTET_STRING)?;
        self.read_bytes(len)
    }

    /// Read a NULL element.
    pub fn read_null(&mut self) -> Result<()> {
        let len = self.expect_tag(tag::universal::NULL)?;
        if len != 0 {
            return Err(Error::decode(self.offset(), DecodeErrorKind::InvalidNull));
        }
        Ok(())
    }

    /// Read an OBJECT IDENTIFIER element.
    pub fn read_oid(&mut self) -> Result<Oid> {
        let len = self.expect_tag(tag::universal::OBJECT_IDENTIFIER)?;
        let at = self.offset();
        let bytes = self.read_bytes(len)?;
        Oid::from_ber(&bytes).map_err(|e| match e {
            // Reposition nested offsets relative to the whole message
            Error::MalformedBer { offset, kind } => Error::MalformedBer {
                offset: at + offset,
                kind,
            },
            other => other,
        })
    }

    /// Read an IpAddress element (4 octets).
    pub fn read_ip_address(&mut self) -> Result<[u8; 4]> {
        let len = self.expect_tag(tag::application::IP_ADDRESS)?;
        if len != 4 {
            return Err(Error::decode(
                self.offset(),
                DecodeErrorKind::InvalidIpAddressLength { length: len },
            ));
        }
        let bytes = self.read_bytes(4)?;
        Ok([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    /// Read a SEQUENCE, returning a decoder over its content.
    pub fn read_sequence(&mut self) -> Result<Decoder> {
        self.read_constructed(tag::universal::SEQUENCE)
    }

    /// Read a constructed element with a specific tag, returning a decoder
    /// over its content.
    pub fn read_constructed(&mut self, expected_tag: u8) -> Result<Decoder> {
        let len = self.expect_tag(expected_tag)?;
        let base = self.offset();
        let content = self.read_bytes(len)?;
        Ok(Decoder {
            data: content,
            offset: 0,
            base,
        })
    }

    /// Hand out a sub-decoder over the next `len` octets.
    pub fn sub_decoder(&mut self, len: usize) -> Result<Decoder> {
        let base = self.offset();
        let content = self.read_bytes(len)?;
        Ok(Decoder {
            data: content,
            offset: 0,
            base,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_integers() {
        let cases: &[(&[u8], i64)] = &[
            (&[0x02, 0x01, 0x00], 0),
            (&[0x02, 0x01, 0x7F], 127),
            (&[0x02, 0x02, 0x00, 0x80], 128),
            (&[0x02, 0x01, 0xFF], -1),
            (&[0x02, 0x01, 0x80], -128),
            (&[0x02, 0x08, 0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF], i64::MAX),
        ];
        for (bytes, expect) in cases {
            let mut dec = Decoder::from_slice(bytes);
            assert_eq!(dec.read_integer().unwrap(), *expect);
        }
    }

    #[test]
    fn decode_accepts_padded_integer() {
        // Redundant sign octets are tolerated in content
        let mut dec = Decoder::from_slice(&[0x02, 0x02, 0x00, 0x01]);
        assert_eq!(dec.read_integer().unwrap(), 1);
        let mut dec = Decoder::from_slice(&[0x02, 0x02, 0xFF, 0xFF]);
        assert_eq!(dec.read_integer().unwrap(), -1);
    }

    #[test]
    fn decode_rejects_empty_integer() {
        let mut dec = Decoder::from_slice(&[0x02, 0x00]);
        assert!(dec.read_integer().is_err());
    }

    #[test]
    fn decode_unsigned32() {
        let mut dec = Decoder::from_slice(&[0x41, 0x05, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(dec.read_unsigned32(0x41).unwrap(), u32::MAX);

        // Six content octets can never fit u32
        let mut dec = Decoder::from_slice(&[0x41, 0x06, 0x01, 0, 0, 0, 0, 0]);
        assert!(dec.read_unsigned32(0x41).is_err());
    }

    #[test]
    fn decode_counter64() {
        let mut dec = Decoder::from_slice(&[
            0x46, 0x09, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        ]);
        let len = dec.expect_tag(0x46).unwrap();
        assert_eq!(dec.read_unsigned64_content(len).unwrap(), u64::MAX);
    }

    #[test]
    fn decode_null_and_string() {
        let mut dec = Decoder::from_slice(&[0x05, 0x00]);
        dec.read_null().unwrap();

        let mut dec = Decoder::from_slice(&[0x04, 0x05, b'h', b'e', b'l', b'l', b'o']);
        assert_eq!(&dec.read_octet_string().unwrap()[..], b"hello");
    }

    #[test]
    fn decode_null_with_content_rejected() {
        let mut dec = Decoder::from_slice(&[0x05, 0x01, 0x00]);
        assert!(dec.read_null().is_err());
    }

    #[test]
    fn decode_constructed_octet_string_rejected() {
        let mut dec = Decoder::from_slice(&[0x24, 0x02, 0x04, 0x00]);
        assert!(dec.read_octet_string().is_err());
    }

    #[test]
    fn decode_sequence() {
        let mut dec = Decoder::from_slice(&[0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02]);
        let mut seq = dec.read_sequence().unwrap();
        assert_eq!(seq.read_integer().unwrap(), 1);
        assert_eq!(seq.read_integer().unwrap(), 2);
        seq.expect_end().unwrap();
        dec.expect_end().unwrap();
    }

    #[test]
    fn trailing_bytes_detected() {
        let mut dec = Decoder::from_slice(&[0x30, 0x05, 0x02, 0x01, 0x01, 0x05, 0x00]);
        let mut seq = dec.read_sequence().unwrap();
        assert_eq!(seq.read_integer().unwrap(), 1);
        assert!(seq.expect_end().is_err());
    }

    #[test]
    fn overrun_detected_with_offset() {
        let mut dec = Decoder::from_slice(&[0x04, 0x10, 0x01]);
        match dec.read_octet_string() {
            Err(Error::MalformedBer { offset, kind }) => {
                assert_eq!(offset, 2);
                assert_eq!(kind, DecodeErrorKind::Truncated);
            }
            other => panic!("expected MalformedBer, got {other:?}"),
        }
    }

    #[test]
    fn sub_decoder_offsets_are_absolute() {
        // SEQUENCE at 0, inner INTEGER starts at 2 but has bad length
        let mut dec = Decoder::from_slice(&[0x30, 0x03, 0x02, 0x05, 0x01]);
        let mut seq = dec.read_sequence().unwrap();
        match seq.read_integer() {
            Err(Error::MalformedBer { offset, .. }) => assert!(offset >= 4),
            other => panic!("expected MalformedBer, got {other:?}"),
        }
    }

    #[test]
    fn decode_ip_address() {
        let mut dec = Decoder::from_slice(&[0x40, 0x04, 192, 168, 1, 1]);
        assert_eq!(dec.read_ip_address().unwrap(), [192, 168, 1, 1]);

        let mut dec = Decoder::from_slice(&[0x40, 0x03, 10, 0, 0]);
        assert!(dec.read_ip_address().is_err());
    }
}
