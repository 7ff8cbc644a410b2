//! SNMP value types.
//!
//! [`Value`] covers the SMI types carried in varbinds plus the v2c
//! exception markers.

use crate::ber::{Decoder, EncodeBuf, tag};
use crate::error::{DecodeErrorKind, Error, Result};
use crate::oid::Oid;
use bytes::Bytes;

/// An SNMP value.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Value {
    /// BOOLEAN. Not used by SNMP PDUs but preserved by the codec.
    Boolean(bool),

    /// INTEGER. Arbitrary precision on the wire; i64 covers every use here.
    Integer(i64),

    /// OCTET STRING.
    OctetString(Bytes),

    /// NULL (request placeholders).
    Null,

    /// OBJECT IDENTIFIER.
    ObjectIdentifier(Oid),

    /// IpAddress (4 octets, network order).
    IpAddress([u8; 4]),

    /// Counter32 (wrapping).
    Counter32(u32),

    /// Gauge32 / Unsigned32.
    Gauge32(u32),

    /// TimeTicks (hundredths of a second).
    TimeTicks(u32),

    /// Opaque (legacy wrapper).
    Opaque(Bytes),

    /// Counter64. SNMPv2c only.
    Counter64(u64),

    /// noSuchObject exception.
    NoSuchObject,

    /// noSuchInstance exception.
    NoSuchInstance,

    /// endOfMibView exception, the normal walk terminator.
    EndOfMibView,

    /// Unrecognized tag, preserved verbatim.
    Unknown { tag: u8, data: Bytes },
}

impl Value {
    /// True for the v2c exception markers.
    pub fn is_exception(&self) -> bool {
        matches!(
            self,
            Value::NoSuchObject | Value::NoSuchInstance | Value::EndOfMibView
        )
    }

    /// Bytes of an OCTET STRING or Opaque.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::OctetString(b) | Value::Opaque(b) => Some(b),
            _ => None,
        }
    }

    /// UTF-8 view of an OCTET STRING or Opaque.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    /// The contained OID.
    pub fn as_oid(&self) -> Option<&Oid> {
        match self {
            Value::ObjectIdentifier(oid) => Some(oid),
            _ => None,
        }
    }

    /// Encode to BER.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        match self {
            Value::Boolean(v) => {
                buf.push_bytes(&[if *v { 0xFF } else { 0x00 }]);
                buf.push_length(1);
                buf.push_tag(tag::universal::BOOLEAN);
            }
            Value::Integer(v) => buf.push_integer(*v),
            Value::OctetString(data) => buf.push_octet_string(data),
            Value::Null => buf.push_null(),
            Value::ObjectIdentifier(oid) => buf.push_oid(oid),
            Value::IpAddress(addr) => buf.push_ip_address(*addr),
            Value::Counter32(v) => buf.push_unsigned32(tag::application::COUNTER32, *v),
            Value::Gauge32(v) => buf.push_unsigned32(tag::application::GAUGE32, *v),
            Value::TimeTicks(v) => buf.push_unsigned32(tag::application::TIMETICKS, *v),
            Value::Opaque(data) => buf.push_opaque(data),
            Value::Counter64(v) => buf.push_counter64(*v),
            Value::NoSuchObject => buf.push_empty(tag::context::NO_SUCH_OBJECT),
            Value::NoSuchInstance => buf.push_empty(tag::context::NO_SUCH_INSTANCE),
            Value::EndOfMibView => buf.push_empty(tag::context::END_OF_MIB_VIEW),
            Value::Unknown { tag: t, data } => {
                buf.push_bytes(data);
                buf.push_length(data.len());
                buf.push_tag(*t);
            }
        }
    }

    /// Decode from BER.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let at = decoder.offset();
        let tag = decoder.read_tag()?;
        let len = decoder.read_length()?;

        match tag {
            tag::universal::BOOLEAN => {
                if len != 1 {
                    return Err(Error::decode(
                        at,
                        DecodeErrorKind::IntegerTooLong { length: len },
                    ));
                }
                let b = decoder.read_byte()?;
                Ok(Value::Boolean(b != 0))
            }
            tag::universal::INTEGER => Ok(Value::Integer(decoder.read_integer_content(len)?)),
            tag::universal::OCTET_STRING => Ok(Value::OctetString(decoder.read_bytes(len)?)),
            tag::universal::NULL => {
                if len != 0 {
                    return Err(Error::decode(at, DecodeErrorKind::InvalidNull));
                }
                Ok(Value::Null)
            }
            tag::universal::OBJECT_IDENTIFIER => {
                let bytes = decoder.read_bytes(len)?;
                Ok(Value::ObjectIdentifier(Oid::from_ber(&bytes)?))
            }
            tag::application::IP_ADDRESS => {
                if len != 4 {
                    return Err(Error::decode(
                        at,
                        DecodeErrorKind::InvalidIpAddressLength { length: len },
                    ));
                }
                let b = decoder.read_bytes(4)?;
                Ok(Value::IpAddress([b[0], b[1], b[2], b[3]]))
            }
            tag::application::COUNTER32 => {
                Ok(Value::Counter32(decoder.read_unsigned32_content(len)?))
            }
            tag::application::GAUGE32 => Ok(Value::Gauge32(decoder.read_unsigned32_content(len)?)),
            tag::application::TIMETICKS => {
                Ok(Value::TimeTicks(decoder.read_unsigned32_content(len)?))
            }
            tag::application::OPAQUE => Ok(Value::Opaque(decoder.read_bytes(len)?)),
            tag::application::COUNTER64 => {
                Ok(Value::Counter64(decoder.read_unsigned64_content(len)?))
            }
            tag::context::NO_SUCH_OBJECT => {
                decoder.read_bytes(len)?;
                Ok(Value::NoSuchObject)
            }
            tag::context::NO_SUCH_INSTANCE => {
                decoder.read_bytes(len)?;
                Ok(Value::NoSuchInstance)
            }
            tag::context::END_OF_MIB_VIEW => {
                decoder.read_bytes(len)?;
                Ok(Value::EndOfMibView)
            }
            tag::universal::OCTET_STRING_CONSTRUCTED => {
                Err(Error::decode(at, DecodeErrorKind::ConstructedOctetString))
            }
            _ => {
                let data = decoder.read_bytes(len)?;
                Ok(Value::Unknown { tag, data })
            }
        }
    }
}

impl std::fmt::Display for Value {
    /// Plain rendering without type labels or hints; used in logs. The CLI
    /// printer owns the user-facing rendering.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Boolean(v) => write!(f, "{}", v),
            Value::Integer(v) => write!(f, "{}", v),
            Value::OctetString(data) | Value::Opaque(data) => {
                match std::str::from_utf8(data) {
                    Ok(s) if s.chars().all(|c| !c.is_control()) => write!(f, "{}", s),
                    _ => write!(f, "0x{}", hex::encode(data)),
                }
            }
            Value::Null => write!(f, "NULL"),
            Value::ObjectIdentifier(oid) => write!(f, "{}", oid),
            Value::IpAddress(a) => write!(f, "{}.{}.{}.{}", a[0], a[1], a[2], a[3]),
            Value::Counter32(v) | Value::Gauge32(v) | Value::TimeTicks(v) => write!(f, "{}", v),
            Value::Counter64(v) => write!(f, "{}", v),
            Value::NoSuchObject => write!(f, "noSuchObject"),
            Value::NoSuchInstance => write!(f, "noSuchInstance"),
            Value::EndOfMibView => write!(f, "endOfMibView"),
            Value::Unknown { tag, data } => {
                write!(f, "[{:#04x}] 0x{}", tag, hex::encode(data))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    fn roundtrip(value: Value) {
        let mut buf = EncodeBuf::new();
        value.encode(&mut buf);
        let bytes = buf.finish();
        let mut dec = Decoder::new(bytes);
        assert_eq!(Value::decode(&mut dec).unwrap(), value);
        dec.expect_end().unwrap();
    }

    #[test]
    fn roundtrip_all_variants() {
        roundtrip(Value::Boolean(true));
        roundtrip(Value::Integer(0));
        roundtrip(Value::Integer(-42));
        roundtrip(Value::Integer(i64::MAX));
        roundtrip(Value::OctetString(Bytes::from_static(b"OpenBSD")));
        roundtrip(Value::Null);
        roundtrip(Value::ObjectIdentifier(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)));
        roundtrip(Value::IpAddress([10, 0, 0, 1]));
        roundtrip(Value::Counter32(u32::MAX));
        roundtrip(Value::Gauge32(0));
        roundtrip(Value::TimeTicks(4_294_967_295));
        roundtrip(Value::Opaque(Bytes::from_static(&[0xDE, 0xAD])));
        roundtrip(Value::Counter64(u64::MAX));
        roundtrip(Value::NoSuchObject);
        roundtrip(Value::NoSuchInstance);
        roundtrip(Value::EndOfMibView);
    }

    #[test]
    fn counter32_high_bit_wire_form() {
        // 0x80000000 must carry a 0x00 pad so it cannot read back negative
        let mut buf = EncodeBuf::new();
        Value::Counter32(0x8000_0000).encode(&mut buf);
        let bytes = buf.finish();
        assert_eq!(&bytes[..], &[0x41, 0x05, 0x00, 0x80, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn exception_markers_decode_from_context_tags() {
        for (wire, expect) in [
            (&[0x80u8, 0x00][..], Value::NoSuchObject),
            (&[0x81, 0x00][..], Value::NoSuchInstance),
            (&[0x82, 0x00][..], Value::EndOfMibView),
        ] {
            let mut dec = Decoder::from_slice(wire);
            assert_eq!(Value::decode(&mut dec).unwrap(), expect);
        }
    }

    #[test]
    fn unknown_tag_preserved() {
        let mut dec = Decoder::from_slice(&[0x47, 0x02, 0xAA, 0xBB]);
        let value = Value::decode(&mut dec).unwrap();
        assert_eq!(
            value,
            Value::Unknown {
                tag: 0x47,
                data: Bytes::from_static(&[0xAA, 0xBB]),
            }
        );
        roundtrip(value);
    }
}
