//! Typed value grammar for user-supplied trap varbinds.
//!
//! Single-letter type tags select how the value literal is parsed:
//!
//! | Tag | Type | Literal |
//! |-----|------|---------|
//! | `a` | IpAddress | dotted IPv4 |
//! | `b` | BITS (as OCTET STRING) | decimal bit indices |
//! | `c` | Counter32 | i32-range integer |
//! | `d` | OCTET STRING | decimal byte list |
//! | `i`, `u` | INTEGER | signed 64-bit integer |
//! | `n` | NULL | (none) |
//! | `o` | OID | numeric or symbolic OID |
//! | `s` | OCTET STRING | literal text |
//! | `t` | TimeTicks | integer |
//! | `x` | OCTET STRING | hex byte list |

use crate::error::{Error, Result};
use crate::mib::Mib;
use crate::value::Value;
use bytes::Bytes;

/// Parse a `(type, value)` pair into a [`Value`].
///
/// `oid` is the varbind's OID literal, used only for error context.
pub fn parse_typed_value(oid: &str, tag: &str, literal: &str, mib: &Mib) -> Result<Value> {
    let bad = || Error::BadValue {
        oid: oid.to_string(),
        literal: literal.to_string(),
    };

    match tag {
        "a" => {
            let addr: std::net::Ipv4Addr = literal.parse().map_err(|_| bad())?;
            Ok(Value::IpAddress(addr.octets()))
        }
        "b" => {
            // RFC 3416 Section 2.5: BITS values travel as OCTET STRING
            let mut bytes: Vec<u8> = Vec::new();
            for token in literal.split([' ', '\t', ',']) {
                if token.is_empty() {
                    continue;
                }
                let bit: u32 = token.parse().map_err(|_| bad())?;
                let byte = (bit / 8) as usize;
                if byte >= bytes.len() {
                    bytes.resize(byte + 1, 0);
                }
                bytes[byte] |= 0x80 >> (bit % 8);
            }
            Ok(Value::OctetString(Bytes::from(bytes)))
        }
        "c" => {
            let v: i32 = literal.parse().map_err(|_| bad())?;
            Ok(Value::Counter32(v as u32))
        }
        "d" => {
            let mut bytes = Vec::new();
            for token in literal.split_whitespace() {
                let b: u8 = token.parse().map_err(|_| bad())?;
                bytes.push(b);
            }
            Ok(Value::OctetString(Bytes::from(bytes)))
        }
        "i" | "u" => {
            let v: i64 = literal.parse().map_err(|_| bad())?;
            Ok(Value::Integer(v))
        }
        "n" => Ok(Value::Null),
        "o" => Ok(Value::ObjectIdentifier(mib.parse_oid(literal)?)),
        "s" => Ok(Value::OctetString(Bytes::copy_from_slice(
            literal.as_bytes(),
        ))),
        "t" => {
            let v: i64 = literal.parse().map_err(|_| bad())?;
            Ok(Value::TimeTicks(v as u32))
        }
        "x" => {
            let mut bytes = Vec::new();
            for token in literal.split_whitespace() {
                let b = u8::from_str_radix(token, 16).map_err(|_| bad())?;
                bytes.push(b);
            }
            Ok(Value::OctetString(Bytes::from(bytes)))
        }
        _ => Err(Error::argument(format!("unknown value type '{tag}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    fn parse(tag: &str, literal: &str) -> Result<Value> {
        parse_typed_value("1.3.6.1.4.1.9", tag, literal, &Mib::standard())
    }

    #[test]
    fn ip_address() {
        assert_eq!(
            parse("a", "10.1.2.3").unwrap(),
            Value::IpAddress([10, 1, 2, 3])
        );
        assert!(parse("a", "300.1.2.3").is_err());
        assert!(parse("a", "nonsense").is_err());
    }

    #[test]
    fn bits_set_high_to_low() {
        // Bit n sets 0x80 >> (n % 8) in byte n / 8
        assert_eq!(
            parse("b", "0").unwrap(),
            Value::OctetString(Bytes::from_static(&[0x80]))
        );
        assert_eq!(
            parse("b", "0 3,9").unwrap(),
            Value::OctetString(Bytes::from_static(&[0x90, 0x40]))
        );
        assert!(parse("b", "-1").is_err());
        assert!(parse("b", "1 two").is_err());
    }

    #[test]
    fn counter() {
        assert_eq!(parse("c", "42").unwrap(), Value::Counter32(42));
        assert_eq!(parse("c", "-1").unwrap(), Value::Counter32(u32::MAX));
        assert!(parse("c", "2147483648").is_err());
    }

    #[test]
    fn decimal_bytes() {
        assert_eq!(
            parse("d", "1 2 255").unwrap(),
            Value::OctetString(Bytes::from_static(&[1, 2, 255]))
        );
        assert!(parse("d", "256").is_err());
    }

    #[test]
    fn integers() {
        assert_eq!(parse("i", "-7").unwrap(), Value::Integer(-7));
        assert_eq!(
            parse("u", "9223372036854775807").unwrap(),
            Value::Integer(i64::MAX)
        );
        assert!(parse("i", "1.5").is_err());
    }

    #[test]
    fn null_ignores_nothing() {
        assert_eq!(parse("n", "").unwrap(), Value::Null);
    }

    #[test]
    fn oid_numeric_and_symbolic() {
        assert_eq!(
            parse("o", "1.3.6.1").unwrap(),
            Value::ObjectIdentifier(oid!(1, 3, 6, 1))
        );
        assert_eq!(
            parse("o", "sysDescr.0").unwrap(),
            Value::ObjectIdentifier(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0))
        );
        assert!(matches!(
            parse("o", "noSuchSymbol"),
            Err(Error::UnknownName { .. })
        ));
    }

    #[test]
    fn string_literal() {
        assert_eq!(
            parse("s", "hello world").unwrap(),
            Value::OctetString(Bytes::from_static(b"hello world"))
        );
    }

    #[test]
    fn timeticks() {
        assert_eq!(parse("t", "4711").unwrap(), Value::TimeTicks(4711));
        assert!(parse("t", "soon").is_err());
    }

    #[test]
    fn hex_bytes() {
        assert_eq!(
            parse("x", "de ad BE ef").unwrap(),
            Value::OctetString(Bytes::from_static(&[0xDE, 0xAD, 0xBE, 0xEF]))
        );
        assert!(parse("x", "fff").is_err());
        assert!(parse("x", "zz").is_err());
    }

    #[test]
    fn unknown_tag() {
        assert!(matches!(parse("q", "1"), Err(Error::Argument(_))));
    }

    #[test]
    fn bad_value_message_names_oid_and_literal() {
        let err = parse("t", "soon").unwrap_err();
        assert_eq!(err.to_string(), "1.3.6.1.4.1.9: Bad value notation (soon)");
    }
}
