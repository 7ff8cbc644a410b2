//! The community-based message envelope (v1/v2c).
//!
//! `SEQUENCE { version INTEGER, community OCTET STRING, pdu }` with wire
//! version 0 for v1 and 1 for v2c.

use crate::ber::{Decoder, EncodeBuf};
use crate::error::{DecodeErrorKind, Error, Result};
use crate::pdu::Pdu;
use crate::version::Version;
use bytes::Bytes;

/// A community-authenticated SNMP message.
#[derive(Debug, Clone)]
pub struct Message {
    pub version: Version,
    pub community: Bytes,
    pub pdu: Pdu,
}

impl Message {
    /// Create a message.
    pub fn new(version: Version, community: impl Into<Bytes>, pdu: Pdu) -> Self {
        Self {
            version,
            community: community.into(),
            pdu,
        }
    }

    /// Encode to BER wire form.
    pub fn encode(&self) -> Bytes {
        let mut buf = EncodeBuf::new();
        buf.push_sequence(|buf| {
            self.pdu.encode(buf);
            buf.push_octet_string(&self.community);
            buf.push_integer(i64::from(self.version.as_i32()));
        });
        buf.finish()
    }

    /// Decode from BER wire form. Trailing bytes after the envelope are an
    /// error.
    pub fn decode(data: Bytes) -> Result<Self> {
        let mut decoder = Decoder::new(data);
        let mut seq = decoder.read_sequence()?;

        let at = seq.offset();
        let version_num = seq.read_i32()?;
        let version = Version::from_i32(version_num).ok_or(Error::MalformedBer {
            offset: at,
            kind: DecodeErrorKind::UnknownVersion {
                version: version_num,
            },
        })?;

        let community = seq.read_octet_string()?;
        let pdu = Pdu::decode(&mut seq)?;
        seq.expect_end()?;
        decoder.expect_end()?;

        Ok(Message {
            version,
            community,
            pdu,
        })
    }
}
