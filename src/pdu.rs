//! SNMP Protocol Data Units.

use crate::ber::{Decoder, EncodeBuf};
use crate::error::{DecodeErrorKind, Error, ErrorStatus, Result};
use crate::oid::Oid;
use crate::varbind::{VarBind, decode_varbind_list, encode_varbind_list};

/// PDU type tag (context class, constructed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PduType {
    GetRequest = 0xA0,
    GetNextRequest = 0xA1,
    Response = 0xA2,
    SetRequest = 0xA3,
    TrapV1 = 0xA4,
    GetBulkRequest = 0xA5,
    InformRequest = 0xA6,
    TrapV2 = 0xA7,
}

impl PduType {
    /// Create from a tag octet.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0xA0 => Some(Self::GetRequest),
            0xA1 => Some(Self::GetNextRequest),
            0xA2 => Some(Self::Response),
            0xA3 => Some(Self::SetRequest),
            0xA4 => Some(Self::TrapV1),
            0xA5 => Some(Self::GetBulkRequest),
            0xA6 => Some(Self::InformRequest),
            0xA7 => Some(Self::TrapV2),
            _ => None,
        }
    }

    /// The tag octet.
    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for PduType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GetRequest => write!(f, "GetRequest"),
            Self::GetNextRequest => write!(f, "GetNextRequest"),
            Self::Response => write!(f, "Response"),
            Self::SetRequest => write!(f, "SetRequest"),
            Self::TrapV1 => write!(f, "TrapV1"),
            Self::GetBulkRequest => write!(f, "GetBulkRequest"),
            Self::InformRequest => write!(f, "InformRequest"),
            Self::TrapV2 => write!(f, "SNMPv2-Trap"),
        }
    }
}

/// SNMP PDU.
///
/// For GetBulk requests, `error_status` carries non-repeaters and
/// `error_index` carries max-repetitions (RFC 3416 Section 4.2.3).
#[derive(Debug, Clone)]
pub struct Pdu {
    pub pdu_type: PduType,
    pub request_id: i32,
    pub error_status: i32,
    /// 1-based index of the varbind an error refers to.
    pub error_index: i32,
    pub varbinds: Vec<VarBind>,
}

impl Pdu {
    /// Build a GET request; varbind values are NULL on the wire.
    pub fn get_request(request_id: i32, oids: &[Oid]) -> Self {
        Self {
            pdu_type: PduType::GetRequest,
            request_id,
            error_status: 0,
            error_index: 0,
            varbinds: oids.iter().map(|oid| VarBind::null(oid.clone())).collect(),
        }
    }

    /// Build a GETNEXT request.
    pub fn get_next_request(request_id: i32, oids: &[Oid]) -> Self {
        Self {
            pdu_type: PduType::GetNextRequest,
            request_id,
            error_status: 0,
            error_index: 0,
            varbinds: oids.iter().map(|oid| VarBind::null(oid.clone())).collect(),
        }
    }

    /// Build a GETBULK request.
    pub fn get_bulk_request(
        request_id: i32,
        oids: &[Oid],
        non_repeaters: i32,
        max_repetitions: i32,
    ) -> Self {
        Self {
            pdu_type: PduType::GetBulkRequest,
            request_id,
            error_status: non_repeaters,
            error_index: max_repetitions,
            varbinds: oids.iter().map(|oid| VarBind::null(oid.clone())).collect(),
        }
    }

    /// Build an SNMPv2-Trap PDU from ready-made varbinds.
    pub fn trap_v2(request_id: i32, varbinds: Vec<VarBind>) -> Self {
        Self {
            pdu_type: PduType::TrapV2,
            request_id,
            error_status: 0,
            error_index: 0,
            varbinds,
        }
    }

    /// Encode to BER.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        buf.push_constructed(self.pdu_type.tag(), |buf| {
            encode_varbind_list(buf, &self.varbinds);
            buf.push_integer(i64::from(self.error_index));
            buf.push_integer(i64::from(self.error_status));
            buf.push_integer(i64::from(self.request_id));
        });
    }

    /// Decode from BER.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let at = decoder.offset();
        let tag_byte = decoder.peek_tag().ok_or_else(|| {
            Error::decode(at, DecodeErrorKind::Truncated)
        })?;
        let pdu_type = PduType::from_tag(tag_byte)
            .ok_or_else(|| Error::decode(at, DecodeErrorKind::UnknownPduType { tag: tag_byte }))?;

        let mut body = decoder.read_constructed(tag_byte)?;
        let request_id = body.read_i32()?;
        let error_status = body.read_i32()?;
        let error_index = body.read_i32()?;
        let varbinds = decode_varbind_list(&mut body)?;
        body.expect_end()?;

        Ok(Pdu {
            pdu_type,
            request_id,
            error_status,
            error_index,
            varbinds,
        })
    }

    /// True when the response carries a non-zero error-status.
    pub fn is_error(&self) -> bool {
        self.error_status != 0
    }

    /// Error-status as an enum.
    pub fn error_status_enum(&self) -> ErrorStatus {
        ErrorStatus::from_i32(self.error_status)
    }

    /// OID of the varbind named by `error_index`, when in range.
    pub fn error_oid(&self) -> Option<&Oid> {
        usize::try_from(self.error_index)
            .ok()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| self.varbinds.get(i))
            .map(|vb| &vb.oid)
    }
}
