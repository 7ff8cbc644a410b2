//! Error types.
//!
//! One crate-wide [`Error`] covers argument validation, OID resolution,
//! BER decoding, transport setup, request timeouts and server-reported
//! SNMP errors. Every variant renders to the message the CLI prints.

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for all snmpc operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Invalid command-line argument or violated operation precondition.
    #[error("{0}")]
    Argument(String),

    /// A symbolic OID segment could not be resolved against the MIB.
    #[error("{name}: Unknown object identifier")]
    UnknownName { name: String },

    /// The decoder hit structurally invalid BER.
    #[error("malformed BER at offset {offset}: {kind}")]
    MalformedBer { offset: usize, kind: DecodeErrorKind },

    /// A v2c-only PDU was requested on a v1 session.
    #[error("Cannot send V2 PDU on V1 session")]
    Version,

    /// The agent specifier could not be parsed.
    #[error("invalid agent \"{spec}\": {reason}")]
    AddressParse { spec: String, reason: String },

    /// Name resolution produced no usable address.
    #[error("{spec}: {reason}")]
    Resolve { spec: String, reason: String },

    /// The socket could not be created or connected.
    #[error("Can't connect to {spec}: {source}")]
    Connect {
        spec: String,
        #[source]
        source: std::io::Error,
    },

    /// Socket I/O failed mid-operation.
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// No matching response within `timeout * (retries + 1)`.
    #[error("Request timed out after {retries} retries")]
    Timeout { retries: u32 },

    /// The agent reported a non-zero error-status. The OID string is
    /// pre-rendered in the caller's display mode.
    #[error("Can't parse oid {oid}: {}", .status.description())]
    Snmp { status: ErrorStatus, oid: String },

    /// A typed trap value literal did not parse.
    #[error("{oid}: Bad value notation ({literal})")]
    BadValue { oid: String, literal: String },

    /// A walked agent returned a non-increasing OID.
    #[error("OID not increasing")]
    NotIncreasing,
}

impl Error {
    /// Shorthand for decode errors.
    pub(crate) fn decode(offset: usize, kind: DecodeErrorKind) -> Self {
        Error::MalformedBer { offset, kind }
    }

    /// Shorthand for argument errors.
    pub(crate) fn argument(msg: impl Into<String>) -> Self {
        Error::Argument(msg.into())
    }
}

/// Structural reasons a BER buffer failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeErrorKind {
    /// Input ended inside a tag, length or content field.
    Truncated,
    /// Indefinite length form (0x80), not used by SNMP.
    IndefiniteLength,
    /// Long length form announcing zero octets.
    InvalidLength,
    /// Length field longer than 4 octets.
    LengthTooLong { octets: usize },
    /// Length exceeds the sanity cap.
    LengthExceedsMax { length: usize },
    /// A different tag was required here.
    UnexpectedTag { expected: u8, actual: u8 },
    /// A tag outside the SNMP PDU subset.
    UnknownPduType { tag: u8 },
    /// INTEGER with empty content.
    ZeroLengthInteger,
    /// Integer content wider than the target type.
    IntegerTooLong { length: usize },
    /// NULL with non-empty content.
    InvalidNull,
    /// IpAddress content not exactly 4 octets.
    InvalidIpAddressLength { length: usize },
    /// Constructed OCTET STRING (0x24), rejected.
    ConstructedOctetString,
    /// OID with more than 128 subidentifiers.
    OidTooLong { count: usize },
    /// OID subidentifier overflowing u32.
    SubidOverflow,
    /// Trailing bytes inside a constructed element.
    TrailingBytes { remaining: usize },
    /// Unsupported message version on the wire.
    UnknownVersion { version: i32 },
}

impl std::fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Truncated => write!(f, "unexpected end of input"),
            Self::IndefiniteLength => write!(f, "indefinite length"),
            Self::InvalidLength => write!(f, "invalid length encoding"),
            Self::LengthTooLong { octets } => {
                write!(f, "length field of {octets} octets")
            }
            Self::LengthExceedsMax { length } => {
                write!(f, "length {length} exceeds maximum")
            }
            Self::UnexpectedTag { expected, actual } => {
                write!(f, "expected tag {expected:#04x}, got {actual:#04x}")
            }
            Self::UnknownPduType { tag } => write!(f, "unknown PDU type {tag:#04x}"),
            Self::ZeroLengthInteger => write!(f, "zero-length integer"),
            Self::IntegerTooLong { length } => {
                write!(f, "integer content of {length} octets")
            }
            Self::InvalidNull => write!(f, "NULL with content"),
            Self::InvalidIpAddressLength { length } => {
                write!(f, "IpAddress of {length} octets")
            }
            Self::ConstructedOctetString => write!(f, "constructed OCTET STRING"),
            Self::OidTooLong { count } => {
                write!(f, "OID with {count} subidentifiers")
            }
            Self::SubidOverflow => write!(f, "OID subidentifier overflow"),
            Self::TrailingBytes { remaining } => {
                write!(f, "{remaining} trailing bytes in constructed element")
            }
            Self::UnknownVersion { version } => write!(f, "unknown version {version}"),
        }
    }
}

/// SNMP error-status codes (RFC 1157 / RFC 3416).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorStatus {
    NoError,
    TooBig,
    NoSuchName,
    BadValue,
    ReadOnly,
    GenErr,
    NoAccess,
    WrongType,
    WrongLength,
    WrongEncoding,
    WrongValue,
    NoCreation,
    InconsistentValue,
    ResourceUnavailable,
    CommitFailed,
    UndoFailed,
    AuthorizationError,
    NotWritable,
    InconsistentName,
    /// Status codes outside RFC 3416.
    Unknown(i32),
}

impl ErrorStatus {
    /// Create from the raw wire value.
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => Self::NoError,
            1 => Self::TooBig,
            2 => Self::NoSuchName,
            3 => Self::BadValue,
            4 => Self::ReadOnly,
            5 => Self::GenErr,
            6 => Self::NoAccess,
            7 => Self::WrongType,
            8 => Self::WrongLength,
            9 => Self::WrongEncoding,
            10 => Self::WrongValue,
            11 => Self::NoCreation,
            12 => Self::InconsistentValue,
            13 => Self::ResourceUnavailable,
            14 => Self::CommitFailed,
            15 => Self::UndoFailed,
            16 => Self::AuthorizationError,
            17 => Self::NotWritable,
            18 => Self::InconsistentName,
            other => Self::Unknown(other),
        }
    }

    /// Raw wire value.
    pub fn as_i32(self) -> i32 {
        match self {
            Self::NoError => 0,
            Self::TooBig => 1,
            Self::NoSuchName => 2,
            Self::BadValue => 3,
            Self::ReadOnly => 4,
            Self::GenErr => 5,
            Self::NoAccess => 6,
            Self::WrongType => 7,
            Self::WrongLength => 8,
            Self::WrongEncoding => 9,
            Self::WrongValue => 10,
            Self::NoCreation => 11,
            Self::InconsistentValue => 12,
            Self::ResourceUnavailable => 13,
            Self::CommitFailed => 14,
            Self::UndoFailed => 15,
            Self::AuthorizationError => 16,
            Self::NotWritable => 17,
            Self::InconsistentName => 18,
            Self::Unknown(code) => code,
        }
    }

    /// Human-readable description used in error output.
    pub fn description(&self) -> String {
        match self {
            Self::NoError => "No error".into(),
            Self::TooBig => "Response too big".into(),
            Self::NoSuchName => "No such object".into(),
            Self::BadValue => "Bad value".into(),
            Self::ReadOnly => "Read only".into(),
            Self::GenErr => "Generic error".into(),
            Self::NoAccess => "Access denied".into(),
            Self::WrongType => "Wrong type".into(),
            Self::WrongLength => "Wrong length".into(),
            Self::WrongEncoding => "Wrong encoding".into(),
            Self::WrongValue => "Wrong value".into(),
            Self::NoCreation => "Can't be created".into(),
            Self::InconsistentValue => "Inconsistent value".into(),
            Self::ResourceUnavailable => "Resource unavailable".into(),
            Self::CommitFailed => "Commit failed".into(),
            Self::UndoFailed => "Undo failed".into(),
            Self::AuthorizationError => "Authorization error".into(),
            Self::NotWritable => "Not writable".into(),
            Self::InconsistentName => "Inconsistent name".into(),
            Self::Unknown(code) => format!("Unknown error ({code})"),
        }
    }
}

impl std::fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoError => write!(f, "noError"),
            Self::TooBig => write!(f, "tooBig"),
            Self::NoSuchName => write!(f, "noSuchName"),
            Self::BadValue => write!(f, "badValue"),
            Self::ReadOnly => write!(f, "readOnly"),
            Self::GenErr => write!(f, "genErr"),
            Self::NoAccess => write!(f, "noAccess"),
            Self::WrongType => write!(f, "wrongType"),
            Self::WrongLength => write!(f, "wrongLength"),
            Self::WrongEncoding => write!(f, "wrongEncoding"),
            Self::WrongValue => write!(f, "wrongValue"),
            Self::NoCreation => write!(f, "noCreation"),
            Self::InconsistentValue => write!(f, "inconsistentValue"),
            Self::ResourceUnavailable => write!(f, "resourceUnavailable"),
            Self::CommitFailed => write!(f, "commitFailed"),
            Self::UndoFailed => write!(f, "undoFailed"),
            Self::AuthorizationError => write!(f, "authorizationError"),
            Self::NotWritable => write!(f, "notWritable"),
            Self::InconsistentName => write!(f, "inconsistentName"),
            Self::Unknown(code) => write!(f, "unknown({code})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrip() {
        for code in 0..=18 {
            assert_eq!(ErrorStatus::from_i32(code).as_i32(), code);
        }
        assert_eq!(ErrorStatus::from_i32(99), ErrorStatus::Unknown(99));
    }

    #[test]
    fn version_error_message() {
        assert_eq!(
            Error::Version.to_string(),
            "Cannot send V2 PDU on V1 session"
        );
    }

    #[test]
    fn snmp_error_message() {
        let err = Error::Snmp {
            status: ErrorStatus::TooBig,
            oid: "1.3.6.1".into(),
        };
        assert_eq!(err.to_string(), "Can't parse oid 1.3.6.1: Response too big");
    }

    #[test]
    fn not_increasing_message() {
        assert_eq!(Error::NotIncreasing.to_string(), "OID not increasing");
    }

    #[test]
    fn every_status_describes_distinctly() {
        let mut seen = std::collections::HashSet::new();
        for code in 0..=18 {
            assert!(seen.insert(ErrorStatus::from_i32(code).description()));
        }
    }
}
