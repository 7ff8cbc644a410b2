//! SNMP protocol version.

/// SNMP protocol version (community-based only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Version {
    /// SNMPv1 (RFC 1157)
    V1,
    /// SNMPv2c (RFC 1901/3416)
    #[default]
    V2c,
}

impl Version {
    /// Wire value carried in the message envelope (0 for v1, 1 for v2c).
    pub const fn as_i32(self) -> i32 {
        match self {
            Version::V1 => 0,
            Version::V2c => 1,
        }
    }

    /// Create from the wire value.
    pub const fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Version::V1),
            1 => Some(Version::V2c),
            _ => None,
        }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Version::V1 => write!(f, "SNMPv1"),
            Version::V2c => write!(f, "SNMPv2c"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_values() {
        assert_eq!(Version::V1.as_i32(), 0);
        assert_eq!(Version::V2c.as_i32(), 1);
        assert_eq!(Version::from_i32(0), Some(Version::V1));
        assert_eq!(Version::from_i32(1), Some(Version::V2c));
        assert_eq!(Version::from_i32(3), None);
    }
}
