//! Object Identifier (OID) type.
//!
//! OIDs are stored as `SmallVec<[u32; 16]>` to avoid heap allocation for
//! common OIDs. Symbolic parsing lives on the MIB ([`crate::mib::Mib`]);
//! this module handles the numeric form and the wire encoding.

use crate::error::{DecodeErrorKind, Error, Result};
use smallvec::SmallVec;
use std::fmt;

/// Maximum number of subidentifiers allowed in an OID.
///
/// Per RFC 2578 Section 3.5: "there are at most 128 sub-identifiers in a
/// value". Enforced during BER decoding.
pub const MAX_OID_LEN: usize = 128;

/// Object Identifier: an ordered sequence of subidentifiers.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Oid {
    arcs: SmallVec<[u32; 16]>,
}

/// Outcome of comparing two OIDs in MIB order.
///
/// `AncestorOf` means `self` is a strict prefix of the other OID (the other
/// lies inside `self`'s subtree); `DescendantOf` is the converse. `depth` is
/// the number of extra subidentifiers on the longer side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OidRelation {
    /// `self` sorts before the other OID and is not a prefix of it.
    Less,
    /// Identical.
    Equal,
    /// `self` sorts after the other OID and is not an extension of it.
    Greater,
    /// `self` is a strict prefix of the other OID.
    AncestorOf { depth: usize },
    /// The other OID is a strict prefix of `self`.
    DescendantOf { depth: usize },
}

impl OidRelation {
    /// The relation seen from the other operand's side.
    pub fn flip(self) -> Self {
        match self {
            Self::Less => Self::Greater,
            Self::Greater => Self::Less,
            Self::Equal => Self::Equal,
            Self::AncestorOf { depth } => Self::DescendantOf { depth },
            Self::DescendantOf { depth } => Self::AncestorOf { depth },
        }
    }
}

impl Oid {
    /// Create an empty OID.
    pub fn empty() -> Self {
        Self {
            arcs: SmallVec::new(),
        }
    }

    /// Create an OID from arc values.
    pub fn new(arcs: impl IntoIterator<Item = u32>) -> Self {
        Self {
            arcs: arcs.into_iter().collect(),
        }
    }

    /// Create an OID from a slice of arcs.
    pub fn from_slice(arcs: &[u32]) -> Self {
        Self {
            arcs: SmallVec::from_slice(arcs),
        }
    }

    /// Parse a purely numeric OID (`1.3.6.1.2.1` or `.1.3.6.1.2.1`).
    ///
    /// A leading dot is permitted and ignored. Symbolic and mixed forms are
    /// handled by [`crate::mib::Mib::parse_oid`].
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.strip_prefix('.').unwrap_or(s);
        if s.is_empty() {
            return Err(Error::UnknownName {
                name: String::new(),
            });
        }

        let mut arcs = SmallVec::new();
        for part in s.split('.') {
            let arc: u32 = part.parse().map_err(|_| Error::UnknownName {
                name: s.to_string(),
            })?;
            arcs.push(arc);
        }
        Ok(Self { arcs })
    }

    /// Get the arc values.
    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    /// Number of arcs.
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// True when the OID has no arcs.
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Create a child OID by appending an arc.
    pub fn child(&self, arc: u32) -> Oid {
        let mut arcs = self.arcs.clone();
        arcs.push(arc);
        Oid { arcs }
    }

    /// Whether `self` begins with all arcs of `prefix`.
    pub fn starts_with(&self, prefix: &Oid) -> bool {
        self.arcs.len() >= prefix.arcs.len() && self.arcs[..prefix.arcs.len()] == prefix.arcs[..]
    }

    /// Five-way comparison in MIB (lexicographic) order.
    ///
    /// The walk engine depends on the prefix cases: a subtree walk continues
    /// only while `start.relation(name)` is [`OidRelation::AncestorOf`].
    pub fn relation(&self, other: &Oid) -> OidRelation {
        let min = self.arcs.len().min(other.arcs.len());
        for i in 0..min {
            if self.arcs[i] < other.arcs[i] {
                return OidRelation::Less;
            }
            if self.arcs[i] > other.arcs[i] {
                return OidRelation::Greater;
            }
        }
        match self.arcs.len().cmp(&other.arcs.len()) {
            std::cmp::Ordering::Equal => OidRelation::Equal,
            std::cmp::Ordering::Less => OidRelation::AncestorOf {
                depth: other.arcs.len() - self.arcs.len(),
            },
            std::cmp::Ordering::Greater => OidRelation::DescendantOf {
                depth: self.arcs.len() - other.arcs.len(),
            },
        }
    }

    /// Encode the arc content to BER (X.690 Section 8.19).
    ///
    /// The first two arcs pack into one subidentifier as `40 * a + b`; each
    /// subidentifier is base-128 with the continuation bit on all but the
    /// last octet.
    pub fn to_ber(&self) -> SmallVec<[u8; 64]> {
        let mut bytes = SmallVec::new();

        match self.arcs.len() {
            0 => return bytes,
            1 => encode_subid(&mut bytes, self.arcs[0] * 40),
            _ => encode_subid(&mut bytes, self.arcs[0] * 40 + self.arcs[1]),
        }
        for &arc in self.arcs.iter().skip(2) {
            encode_subid(&mut bytes, arc);
        }
        bytes
    }

    /// Decode arc content from BER. Enforces [`MAX_OID_LEN`].
    pub fn from_ber(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Ok(Self::empty());
        }

        let mut arcs = SmallVec::new();

        let (first, consumed) = decode_subid(data)?;
        if first < 40 {
            arcs.push(0);
            arcs.push(first);
        } else if first < 80 {
            arcs.push(1);
            arcs.push(first - 40);
        } else {
            arcs.push(2);
            arcs.push(first - 80);
        }

        let mut i = consumed;
        while i < data.len() {
            let (arc, n) = decode_subid(&data[i..])?;
            arcs.push(arc);
            i += n;
            if arcs.len() > MAX_OID_LEN {
                return Err(Error::decode(
                    i,
                    DecodeErrorKind::OidTooLong { count: arcs.len() },
                ));
            }
        }

        Ok(Self { arcs })
    }
}

/// Encode one subidentifier in base-128.
#[inline]
fn encode_subid(bytes: &mut SmallVec<[u8; 64]>, value: u32) {
    if value == 0 {
        bytes.push(0);
        return;
    }

    let mut groups = 0;
    let mut tmp = value;
    while tmp > 0 {
        groups += 1;
        tmp >>= 7;
    }
    for i in (0..groups).rev() {
        let mut byte = ((value >> (i * 7)) & 0x7F) as u8;
        if i > 0 {
            byte |= 0x80;
        }
        bytes.push(byte);
    }
}

/// Decode one subidentifier, returning `(value, octets_consumed)`.
fn decode_subid(data: &[u8]) -> Result<(u32, usize)> {
    let mut value: u32 = 0;
    let mut i = 0;

    loop {
        if i >= data.len() {
            return Err(Error::decode(i, DecodeErrorKind::Truncated));
        }
        let byte = data[i];
        i += 1;

        if value > (u32::MAX >> 7) {
            return Err(Error::decode(i, DecodeErrorKind::SubidOverflow));
        }
        value = (value << 7) | u32::from(byte & 0x7F);

        if byte & 0x80 == 0 {
            break;
        }
    }
    Ok((value, i))
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for arc in &self.arcs {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{}", arc)?;
            first = false;
        }
        Ok(())
    }
}

impl std::str::FromStr for Oid {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<&[u32]> for Oid {
    fn from(arcs: &[u32]) -> Self {
        Self::from_slice(arcs)
    }
}

impl<const N: usize> From<[u32; N]> for Oid {
    fn from(arcs: [u32; N]) -> Self {
        Self::new(arcs)
    }
}

impl PartialOrd for Oid {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Oid {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.arcs.cmp(&other.arcs)
    }
}

/// Build an OID from literal arcs.
///
/// ```
/// use snmpc::oid;
///
/// let sys_descr = oid!(1, 3, 6, 1, 2, 1, 1, 1, 0);
/// assert_eq!(sys_descr.to_string(), "1.3.6.1.2.1.1.1.0");
/// ```
#[macro_export]
macro_rules! oid {
    ($($arc:expr),* $(,)?) => {
        $crate::oid::Oid::from_slice(&[$($arc),*])
    };
}
