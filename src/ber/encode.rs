//! BER encoding.
//!
//! Writes from the end backwards: content first, then length, then tag.
//! `finish()` reverses the buffer into wire order.

use super::length::encode_length;
use super::tag;
use bytes::Bytes;

/// Reverse-order BER encode buffer.
pub struct EncodeBuf {
    buf: Vec<u8>,
}

impl EncodeBuf {
    /// Create a buffer with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(512)
    }

    /// Create a buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Push raw bytes (they will appear in the given order on the wire).
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend(bytes.iter().rev());
    }

    /// Push a length field.
    pub fn push_length(&mut self, len: usize) {
        let (bytes, count) = encode_length(len);
        self.buf.extend_from_slice(&bytes[..count]);
    }

    /// Push a tag octet.
    pub fn push_tag(&mut self, tag: u8) {
        self.buf.push(tag);
    }

    /// Current number of encoded octets.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True when nothing has been encoded.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Encode a constructed element: the closure pushes the content (fields
    /// in reverse order), then length and tag are wrapped around it.
    pub fn push_constructed<F>(&mut self, tag: u8, f: F)
    where
        F: FnOnce(&mut Self),
    {
        let start = self.len();
        f(self);
        let content_len = self.len() - start;
        self.push_length(content_len);
        self.push_tag(tag);
    }

    /// Encode a SEQUENCE.
    pub fn push_sequence<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.push_constructed(tag::universal::SEQUENCE, f);
    }

    /// Encode an INTEGER in minimal two's-complement form.
    pub fn push_integer(&mut self, value: i64) {
        let (arr, len) = integer_content(value);
        self.push_bytes(&arr[8 - len..]);
        self.push_length(len);
        self.push_tag(tag::universal::INTEGER);
    }

    /// Encode an application-class unsigned 32-bit value (Counter32,
    /// Gauge32, TimeTicks). Never emits content that would read back
    /// negative: a 0x00 pad octet precedes a set MSB.
    pub fn push_unsigned32(&mut self, tag: u8, value: u32) {
        let (arr, len) = unsigned_content(u64::from(value));
        self.push_bytes(&arr[9 - len..]);
        self.push_length(len);
        self.push_tag(tag);
    }

    /// Encode a Counter64.
    pub fn push_counter64(&mut self, value: u64) {
        let (arr, len) = unsigned_content(value);
        self.push_bytes(&arr[9 - len..]);
        self.push_length(len);
        self.push_tag(tag::application::COUNTER64);
    }

    /// Encode an OCTET STRING.
    pub fn push_octet_string(&mut self, data: &[u8]) {
        self.push_bytes(data);
        self.push_length(data.len());
        self.push_tag(tag::universal::OCTET_STRING);
    }

    /// Encode an Opaque.
    pub fn push_opaque(&mut self, data: &[u8]) {
        self.push_bytes(data);
        self.push_length(data.len());
        self.push_tag(tag::application::OPAQUE);
    }

    /// Encode a NULL.
    pub fn push_null(&mut self) {
        self.push_length(0);
        self.push_tag(tag::universal::NULL);
    }

    /// Encode a zero-length element with the given tag (exception markers).
    pub fn push_empty(&mut self, tag: u8) {
        self.push_length(0);
        self.push_tag(tag);
    }

    /// Encode an OBJECT IDENTIFIER.
    pub fn push_oid(&mut self, oid: &crate::oid::Oid) {
        let ber = oid.to_ber();
        self.push_bytes(&ber);
        self.push_length(ber.len());
        self.push_tag(tag::universal::OBJECT_IDENTIFIER);
    }

    /// Encode an IpAddress (APPLICATION 0, 4 octets).
    pub fn push_ip_address(&mut self, addr: [u8; 4]) {
        self.push_bytes(&addr);
        self.push_length(4);
        self.push_tag(tag::application::IP_ADDRESS);
    }

    /// Finalize into wire-order bytes.
    pub fn finish(mut self) -> Bytes {
        self.buf.reverse();
        Bytes::from(self.buf)
    }

    /// Finalize into a `Vec<u8>`.
    pub fn finish_vec(mut self) -> Vec<u8> {
        self.buf.reverse();
        self.buf
    }
}

impl Default for EncodeBuf {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimal two's-complement content for a signed integer.
///
/// Valid octets sit at the end of the returned array.
#[inline]
fn integer_content(value: i64) -> ([u8; 8], usize) {
    let bytes = value.to_be_bytes();
    let mut start = 0;
    if value >= 0 {
        while start < 7 && bytes[start] == 0 && bytes[start + 1] & 0x80 == 0 {
            start += 1;
        }
    } else {
        while start < 7 && bytes[start] == 0xFF && bytes[start + 1] & 0x80 != 0 {
            start += 1;
        }
    }
    (bytes, 8 - start)
}

/// Minimal unsigned content with a sign-guard pad octet when needed.
///
/// Valid octets sit at the end of the returned array.
#[inline]
fn unsigned_content(value: u64) -> ([u8; 9], usize) {
    if value == 0 {
        return ([0; 9], 1);
    }

    let bytes = value.to_be_bytes();
    let mut start = 0;
    while start < 7 && bytes[start] == 0 {
        start += 1;
    }

    let mut out = [0u8; 9];
    out[1..].copy_from_slice(&bytes);
    if bytes[start] & 0x80 != 0 {
        // Keep a 0x00 pad so the value does not read back negative
        (out, 9 - start)
    } else {
        (out, 8 - start)
    }
}
