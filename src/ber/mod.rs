//! BER (Basic Encoding Rules) codec for the SNMP subset.
//!
//! Encoding uses a reverse buffer ([`EncodeBuf`]): content is written first,
//! then wrapped with length and tag, so constructed lengths never need to be
//! pre-computed. Decoding ([`Decoder`]) is strict and offset-tracking.

mod decode;
mod encode;
mod length;
pub mod tag;

pub use decode::Decoder;
pub use encode::EncodeBuf;
pub use length::{MAX_LENGTH, decode_length, encode_length};
