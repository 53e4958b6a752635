//! Tag-length-value primitives
//!
//! Protobuf-compatible field keys, varints and length-delimited payloads.
//! Nothing here knows about `PreSigningOutput`; see `codec::mod` for that.

use crate::error::{DecodeError, MalformedReason};

/// Largest field number a key may carry (2^29 - 1)
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// Longest legal varint encoding of a 64-bit value
const MAX_VARINT_LEN: usize = 10;

/// How a field's payload is laid out on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    Varint = 0,
    Fixed64 = 1,
    LengthDelimited = 2,
    Fixed32 = 5,
}

impl WireType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Varint),
            1 => Some(Self::Fixed64),
            2 => Some(Self::LengthDelimited),
            5 => Some(Self::Fixed32),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

// =============================================================================
// Encoding
// =============================================================================

pub fn encode_varint(mut value: u64, buf: &mut Vec<u8>) {
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf.push(byte);
        if value == 0 {
            break;
        }
    }
}

/// Number of bytes `encode_varint` emits for `value`
pub fn varint_len(value: u64) -> usize {
    let bits = 64 - (value | 1).leading_zeros() as usize;
    bits.div_ceil(7)
}

pub fn encode_key(field: u32, wire_type: WireType, buf: &mut Vec<u8>) {
    encode_varint(((field as u64) << 3) | wire_type.as_u8() as u64, buf);
}

/// `int32` values are sign-extended, so negatives always take 10 bytes
pub fn encode_int32(field: u32, value: i32, buf: &mut Vec<u8>) {
    encode_key(field, WireType::Varint, buf);
    encode_varint(value as i64 as u64, buf);
}

pub fn encode_bytes(field: u32, value: &[u8], buf: &mut Vec<u8>) {
    encode_key(field, WireType::LengthDelimited, buf);
    encode_varint(value.len() as u64, buf);
    buf.extend_from_slice(value);
}

// =============================================================================
// Decoding
// =============================================================================

/// A field key read off the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldKey {
    pub field: u32,
    pub wire_type: WireType,
}

/// Cursor over an encoded message
#[derive(Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_varint(&mut self) -> Result<u64, DecodeError> {
        let start = self.pos;
        let mut value: u64 = 0;

        for i in 0..MAX_VARINT_LEN {
            let byte = *self.buf.get(self.pos).ok_or(DecodeError::Truncated {
                offset: start,
                needed: i + 1,
                available: i,
            })?;
            self.pos += 1;

            // The tenth byte may only contribute bit 63
            if i == MAX_VARINT_LEN - 1 && byte > 0x01 {
                return Err(DecodeError::Malformed {
                    offset: start,
                    reason: MalformedReason::VarintOverflow,
                });
            }

            value |= ((byte & 0x7f) as u64) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }

        Err(DecodeError::Malformed {
            offset: start,
            reason: MalformedReason::VarintOverflow,
        })
    }

    pub fn read_key(&mut self) -> Result<FieldKey, DecodeError> {
        let offset = self.pos;
        let raw = self.read_varint()?;

        let field = raw >> 3;
        if field == 0 || field > MAX_FIELD_NUMBER as u64 {
            return Err(DecodeError::Malformed {
                offset,
                reason: MalformedReason::InvalidFieldNumber(field),
            });
        }

        let wire_bits = (raw & 0x07) as u8;
        let wire_type = WireType::from_u8(wire_bits).ok_or(DecodeError::Malformed {
            offset,
            reason: MalformedReason::UnsupportedWireType(wire_bits),
        })?;

        Ok(FieldKey {
            field: field as u32,
            wire_type,
        })
    }

    /// Take exactly `len` bytes, failing with `Truncated` if fewer remain
    pub fn read_exact(&mut self, len: u64) -> Result<&'a [u8], DecodeError> {
        let available = self.remaining();
        if len > available as u64 {
            return Err(DecodeError::Truncated {
                offset: self.pos,
                needed: usize::try_from(len).unwrap_or(usize::MAX),
                available,
            });
        }
        let len = len as usize;
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn read_length_delimited(&mut self) -> Result<&'a [u8], DecodeError> {
        let len = self.read_varint()?;
        self.read_exact(len)
    }

    /// Consume the payload of a field whose key was just read
    pub fn skip_value(&mut self, wire_type: WireType) -> Result<(), DecodeError> {
        match wire_type {
            WireType::Varint => self.read_varint().map(|_| ()),
            WireType::Fixed64 => self.read_exact(8).map(|_| ()),
            WireType::Fixed32 => self.read_exact(4).map(|_| ()),
            WireType::LengthDelimited => self.read_length_delimited().map(|_| ()),
        }
    }

    /// Bytes between `start` and the current position
    pub fn slice_from(&self, start: usize) -> &'a [u8] {
        &self.buf[start..self.pos]
    }
}
