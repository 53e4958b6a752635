//! PreSigningOutput Encoding
//!
//! Canonical tag-length-value encoding, byte-compatible with the protobuf
//! message `TW.TxCompiler.Proto.PreSigningOutput`:
//!
//! | tag | field      | wire type        |
//! |-----|------------|------------------|
//! | 1   | data_hash  | length-delimited |
//! | 2   | data       | length-delimited |
//! | 3   | error_code | varint (int32)   |
//! | 4   | error      | length-delimited |
//!
//! Encoding writes known fields in tag order, omits zero/empty values, then
//! appends any retained unknown fields. Decoding accepts fields in any order;
//! the last occurrence of a repeated field wins.
//!
//! Wire types of known tags come from the revision held by
//! [`SchemaRegistry::global`], resolved once per process. The global registry
//! is read-only; [`SchemaRegistry::upgrade`] acts on owned registries only.

pub mod config;
pub mod schema;
pub mod wire;

pub use config::{DecoderConfig, UnknownFieldPolicy};
pub use schema::{
    check_evolution, FieldDescriptor, FieldKind, SchemaDescriptor, SchemaRegistry,
    PRE_SIGNING_OUTPUT_SCHEMA,
};

use crate::error::{DecodeError, MalformedReason};
use crate::log_debug;
use crate::signing::output::{PreSigningOutput, UnknownField, UnknownFields};
use schema::{DATA_HASH_TAG, DATA_TAG, ERROR_CODE_TAG, ERROR_TAG};
use wire::{FieldKey, Reader};

lazy_static::lazy_static! {
    static ref ACTIVE_SCHEMA: SchemaDescriptor = SchemaRegistry::global()
        .get(&PRE_SIGNING_OUTPUT_SCHEMA.identity())
        .copied()
        .unwrap_or(PRE_SIGNING_OUTPUT_SCHEMA);
}

/// Revision of `PreSigningOutput` the decoder checks known tags against
pub fn active_schema() -> &'static SchemaDescriptor {
    &ACTIVE_SCHEMA
}

/// Size in bytes of `encode(output)`
pub fn encoded_len(output: &PreSigningOutput) -> usize {
    fn bytes_field_len(field: u32, len: usize) -> usize {
        key_len(field) + wire::varint_len(len as u64) + len
    }
    fn key_len(field: u32) -> usize {
        wire::varint_len((field as u64) << 3)
    }

    let mut len = 0;
    if !output.data_hash().is_empty() {
        len += bytes_field_len(DATA_HASH_TAG, output.data_hash().len());
    }
    if !output.data().is_empty() {
        len += bytes_field_len(DATA_TAG, output.data().len());
    }
    if output.error_code() != 0 {
        len += key_len(ERROR_CODE_TAG) + wire::varint_len(output.error_code() as i64 as u64);
    }
    if !output.error().is_empty() {
        len += bytes_field_len(ERROR_TAG, output.error().len());
    }
    len + output.unknown_fields().encoded_len()
}

/// Deterministic encoding; the default value encodes to zero bytes
pub fn encode(output: &PreSigningOutput) -> Vec<u8> {
    let mut buf = Vec::with_capacity(encoded_len(output));

    if !output.data_hash().is_empty() {
        wire::encode_bytes(DATA_HASH_TAG, output.data_hash(), &mut buf);
    }
    if !output.data().is_empty() {
        wire::encode_bytes(DATA_TAG, output.data(), &mut buf);
    }
    if output.error_code() != 0 {
        wire::encode_int32(ERROR_CODE_TAG, output.error_code(), &mut buf);
    }
    if !output.error().is_empty() {
        wire::encode_bytes(ERROR_TAG, output.error().as_bytes(), &mut buf);
    }
    for field in output.unknown_fields().iter() {
        buf.extend_from_slice(field.raw());
    }

    buf
}

/// Decode with [`DecoderConfig::default`]
pub fn decode(bytes: &[u8]) -> Result<PreSigningOutput, DecodeError> {
    decode_with(bytes, &DecoderConfig::default())
}

/// Parse an encoded output. A nonzero `error_code` is a valid payload, not a
/// decode failure, and the success/payload invariant is not checked here.
pub fn decode_with(bytes: &[u8], config: &DecoderConfig) -> Result<PreSigningOutput, DecodeError> {
    if let Some(limit) = config.max_message_len {
        if bytes.len() > limit {
            return Err(DecodeError::MessageTooLarge {
                size: bytes.len(),
                limit,
            });
        }
    }

    let mut reader = Reader::new(bytes);
    let mut data_hash: &[u8] = &[];
    let mut data: &[u8] = &[];
    let mut error_code: i32 = 0;
    let mut error = String::new();
    let mut unknown = UnknownFields::default();

    while !reader.is_empty() {
        let start = reader.position();
        let key = reader.read_key()?;

        match key.field {
            DATA_HASH_TAG => {
                expect_wire_type(key, start)?;
                data_hash = reader.read_length_delimited()?;
            }
            DATA_TAG => {
                expect_wire_type(key, start)?;
                data = reader.read_length_delimited()?;
            }
            ERROR_CODE_TAG => {
                expect_wire_type(key, start)?;
                // int32 on the wire: keep the low 32 bits of the varint
                error_code = reader.read_varint()? as i32;
            }
            ERROR_TAG => {
                expect_wire_type(key, start)?;
                let value_offset = reader.position();
                let raw = reader.read_length_delimited()?;
                error = std::str::from_utf8(raw)
                    .map_err(|_| DecodeError::Malformed {
                        offset: value_offset,
                        reason: MalformedReason::InvalidUtf8 { field: ERROR_TAG },
                    })?
                    .to_owned();
            }
            other => {
                reader.skip_value(key.wire_type)?;
                log_debug!(
                    "codec",
                    "Skipped unknown field",
                    field = other,
                    wire_type = key.wire_type.as_u8(),
                    field_len = reader.position() - start,
                );
                if config.retains_unknown() {
                    unknown.push(UnknownField::new(
                        other,
                        key.wire_type,
                        reader.slice_from(start).to_vec(),
                    ));
                }
            }
        }
    }

    Ok(PreSigningOutput::new(data_hash, data, error_code, error).with_unknown_fields(unknown))
}

/// Known tags must arrive with the wire type their schema declares
fn expect_wire_type(key: FieldKey, offset: usize) -> Result<(), DecodeError> {
    let expected = active_schema()
        .field(key.field)
        .map(|descriptor| descriptor.kind.wire_type())
        .unwrap_or(key.wire_type);

    if key.wire_type == expected {
        return Ok(());
    }
    Err(DecodeError::Malformed {
        offset,
        reason: MalformedReason::WireTypeMismatch {
            field: key.field,
            expected: expected.as_u8(),
            found: key.wire_type.as_u8(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wire::WireType;

    #[test]
    fn test_default_encodes_empty() {
        let output = PreSigningOutput::default();
        assert!(encode(&output).is_empty());
        assert_eq!(decode(&[]).unwrap(), output);
    }

    #[test]
    fn test_success_bytes() {
        let output = PreSigningOutput::success(vec![0xaa, 0xbb], vec![0x11, 0x22, 0x33, 0x44, 0x55]);
        let bytes = encode(&output);
        assert_eq!(hex::encode(&bytes), "0a02aabb12051122334455");
        assert_eq!(encoded_len(&output), bytes.len());
        assert_eq!(decode(&bytes).unwrap(), output);
    }

    #[test]
    fn test_failure_bytes() {
        let output = PreSigningOutput::new(vec![], vec![], 1, "invalid amount");
        let bytes = encode(&output);
        assert_eq!(hex::encode(&bytes), "1801220e696e76616c696420616d6f756e74");
        assert_eq!(decode(&bytes).unwrap(), output);
    }

    #[test]
    fn test_negative_error_code() {
        let output = PreSigningOutput::new(vec![], vec![], -2, "");
        let bytes = encode(&output);
        assert_eq!(bytes.len(), 11);
        assert_eq!(encoded_len(&output), 11);
        assert_eq!(decode(&bytes).unwrap().error_code(), -2);
    }

    #[test]
    fn test_fields_in_any_order() {
        // error (4), error_code (3), data (2), data_hash (1)
        let mut bytes = Vec::new();
        wire::encode_bytes(ERROR_TAG, b"x", &mut bytes);
        wire::encode_int32(ERROR_CODE_TAG, 5, &mut bytes);
        wire::encode_bytes(DATA_TAG, &[1, 2], &mut bytes);
        wire::encode_bytes(DATA_HASH_TAG, &[0xa1], &mut bytes);

        let output = decode(&bytes).unwrap();
        assert_eq!(output, PreSigningOutput::new(vec![0xa1], vec![1, 2], 5, "x"));
        // Re-encoding canonicalises the order
        assert_eq!(encode(&output)[0], 0x0a);
    }

    #[test]
    fn test_last_occurrence_wins() {
        let mut bytes = Vec::new();
        wire::encode_int32(ERROR_CODE_TAG, 1, &mut bytes);
        wire::encode_int32(ERROR_CODE_TAG, 9, &mut bytes);
        assert_eq!(decode(&bytes).unwrap().error_code(), 9);
    }

    #[test]
    fn test_explicit_zero_values_decode() {
        // Non-canonical but legal: explicit empty/zero fields
        let bytes = [0x0a, 0x00, 0x18, 0x00, 0x22, 0x00];
        assert_eq!(decode(&bytes).unwrap(), PreSigningOutput::default());
    }

    #[test]
    fn test_unknown_field_discarded_by_default() {
        let mut bytes = encode(&PreSigningOutput::success(vec![1], vec![2]));
        wire::encode_bytes(9, b"future", &mut bytes);

        let output = decode(&bytes).unwrap();
        assert_eq!(output.data_hash(), &[1]);
        assert_eq!(output.data(), &[2]);
        assert!(output.unknown_fields().is_empty());
    }

    #[test]
    fn test_unknown_fields_retained() {
        let mut bytes = encode(&PreSigningOutput::new(vec![1], vec![2], 0, ""));
        wire::encode_bytes(9, b"future", &mut bytes);
        wire::encode_key(10, WireType::Varint, &mut bytes);
        wire::encode_varint(300, &mut bytes);
        wire::encode_key(11, WireType::Fixed32, &mut bytes);
        bytes.extend_from_slice(&[1, 2, 3, 4]);
        wire::encode_key(12, WireType::Fixed64, &mut bytes);
        bytes.extend_from_slice(&[0; 8]);

        let output = decode_with(&bytes, &DecoderConfig::round_trip()).unwrap();
        let numbers: Vec<u32> = output.unknown_fields().iter().map(|f| f.number()).collect();
        assert_eq!(numbers, vec![9, 10, 11, 12]);
        assert_eq!(output.unknown_fields().iter().next().unwrap().wire_type(), WireType::LengthDelimited);
        assert_eq!(encode(&output), bytes);
        assert_eq!(encoded_len(&output), bytes.len());
    }

    #[test]
    fn test_truncated_length() {
        // data_hash claims 10 bytes, 3 supplied
        let err = decode(&[0x0a, 0x0a, 0x01, 0x02, 0x03]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::Truncated {
                offset: 2,
                needed: 10,
                available: 3,
            }
        );
    }

    #[test]
    fn test_truncated_key_value() {
        // error_code key with no value
        assert!(decode(&[0x18]).unwrap_err().is_truncated());
        // unknown fixed64 with 2 of 8 bytes
        assert!(decode(&[0x29, 0x00, 0x00]).unwrap_err().is_truncated());
    }

    #[test]
    fn test_known_tags_resolve_through_registry() {
        let registered = SchemaRegistry::global()
            .get("TW.TxCompiler.Proto.PreSigningOutput")
            .expect("builtin schema registered");
        assert_eq!(active_schema(), registered);
        for tag in [DATA_HASH_TAG, DATA_TAG, ERROR_CODE_TAG, ERROR_TAG] {
            assert!(active_schema().field(tag).is_some(), "tag {}", tag);
        }
    }

    #[test]
    fn test_wire_type_mismatch() {
        // error_code sent as length-delimited
        let err = decode(&[0x1a, 0x01, 0x00]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::Malformed {
                offset: 0,
                reason: MalformedReason::WireTypeMismatch {
                    field: 3,
                    expected: 0,
                    found: 2,
                },
            }
        );
    }

    #[test]
    fn test_invalid_utf8_error_text() {
        let err = decode(&[0x22, 0x02, 0xc3, 0x28]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::Malformed {
                offset: 1,
                reason: MalformedReason::InvalidUtf8 { field: 4 },
            }
        );
    }

    #[test]
    fn test_bad_continuation_bits() {
        let mut bytes = vec![0x18];
        bytes.extend_from_slice(&[0xff; 11]);
        assert!(decode(&bytes).unwrap_err().is_malformed());
    }

    #[test]
    fn test_message_size_limit() {
        let bytes = encode(&PreSigningOutput::success(vec![0; 32], vec![0; 100]));
        let err = decode_with(&bytes, &DecoderConfig::strict(64)).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MessageTooLarge {
                size: bytes.len(),
                limit: 64,
            }
        );
        assert!(decode_with(&bytes, &DecoderConfig::strict(bytes.len())).is_ok());
    }
}
