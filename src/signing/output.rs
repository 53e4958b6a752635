//! Pre-Signing Output
//!
//! The result of one compilation attempt: the pre-image to sign, its digest,
//! and a success/failure status. Built once by a chain compiler, consumed once
//! by a signer or an error handler.

use crate::codec::{self, wire::WireType, DecoderConfig};
use crate::error::{DecodeError, ValidationError};
use crate::signing::codes::SigningErrorCode;
use crate::signing::hashing::HashAlgorithm;
use crate::signing::validate;

/// Transaction pre-signing output
///
/// Fields are private; the value never changes after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreSigningOutput {
    data_hash: Vec<u8>,
    data: Vec<u8>,
    error_code: i32,
    error: String,
    unknown_fields: UnknownFields,
}

impl PreSigningOutput {
    /// Build from raw parts. No validation happens here; see [`Self::validate`].
    pub fn new(
        data_hash: impl Into<Vec<u8>>,
        data: impl Into<Vec<u8>>,
        error_code: i32,
        error: impl Into<String>,
    ) -> Self {
        Self {
            data_hash: data_hash.into(),
            data: data.into(),
            error_code,
            error: error.into(),
            unknown_fields: UnknownFields::default(),
        }
    }

    pub fn success(data_hash: impl Into<Vec<u8>>, data: impl Into<Vec<u8>>) -> Self {
        Self::new(data_hash, data, 0, String::new())
    }

    /// Failure with an empty payload. Empty `error` text falls back to the
    /// catalogue description of `code`. A code that reads as success is
    /// replaced by [`SigningErrorCode::General`].
    pub fn failure(code: SigningErrorCode, error: impl Into<String>) -> Self {
        let code = if code.is_ok() {
            SigningErrorCode::General
        } else {
            code
        };
        let mut error = error.into();
        if error.is_empty() {
            error = code.description().to_string();
        }
        Self::new(Vec::new(), Vec::new(), code.to_i32(), error)
    }

    pub(crate) fn with_unknown_fields(mut self, unknown_fields: UnknownFields) -> Self {
        self.unknown_fields = unknown_fields;
        self
    }

    pub fn data_hash(&self) -> &[u8] {
        &self.data_hash
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn error_code(&self) -> i32 {
        self.error_code
    }

    pub fn error(&self) -> &str {
        &self.error
    }

    /// Fields from a newer schema revision, kept only when decoding with
    /// [`crate::codec::UnknownFieldPolicy::Retain`]
    pub fn unknown_fields(&self) -> &UnknownFields {
        &self.unknown_fields
    }

    pub fn kind(&self) -> SigningErrorCode {
        SigningErrorCode::from_i32(self.error_code)
    }

    /// `error_code == 0`. Says nothing about whether the payload is present;
    /// use [`Self::into_result`] before signing.
    pub fn is_success(&self) -> bool {
        self.error_code == 0
    }

    pub fn encode(&self) -> Vec<u8> {
        codec::encode(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        codec::decode(bytes)
    }

    pub fn decode_with(bytes: &[u8], config: &DecoderConfig) -> Result<Self, DecodeError> {
        codec::decode_with(bytes, config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::validate(self)
    }

    pub fn verify_data_hash(&self, algorithm: HashAlgorithm) -> Result<(), ValidationError> {
        validate::verify_data_hash(self, algorithm)
    }

    /// Hand the payload to a signer, or explain why there is nothing to sign
    pub fn into_result(self) -> Result<PreSigned, CompileFailure> {
        let code = self.kind();
        if !code.is_ok() {
            let message = if self.error.is_empty() {
                code.description().to_string()
            } else {
                self.error
            };
            return Err(CompileFailure { code, message });
        }

        if let Err(violation) = self.validate() {
            return Err(CompileFailure {
                code: SigningErrorCode::Internal,
                message: violation.to_string(),
            });
        }

        Ok(PreSigned {
            data_hash: self.data_hash,
            data: self.data,
        })
    }
}

/// A successful output, ready for a signer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreSigned {
    data_hash: Vec<u8>,
    data: Vec<u8>,
}

impl PreSigned {
    pub fn data_hash(&self) -> &[u8] {
        &self.data_hash
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Check that the digest a signer produced is the one this output promised
    pub fn matches_digest(&self, signed_digest: &[u8]) -> bool {
        self.data_hash == signed_digest
    }

    pub fn into_parts(self) -> (Vec<u8>, Vec<u8>) {
        (self.data_hash, self.data)
    }
}

/// A failed compilation, as seen by the consumer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("compilation failed ({code}): {message}")]
pub struct CompileFailure {
    pub code: SigningErrorCode,
    pub message: String,
}

// =============================================================================
// Unknown fields
// =============================================================================

/// A field this build does not recognise, kept byte-for-byte
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField {
    number: u32,
    wire_type: WireType,
    raw: Vec<u8>,
}

impl UnknownField {
    /// `raw` is the complete encoded field, key included
    pub(crate) fn new(number: u32, wire_type: WireType, raw: Vec<u8>) -> Self {
        Self {
            number,
            wire_type,
            raw,
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn wire_type(&self) -> WireType {
        self.wire_type
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }
}

/// Unknown fields in arrival order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnknownFields {
    fields: Vec<UnknownField>,
}

impl UnknownFields {
    pub(crate) fn push(&mut self, field: UnknownField) {
        self.fields.push(field);
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnknownField> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Total encoded size
    pub fn encoded_len(&self) -> usize {
        self.fields.iter().map(|f| f.raw.len()).sum()
    }
}
