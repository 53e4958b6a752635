//! Unified error types for the pre-signing core
//!
//! Compilation failures are *data* carried inside a `PreSigningOutput`
//! (see `signing::codes`). Everything in this module is a *local* failure:
//! bytes that are not a well-formed message, a value that breaks the
//! success/payload invariant, or a schema revision that reuses a tag.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Decode Errors
// =============================================================================

/// Why a byte stream could not be read as a `PreSigningOutput`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// A declared length, varint or field key runs past the end of the input
    #[error("Truncated input at offset {offset}: needed {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Bytes are present but cannot be interpreted as the declared type
    #[error("Malformed input at offset {offset}: {reason}")]
    Malformed {
        offset: usize,
        reason: MalformedReason,
    },

    /// Input exceeds the configured message size limit
    #[error("Message of {size} bytes exceeds the limit of {limit} bytes")]
    MessageTooLarge { size: usize, limit: usize },
}

impl DecodeError {
    pub fn is_truncated(&self) -> bool {
        matches!(self, DecodeError::Truncated { .. })
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, DecodeError::Malformed { .. })
    }

    /// Byte offset where decoding stopped, if known
    pub fn offset(&self) -> Option<usize> {
        match self {
            DecodeError::Truncated { offset, .. } | DecodeError::Malformed { offset, .. } => {
                Some(*offset)
            }
            DecodeError::MessageTooLarge { .. } => None,
        }
    }
}

/// Detail for [`DecodeError::Malformed`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedReason {
    #[error("varint longer than 10 bytes or wider than 64 bits")]
    VarintOverflow,

    #[error("invalid field number {0}")]
    InvalidFieldNumber(u64),

    #[error("unsupported wire type {0}")]
    UnsupportedWireType(u8),

    #[error("field {field} expects wire type {expected}, found {found}")]
    WireTypeMismatch { field: u32, expected: u8, found: u8 },

    #[error("field {field} is not valid UTF-8")]
    InvalidUtf8 { field: u32 },
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Violations of the success/payload invariant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("error_code is 0 but data_hash is empty")]
    MissingDataHash,

    #[error("error_code is 0 but data is empty")]
    MissingData,

    #[error("data_hash does not match the digest of data ({algorithm})")]
    DataHashMismatch { algorithm: String },

    #[error("data_hash is {actual} bytes, {algorithm} produces {expected}")]
    UnsupportedHashLength {
        algorithm: String,
        expected: usize,
        actual: usize,
    },
}

// =============================================================================
// Schema Errors
// =============================================================================

/// Problems registering or evolving a field-tag assignment
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("{schema}: tag {tag} assigned twice")]
    DuplicateTag { schema: String, tag: u32 },

    #[error("{schema}: tag {tag} is outside the valid range")]
    InvalidTag { schema: String, tag: u32 },

    #[error("{schema}: tag {tag} ({name}) was removed")]
    TagRemoved {
        schema: String,
        tag: u32,
        name: &'static str,
    },

    #[error("{schema}: tag {tag} changed meaning from {old} to {new}")]
    TagRepurposed {
        schema: String,
        tag: u32,
        old: String,
        new: String,
    },

    #[error("schema {0} is already registered")]
    DuplicateSchema(String),

    #[error("schema {0} is not registered")]
    UnknownSchema(String),
}

// =============================================================================
// Crate-level error
// =============================================================================

/// Error type surfaced at the crate boundary (CLI, JSON fixtures)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxCompilerError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl TxCompilerError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, msg)
    }
}

impl fmt::Display for TxCompilerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for TxCompilerError {}

/// Error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidInput,

    // Wire errors
    Truncated,
    Malformed,
    MessageTooLarge,

    // Contract errors
    ValidationFailed,
    SchemaViolation,

    // Parse errors
    JsonError,
    HexError,

    Internal,
}

/// Result type alias for crate-boundary operations
pub type TxCompilerResult<T> = Result<T, TxCompilerError>;

impl From<DecodeError> for TxCompilerError {
    fn from(e: DecodeError) -> Self {
        let code = match e {
            DecodeError::Truncated { .. } => ErrorCode::Truncated,
            DecodeError::Malformed { .. } => ErrorCode::Malformed,
            DecodeError::MessageTooLarge { .. } => ErrorCode::MessageTooLarge,
        };
        TxCompilerError::new(code, e.to_string())
    }
}

impl From<ValidationError> for TxCompilerError {
    fn from(e: ValidationError) -> Self {
        TxCompilerError::new(ErrorCode::ValidationFailed, e.to_string())
    }
}

impl From<SchemaError> for TxCompilerError {
    fn from(e: SchemaError) -> Self {
        TxCompilerError::new(ErrorCode::SchemaViolation, e.to_string())
    }
}

impl From<serde_json::Error> for TxCompilerError {
    fn from(e: serde_json::Error) -> Self {
        TxCompilerError::new(ErrorCode::JsonError, e.to_string())
    }
}

impl From<hex::FromHexError> for TxCompilerError {
    fn from(e: hex::FromHexError) -> Self {
        TxCompilerError::new(ErrorCode::HexError, e.to_string())
    }
}

impl From<std::io::Error> for TxCompilerError {
    fn from(e: std::io::Error) -> Self {
        TxCompilerError::new(ErrorCode::Internal, e.to_string())
    }
}
