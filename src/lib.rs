//! Transaction Pre-Signing Core
//!
//! The contract between chain-specific transaction compilers and signers.
//!
//! # Architecture
//!
//! This crate provides:
//! - **signing**: the `PreSigningOutput` value, its error-code catalogue,
//!   validation and the `PreSigningCompiler` seam chains plug into
//! - **codec**: the canonical, versioned tag-length-value encoding and the
//!   schema registry that pins field tags across revisions
//! - **types**: JSON views for tooling and fixtures
//! - **utils**: structured logging with payload redaction
//!
//! # Consuming an output
//!
//! Checking `error_code` is mandatory. `into_result` does it, together with
//! the success/payload invariant:
//!
//! ```rust
//! use tx_compiler::PreSigningOutput;
//!
//! let bytes = PreSigningOutput::success(vec![0xaa, 0xbb], vec![0x11, 0x22]).encode();
//! let output = PreSigningOutput::decode(&bytes)?;
//! match output.into_result() {
//!     Ok(presigned) => assert_eq!(presigned.data(), &[0x11, 0x22]),
//!     Err(failure) => panic!("{}", failure),
//! }
//! # Ok::<(), tx_compiler::DecodeError>(())
//! ```

pub mod codec;
pub mod error;
pub mod serde_bytes;
pub mod signing;
pub mod types;
pub mod utils;

// Re-export key types for convenience
pub use codec::{decode, decode_with, encode, DecoderConfig, SchemaRegistry, UnknownFieldPolicy};
pub use error::{
    DecodeError, ErrorCode, MalformedReason, SchemaError, TxCompilerError, TxCompilerResult,
    ValidationError,
};
pub use signing::{
    CompileError, CompileFailure, HashAlgorithm, PreSigned, PreSigningCompiler, PreSigningOutput,
    SigningErrorCode,
};
pub use types::PreSigningOutputJson;
