//! Pre-Signing Output Contract
//!
//! What a chain compiler hands to a signer:
//! 1. The pre-image bytes to sign and their digest, or
//! 2. A compilation failure carried as data (`error_code` + `error`)
//!
//! Chain-specific serialization lives behind [`PreSigningCompiler`]; this
//! module owns the result value, its error-code catalogue and the checks a
//! consumer runs before signing.

pub mod codes;
pub mod compiler;
pub mod hashing;
pub mod output;
pub mod validate;

pub use codes::SigningErrorCode;
pub use compiler::{CompileError, PreSigningCompiler};
pub use hashing::HashAlgorithm;
pub use output::{CompileFailure, PreSigned, PreSigningOutput, UnknownField, UnknownFields};
pub use validate::{validate, verify_data_hash};
