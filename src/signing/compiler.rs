//! Transaction Compiler
//!
//! The seam chain-specific pre-image builders plug into. A builder only has
//! to produce the pre-image bytes (or a `CompileError`); hashing and folding
//! failures into a `PreSigningOutput` happen here, the same way for every
//! chain.

use crate::signing::codes::SigningErrorCode;
use crate::signing::hashing::HashAlgorithm;
use crate::signing::output::PreSigningOutput;
use crate::{log_debug, log_info};

/// Why a chain compiler could not build a pre-image
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct CompileError {
    pub code: SigningErrorCode,
    pub message: String,
}

impl CompileError {
    pub fn new(code: SigningErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::new(SigningErrorCode::InvalidParams, msg)
    }

    pub fn input_parse(msg: impl Into<String>) -> Self {
        Self::new(SigningErrorCode::InputParse, msg)
    }

    pub fn not_supported(msg: impl Into<String>) -> Self {
        Self::new(SigningErrorCode::NotSupported, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(SigningErrorCode::Internal, msg)
    }
}

/// A chain-specific pre-image builder
///
/// Chain parameters (network, fork id, chain id...) live on the implementor;
/// `Input` is the unsigned transaction description.
pub trait PreSigningCompiler {
    type Input;

    /// Short chain name used in logs
    fn chain(&self) -> &'static str;

    /// Digest the chain signs over
    fn hash_algorithm(&self) -> HashAlgorithm;

    /// Serialize the unsigned transaction into the bytes to be signed
    fn preimage(&self, input: &Self::Input) -> Result<Vec<u8>, CompileError>;

    /// Build the pre-image and its digest. Never panics and never returns
    /// `Err`: failures become an output with a nonzero `error_code`.
    fn compile_and_hash(&self, input: &Self::Input) -> PreSigningOutput {
        match self.preimage(input) {
            Ok(data) if data.is_empty() => PreSigningOutput::failure(
                SigningErrorCode::Internal,
                format!("{} compiler produced an empty pre-image", self.chain()),
            ),
            Ok(data) => {
                let algorithm = self.hash_algorithm();
                let data_hash = algorithm.digest(&data);
                log_debug!(
                    "compiler",
                    "Pre-image built",
                    chain = self.chain(),
                    algorithm = algorithm,
                    preimage_len = data.len(),
                    data_hash = hex::encode(&data_hash),
                );
                PreSigningOutput::success(data_hash, data)
            }
            Err(err) => {
                let output = PreSigningOutput::failure(err.code, err.message);
                log_info!(
                    "compiler",
                    "Compilation failed",
                    chain = self.chain(),
                    code = output.kind(),
                    error = output.error(),
                );
                output
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Toy chain: amount (u64 LE) followed by the memo bytes, double SHA-256
    struct MemoChain;

    struct MemoTransfer {
        amount: u64,
        memo: String,
    }

    impl PreSigningCompiler for MemoChain {
        type Input = MemoTransfer;

        fn chain(&self) -> &'static str {
            "memo"
        }

        fn hash_algorithm(&self) -> HashAlgorithm {
            HashAlgorithm::Sha256d
        }

        fn preimage(&self, input: &MemoTransfer) -> Result<Vec<u8>, CompileError> {
            if input.amount == 0 {
                return Err(CompileError::new(
                    SigningErrorCode::ZeroAmountRequested,
                    "amount must be positive",
                ));
            }
            if input.memo.len() > 32 {
                return Err(CompileError::new(SigningErrorCode::InvalidMemo, ""));
            }
            if input.memo == "ok-but-broken" {
                return Err(CompileError::new(SigningErrorCode::Ok, "bug"));
            }
            let mut buf = input.amount.to_le_bytes().to_vec();
            buf.extend_from_slice(input.memo.as_bytes());
            Ok(buf)
        }
    }

    #[test]
    fn test_compile_success() {
        let output = MemoChain.compile_and_hash(&MemoTransfer {
            amount: 5,
            memo: "hi".to_string(),
        });
        assert!(output.is_success());
        assert_eq!(output.data(), &[5, 0, 0, 0, 0, 0, 0, 0, b'h', b'i']);
        assert_eq!(output.data_hash(), HashAlgorithm::Sha256d.digest(output.data()).as_slice());
        assert!(output.validate().is_ok());
        assert!(output.verify_data_hash(HashAlgorithm::Sha256d).is_ok());
    }

    #[test]
    fn test_compile_error_becomes_data() {
        let output = MemoChain.compile_and_hash(&MemoTransfer {
            amount: 0,
            memo: String::new(),
        });
        assert_eq!(output.kind(), SigningErrorCode::ZeroAmountRequested);
        assert_eq!(output.error(), "amount must be positive");
        assert!(output.data().is_empty());
        assert!(output.data_hash().is_empty());

        // Still a perfectly encodable, decodable value
        let decoded = PreSigningOutput::decode(&output.encode()).unwrap();
        assert_eq!(decoded, output);
    }

    #[test]
    fn test_missing_message_uses_description() {
        let output = MemoChain.compile_and_hash(&MemoTransfer {
            amount: 1,
            memo: "x".repeat(40),
        });
        assert_eq!(output.kind(), SigningErrorCode::InvalidMemo);
        assert_eq!(output.error(), "Invalid memo");
    }

    #[test]
    fn test_zero_code_error_is_not_success() {
        let output = MemoChain.compile_and_hash(&MemoTransfer {
            amount: 1,
            memo: "ok-but-broken".to_string(),
        });
        assert_eq!(output.kind(), SigningErrorCode::General);
        assert!(!output.is_success());
    }

    #[test]
    fn test_compile_error_display() {
        let err = CompileError::invalid_params("missing fee");
        assert_eq!(err.to_string(), "invalid_params: missing fee");
        assert_eq!(CompileError::not_supported("x").code, SigningErrorCode::NotSupported);
        assert_eq!(CompileError::input_parse("x").code, SigningErrorCode::InputParse);
        assert_eq!(CompileError::internal("x").code, SigningErrorCode::Internal);
    }
}
