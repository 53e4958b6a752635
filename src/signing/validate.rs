//! Output validation
//!
//! Checks a decoded (or freshly built) output against the success/payload
//! invariant. Decoding never calls these: a parseable but inconsistent
//! output must still reach the caller so it can be diagnosed.

use crate::error::ValidationError;
use crate::signing::hashing::HashAlgorithm;
use crate::signing::output::PreSigningOutput;
use crate::log_warn;

/// `error_code == 0` requires both `data` and `data_hash`.
/// Failures carry no emptiness requirement.
pub fn validate(output: &PreSigningOutput) -> Result<(), ValidationError> {
    if output.error_code() != 0 {
        return Ok(());
    }

    let result = if output.data_hash().is_empty() {
        Err(ValidationError::MissingDataHash)
    } else if output.data().is_empty() {
        Err(ValidationError::MissingData)
    } else {
        Ok(())
    };

    if let Err(ref violation) = result {
        log_warn!(
            "validate",
            "Success output without payload",
            reason = violation,
            data_len = output.data().len(),
            hash_len = output.data_hash().len(),
        );
    }
    result
}

/// Recompute the digest of `data` and compare it with `data_hash`
pub fn verify_data_hash(
    output: &PreSigningOutput,
    algorithm: HashAlgorithm,
) -> Result<(), ValidationError> {
    let expected = algorithm.output_len();
    let actual = output.data_hash().len();
    if actual != expected {
        return Err(ValidationError::UnsupportedHashLength {
            algorithm: algorithm.to_string(),
            expected,
            actual,
        });
    }

    if algorithm.digest(output.data()) != output.data_hash() {
        log_warn!(
            "validate",
            "Pre-image digest mismatch",
            algorithm = algorithm,
            data_hash = hex::encode(output.data_hash()),
        );
        return Err(ValidationError::DataHashMismatch {
            algorithm: algorithm.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_requires_payload() {
        let ok = PreSigningOutput::success(vec![0xaa, 0xbb], vec![0x11, 0x22, 0x33, 0x44, 0x55]);
        assert_eq!(validate(&ok), Ok(()));

        let no_hash = PreSigningOutput::new(vec![], vec![1], 0, "");
        assert_eq!(validate(&no_hash), Err(ValidationError::MissingDataHash));

        let no_data = PreSigningOutput::new(vec![1], vec![], 0, "");
        assert_eq!(validate(&no_data), Err(ValidationError::MissingData));

        assert!(validate(&PreSigningOutput::default()).is_err());
    }

    #[test]
    fn test_failure_is_exempt() {
        let failure = PreSigningOutput::new(vec![], vec![], 1, "invalid amount");
        assert_eq!(validate(&failure), Ok(()));

        // Partial diagnostics alongside an error are fine too
        let partial = PreSigningOutput::new(vec![], vec![9, 9], -3, "");
        assert_eq!(validate(&partial), Ok(()));
    }

    #[test]
    fn test_verify_data_hash() {
        let data = b"unsigned transaction".to_vec();
        let hash = HashAlgorithm::Keccak256.digest(&data);
        let output = PreSigningOutput::success(hash, data);

        assert_eq!(verify_data_hash(&output, HashAlgorithm::Keccak256), Ok(()));
        assert_eq!(
            verify_data_hash(&output, HashAlgorithm::Sha256),
            Err(ValidationError::DataHashMismatch {
                algorithm: "sha256".to_string()
            })
        );
    }

    #[test]
    fn test_verify_rejects_wrong_length() {
        let output = PreSigningOutput::success(vec![0xaa, 0xbb], vec![1, 2, 3]);
        assert_eq!(
            verify_data_hash(&output, HashAlgorithm::Sha256d),
            Err(ValidationError::UnsupportedHashLength {
                algorithm: "sha256d".to_string(),
                expected: 32,
                actual: 2,
            })
        );
    }
}
