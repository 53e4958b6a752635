//! Pre-image digest algorithms
//!
//! Which algorithm produced `data_hash` is a per-chain decision; consumers
//! pass it in when they want to re-check the digest.

use crate::error::{TxCompilerError, TxCompilerResult};
use std::fmt;
use std::str::FromStr;

/// Digest functions used by chain compilers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// Single SHA-256 (Cosmos, Binance)
    Sha256,
    /// Double SHA-256 (Bitcoin legacy sighash)
    Sha256d,
    /// Keccak-256 (Ethereum)
    Keccak256,
    /// FIPS-202 SHA3-256
    Sha3_256,
    /// BLAKE2b with 32-byte output (Cardano, Sui)
    Blake2b256,
    /// SHA-512/256 (Algorand)
    Sha512_256,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 6] = [
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha256d,
        HashAlgorithm::Keccak256,
        HashAlgorithm::Sha3_256,
        HashAlgorithm::Blake2b256,
        HashAlgorithm::Sha512_256,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha256d => "sha256d",
            HashAlgorithm::Keccak256 => "keccak256",
            HashAlgorithm::Sha3_256 => "sha3-256",
            HashAlgorithm::Blake2b256 => "blake2b256",
            HashAlgorithm::Sha512_256 => "sha512-256",
        }
    }

    /// Digest length in bytes
    pub fn output_len(&self) -> usize {
        32
    }

    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            HashAlgorithm::Sha256 => {
                use sha2::{Digest, Sha256};
                Sha256::digest(data).to_vec()
            }
            HashAlgorithm::Sha256d => {
                use bitcoin::hashes::{sha256d, Hash};
                sha256d::Hash::hash(data).to_byte_array().to_vec()
            }
            HashAlgorithm::Keccak256 => {
                use tiny_keccak::{Hasher, Keccak};
                let mut hasher = Keccak::v256();
                let mut output = [0u8; 32];
                hasher.update(data);
                hasher.finalize(&mut output);
                output.to_vec()
            }
            HashAlgorithm::Sha3_256 => {
                use sha3::{Digest, Sha3_256};
                Sha3_256::digest(data).to_vec()
            }
            HashAlgorithm::Blake2b256 => {
                use blake2::{digest::consts::U32, Blake2b, Digest};
                Blake2b::<U32>::digest(data).to_vec()
            }
            HashAlgorithm::Sha512_256 => {
                use sha2::{Digest, Sha512_256};
                Sha512_256::digest(data).to_vec()
            }
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = TxCompilerError;

    fn from_str(s: &str) -> TxCompilerResult<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|alg| alg.name() == wanted)
            .ok_or_else(|| TxCompilerError::invalid_input(format!("Unknown hash algorithm: {}", s)))
    }
}
