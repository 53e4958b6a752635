//! Shared serializable views
//!
//! JSON shapes used by the CLI and by test fixtures. The binary encoding in
//! `codec` stays the canonical form; these are for humans and tooling.

use crate::error::TxCompilerResult;
use crate::signing::{PreSigningOutput, SigningErrorCode};
use serde::{Deserialize, Serialize};

/// Hex/JSON view of a [`PreSigningOutput`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreSigningOutputJson {
    #[serde(with = "crate::serde_bytes::hex_vec", default)]
    pub data_hash: Vec<u8>,
    #[serde(with = "crate::serde_bytes::hex_vec", default)]
    pub data: Vec<u8>,
    #[serde(default)]
    pub error_code: i32,
    /// Catalogue name of `error_code`; informational, ignored on input
    #[serde(default)]
    pub error_name: String,
    #[serde(default)]
    pub error: String,
    /// Number of retained unknown fields; informational, ignored on input
    #[serde(default, skip_serializing_if = "is_zero")]
    pub unknown_fields: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl PreSigningOutputJson {
    pub fn to_json(&self) -> TxCompilerResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> TxCompilerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl From<&PreSigningOutput> for PreSigningOutputJson {
    fn from(output: &PreSigningOutput) -> Self {
        Self {
            data_hash: output.data_hash().to_vec(),
            data: output.data().to_vec(),
            error_code: output.error_code(),
            error_name: SigningErrorCode::from_i32(output.error_code()).to_string(),
            error: output.error().to_string(),
            unknown_fields: output.unknown_fields().len(),
        }
    }
}

impl From<PreSigningOutputJson> for PreSigningOutput {
    fn from(view: PreSigningOutputJson) -> Self {
        PreSigningOutput::new(view.data_hash, view.data, view.error_code, view.error)
    }
}
