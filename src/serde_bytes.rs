//! Serde helpers for byte payloads
//!
//! Pre-images and digests travel through JSON fixtures as hex strings.
//! An optional `0x` prefix is accepted on input; output never has one.

use serde::{Deserialize, Deserializer, Serializer};

/// Decode hex, tolerating a `0x` prefix and surrounding whitespace
pub fn decode_hex(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(digits)
}

/// Serialize/deserialize `Vec<u8>` as a hex string
pub mod hex_vec {
    use super::*;

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        decode_hex(&s).map_err(serde::de::Error::custom)
    }
}
