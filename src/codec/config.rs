//! Decoder configuration
//!
//! Presets cover the common consumers: signers that only care about the
//! known fields, relays that must re-emit a message unchanged, and services
//! that accept untrusted input and want a size ceiling.

/// What to do with fields from a newer schema revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownFieldPolicy {
    /// Skip and drop them
    #[default]
    Discard,
    /// Keep their raw bytes so re-encoding reproduces them
    Retain,
}

/// Decoder settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    pub unknown_fields: UnknownFieldPolicy,
    /// Reject inputs longer than this many bytes
    pub max_message_len: Option<usize>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::lenient()
    }
}

impl DecoderConfig {
    /// Discard unknown fields, no size limit
    pub fn lenient() -> Self {
        Self {
            unknown_fields: UnknownFieldPolicy::Discard,
            max_message_len: None,
        }
    }

    /// Keep unknown fields for byte-faithful re-encoding
    pub fn round_trip() -> Self {
        Self {
            unknown_fields: UnknownFieldPolicy::Retain,
            max_message_len: None,
        }
    }

    /// Discard unknown fields and cap the input size
    pub fn strict(max_message_len: usize) -> Self {
        Self {
            unknown_fields: UnknownFieldPolicy::Discard,
            max_message_len: Some(max_message_len),
        }
    }

    pub fn with_unknown_fields(mut self, policy: UnknownFieldPolicy) -> Self {
        self.unknown_fields = policy;
        self
    }

    pub fn retains_unknown(&self) -> bool {
        self.unknown_fields == UnknownFieldPolicy::Retain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(DecoderConfig::default(), DecoderConfig::lenient());
        assert!(!DecoderConfig::lenient().retains_unknown());
        assert!(DecoderConfig::round_trip().retains_unknown());

        let strict = DecoderConfig::strict(1024);
        assert_eq!(strict.max_message_len, Some(1024));
        assert!(!strict.retains_unknown());
        assert!(strict
            .with_unknown_fields(UnknownFieldPolicy::Retain)
            .retains_unknown());
    }
}
