//! Decoder configuration

use serde::{Deserialize, Serialize};

/// Default upper bound on a PDU's declared SEQUENCE length
pub const DEFAULT_MAX_PDU_LENGTH: usize = 65_536;

/// Limits applied by [`Asn1Decoder`](crate::ber::Asn1Decoder)
///
/// Missing fields take their default when deserialized, so an empty
/// document yields `DecoderConfig::default()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Largest SEQUENCE content length accepted, in bytes
    pub max_pdu_length: usize,
}

impl DecoderConfig {
    pub fn with_max_pdu_length(max_pdu_length: usize) -> Self {
        Self { max_pdu_length }
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_pdu_length: DEFAULT_MAX_PDU_LENGTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_from_empty_document() {
        let config: DecoderConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, DecoderConfig::default());
        assert_eq!(config.max_pdu_length, DEFAULT_MAX_PDU_LENGTH);
    }

    #[test]
    fn test_override() {
        let config: DecoderConfig = serde_json::from_str(r#"{"max_pdu_length": 16}"#).unwrap();
        assert_eq!(config, DecoderConfig::with_max_pdu_length(16));
    }
}
