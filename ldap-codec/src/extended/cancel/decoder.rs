use ldap_asn1::DecoderConfig;
use ldap_asn1::ber::Asn1Decoder;
use ldap_core::LdapResult;

use super::{Cancel, CancelContainer};

/// Decoder for Cancel request values
///
/// Stateless apart from its configuration: one instance may serve any
/// number of concurrent decodes, each with its own [`CancelContainer`].
///
/// # Usage Example
/// ```rust
/// use ldap_codec::{CancelContainer, CancelDecoder};
///
/// let decoder = CancelDecoder::new();
/// let mut container = CancelContainer::new();
/// decoder.decode(&[0x30, 0x03, 0x02, 0x01, 0x01], &mut container).unwrap();
/// assert_eq!(container.cancel().unwrap().cancel_id(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelDecoder {
    inner: Asn1Decoder,
}

impl CancelDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            inner: Asn1Decoder::with_config(config),
        }
    }

    /// Decode `data` into `container`
    ///
    /// # Error Handling
    /// Returns a `Decoding` error and leaves the container `Failed` when:
    /// - the outer tag is not a SEQUENCE (`expected SEQUENCE`)
    /// - the SEQUENCE is empty (`cancelId required`)
    /// - the cancelId has no content (`empty cancelId`)
    /// - the cancelId is negative or too long (`bad cancelId`)
    /// - a second field follows (`unexpected extra field`)
    /// - lengths are inconsistent with the buffer
    pub fn decode(&self, data: &[u8], container: &mut CancelContainer) -> LdapResult<()> {
        self.inner.decode(data, container)
    }

    /// Decode `data` with a fresh container and return the request
    pub fn decode_cancel(&self, data: &[u8]) -> LdapResult<Cancel> {
        let mut container = CancelContainer::new();
        self.decode(data, &mut container)?;
        container.into_cancel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use ldap_asn1::ber::DecoderState;
    use std::sync::Arc;
    use std::thread;

    fn decode_error(data: &[u8]) -> String {
        let mut container = CancelContainer::new();
        let err = CancelDecoder::new().decode(data, &mut container).unwrap_err();
        assert!(err.is_decoding());
        assert_eq!(
            container.state(),
            DecoderState::Failed,
            "container must fail for {:02X?}",
            data
        );
        assert!(container.cancel().is_none());
        err.to_string()
    }

    #[test]
    fn test_decode_cancel() {
        let decoder = CancelDecoder::new();
        let mut container = CancelContainer::new();
        decoder.decode(&hex!("30 03 02 01 01"), &mut container).unwrap();
        assert_eq!(container.state(), DecoderState::Done);
        assert_eq!(container.cancel().map(Cancel::cancel_id), Some(1));

        let cancel = decoder.decode_cancel(&hex!("30 06 02 04 7F FF FF FF")).unwrap();
        assert_eq!(cancel.cancel_id(), i32::MAX);
    }

    #[test]
    fn test_not_a_sequence() {
        assert!(decode_error(&hex!("31 03 02 01 01")).ends_with("expected SEQUENCE"));
    }

    #[test]
    fn test_empty_sequence() {
        assert!(decode_error(&hex!("30 00")).ends_with("cancelId required"));
    }

    #[test]
    fn test_empty_cancel_id() {
        assert!(decode_error(&hex!("30 02 02 00")).ends_with("empty cancelId"));
    }

    #[test]
    fn test_negative_cancel_id() {
        assert!(decode_error(&hex!("30 06 02 04 FF FF FF FF")).ends_with("bad cancelId"));
        assert!(decode_error(&hex!("30 03 02 01 80")).ends_with("bad cancelId"));
    }

    #[test]
    fn test_oversized_cancel_id() {
        assert!(decode_error(&hex!("30 07 02 05 00 FF FF FF FF")).ends_with("bad cancelId"));
    }

    #[test]
    fn test_extra_field() {
        assert!(decode_error(&hex!("30 06 02 01 01 02 01 02")).ends_with("unexpected extra field"));
    }

    #[test]
    fn test_wrong_field_tag() {
        assert!(decode_error(&hex!("30 03 04 01 01")).contains("bad cancelId tag"));
    }

    #[test]
    fn test_truncated_input() {
        decode_error(&hex!("30 03 02 01"));
        decode_error(&hex!("30"));
        decode_error(&[]);
    }

    #[test]
    fn test_container_is_single_use() {
        let decoder = CancelDecoder::new();
        let mut container = CancelContainer::new();
        decoder.decode(&hex!("30 03 02 01 05"), &mut container).unwrap();
        assert!(decoder.decode(&hex!("30 03 02 01 06"), &mut container).is_err());
        assert_eq!(container.into_cancel().unwrap().cancel_id(), 5);
    }

    #[test]
    fn test_into_cancel_before_decode() {
        assert!(CancelContainer::new().into_cancel().is_err());
    }

    #[test]
    fn test_max_pdu_length() {
        let decoder = CancelDecoder::with_config(DecoderConfig::with_max_pdu_length(2));
        assert!(decoder.decode_cancel(&hex!("30 03 02 01 01")).is_err());
    }

    #[test]
    fn test_concurrent_decodes() {
        let decoder = Arc::new(CancelDecoder::new());
        let handles: Vec<_> = (0..8u8)
            .map(|id| {
                let decoder = Arc::clone(&decoder);
                thread::spawn(move || decoder.decode_cancel(&[0x30, 0x03, 0x02, 0x01, id]))
            })
            .collect();
        for (id, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap().unwrap().cancel_id(), id as i32);
        }
    }
}
