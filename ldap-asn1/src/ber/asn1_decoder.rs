//! Stateless driver for container-based PDU decoding

use ldap_core::{LdapError, LdapResult};

use crate::ber::container::{Asn1Container, DecoderState};
use crate::ber::decoder::BerDecoder;
use crate::ber::types::BerTag;
use crate::config::DecoderConfig;

/// Decoder for SEQUENCE-wrapped PDUs
///
/// The decoder holds only its configuration, so one instance can be shared
/// by any number of threads. All per-decode state lives in the container
/// passed to [`Asn1Decoder::decode`].
///
/// # Decoding Process
/// 1. Read the outer tag; anything but `0x30` fails with `expected SEQUENCE`
/// 2. Read the SEQUENCE length; it must fit the configured limit and bound
///    the rest of the buffer exactly
/// 3. For each field: read tag, length, value and hand them to the container
/// 4. Let the container check its required fields
///
/// Any failure moves the container to `Failed`; it must then be discarded.
#[derive(Debug, Clone, Default)]
pub struct Asn1Decoder {
    config: DecoderConfig,
}

impl Asn1Decoder {
    /// Create a decoder with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode one PDU from `data` into `container`
    ///
    /// # Error Handling
    /// Returns a `Decoding` error for malformed input or when the container
    /// has already been used.
    pub fn decode<C: Asn1Container>(&self, data: &[u8], container: &mut C) -> LdapResult<()> {
        if container.progress().state() != DecoderState::Start {
            return Err(LdapError::decoding(format!(
                "{} container already used (state {})",
                container.name(),
                container.progress().state().as_str()
            )));
        }

        match self.run(data, container) {
            Ok(()) => Ok(()),
            Err(e) => {
                log::debug!("{} decoding failed: {}", container.name(), e);
                // run() raises every error before reaching a terminal state
                let _ = container.progress_mut().transition_to(DecoderState::Failed);
                Err(e)
            }
        }
    }

    fn run<C: Asn1Container>(&self, data: &[u8], container: &mut C) -> LdapResult<()> {
        let mut cursor = BerDecoder::new(data);

        container.progress_mut().transition_to(DecoderState::ExpectSequenceTag)?;
        let tag = cursor.read_tag()?;
        if tag != BerTag::SEQUENCE {
            return Err(LdapError::decoding("expected SEQUENCE"));
        }

        let length = cursor.read_length()?;
        if length > self.config.max_pdu_length {
            return Err(LdapError::decoding(format!(
                "PDU too large: {} bytes (max {})",
                length, self.config.max_pdu_length
            )));
        }
        if length > cursor.remaining() {
            return Err(LdapError::decoding(format!(
                "truncated PDU: {} bytes declared, {} available",
                length,
                cursor.remaining()
            )));
        }
        if length < cursor.remaining() {
            return Err(LdapError::decoding(format!(
                "unexpected trailing data: {} bytes after the PDU",
                cursor.remaining() - length
            )));
        }
        container.progress_mut().set_expected_length(length);
        log::trace!("{}: SEQUENCE of {} bytes", container.name(), length);

        while !container.progress().is_complete() {
            let field_start = cursor.position();

            container.progress_mut().transition_to(DecoderState::ExpectFieldTag)?;
            let tag = cursor.read_tag()?;

            container.progress_mut().transition_to(DecoderState::ExpectFieldLength)?;
            let field_length = cursor.read_length()?;

            container.progress_mut().transition_to(DecoderState::ExpectFieldValue)?;
            let value = cursor.read_bytes(field_length)?;
            container
                .progress_mut()
                .consume(cursor.position() - field_start)?;

            container.on_field(tag, value)?;
        }

        container.finish()?;
        container.progress_mut().transition_to(DecoderState::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ber::container::DecodeProgress;
    use hex_literal::hex;

    /// Collects every INTEGER field
    #[derive(Default)]
    struct IntegersContainer {
        progress: DecodeProgress,
        values: Vec<i64>,
    }

    impl Asn1Container for IntegersContainer {
        fn name(&self) -> &'static str {
            "Integers"
        }

        fn progress(&self) -> &DecodeProgress {
            &self.progress
        }

        fn progress_mut(&mut self) -> &mut DecodeProgress {
            &mut self.progress
        }

        fn on_field(&mut self, tag: BerTag, value: &[u8]) -> LdapResult<()> {
            if tag != BerTag::INTEGER {
                return Err(LdapError::decoding("expected INTEGER"));
            }
            self.values.push(BerDecoder::parse_integer(value)?);
            Ok(())
        }

        fn finish(&mut self) -> LdapResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_decode_fields() {
        let mut container = IntegersContainer::default();
        Asn1Decoder::new()
            .decode(&hex!("30 06 02 01 01 02 01 02"), &mut container)
            .unwrap();
        assert_eq!(container.values, vec![1, 2]);
        assert_eq!(container.progress.state(), DecoderState::Done);
    }

    #[test]
    fn test_empty_sequence() {
        let mut container = IntegersContainer::default();
        Asn1Decoder::new()
            .decode(&hex!("30 00"), &mut container)
            .unwrap();
        assert!(container.values.is_empty());
    }

    #[test]
    fn test_not_a_sequence() {
        let mut container = IntegersContainer::default();
        let err = Asn1Decoder::new()
            .decode(&hex!("31 03 02 01 01"), &mut container)
            .unwrap_err();
        assert_eq!(err.to_string(), "Decoding error: expected SEQUENCE");
        assert_eq!(container.progress.state(), DecoderState::Failed);
    }

    #[test]
    fn test_length_mismatch() {
        let decoder = Asn1Decoder::new();

        let mut container = IntegersContainer::default();
        assert!(decoder.decode(&hex!("30 05 02 01 01"), &mut container).is_err());

        let mut container = IntegersContainer::default();
        assert!(decoder.decode(&hex!("30 03 02 01 01 00"), &mut container).is_err());

        // Inner field claims more than the SEQUENCE holds
        let mut container = IntegersContainer::default();
        assert!(decoder.decode(&hex!("30 03 02 02 01"), &mut container).is_err());

        let mut container = IntegersContainer::default();
        assert!(decoder.decode(&[], &mut container).is_err());
    }

    #[test]
    fn test_long_form_sequence_length() {
        let mut container = IntegersContainer::default();
        Asn1Decoder::new()
            .decode(&hex!("30 81 03 02 01 07"), &mut container)
            .unwrap();
        assert_eq!(container.values, vec![7]);
    }

    #[test]
    fn test_max_pdu_length() {
        let decoder = Asn1Decoder::with_config(DecoderConfig::with_max_pdu_length(2));
        let mut container = IntegersContainer::default();
        let err = decoder
            .decode(&hex!("30 03 02 01 01"), &mut container)
            .unwrap_err();
        assert!(err.to_string().contains("PDU too large"));
    }

    #[test]
    fn test_container_is_single_use() {
        let decoder = Asn1Decoder::new();
        let mut container = IntegersContainer::default();
        decoder.decode(&hex!("30 03 02 01 01"), &mut container).unwrap();
        assert!(decoder.decode(&hex!("30 03 02 01 01"), &mut container).is_err());
        assert_eq!(container.values, vec![1]);
    }

    #[test]
    fn test_decoder_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Asn1Decoder>();
    }
}
