use ldap_core::{LdapError, LdapResult};

use super::{Cancel, CancelDecoder};
use crate::extended::ExtendedRequestFactory;

/// Response to a Cancel request
///
/// The outcome travels in the LDAPResult code (canceled, noSuchOperation,
/// tooLate, cannotCancel); the response itself has no name and no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CancelResponse;

/// Factory for Cancel requests and responses
#[derive(Debug, Clone, Default)]
pub struct CancelFactory {
    decoder: CancelDecoder,
}

impl CancelFactory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExtendedRequestFactory for CancelFactory {
    type Request = Cancel;
    type Response = CancelResponse;

    fn oid(&self) -> &'static str {
        Cancel::EXTENSION_OID
    }

    fn new_request(&self) -> Cancel {
        Cancel::default()
    }

    fn decode_request(&self, encoded_value: &[u8]) -> LdapResult<Cancel> {
        self.decoder.decode_cancel(encoded_value)
    }

    fn new_response(&self, encoded_value: &[u8]) -> LdapResult<CancelResponse> {
        if !encoded_value.is_empty() {
            return Err(LdapError::decoding(format!(
                "Cancel response carries no value, got {} bytes",
                encoded_value.len()
            )));
        }
        Ok(CancelResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_factory() {
        let factory = CancelFactory::new();
        assert_eq!(factory.oid(), "1.3.6.1.1.8");
        assert_eq!(factory.new_request().cancel_id(), 0);
        assert_eq!(
            factory.decode_request(&hex!("30 03 02 01 2A")).unwrap(),
            Cancel::new(42)
        );
        assert!(factory.decode_request(&hex!("30 00")).is_err());
    }

    #[test]
    fn test_response_has_no_value() {
        let factory = CancelFactory::new();
        assert_eq!(factory.new_response(&[]).unwrap(), CancelResponse);
        assert!(factory.new_response(&[0x00]).unwrap_err().is_decoding());
    }
}
