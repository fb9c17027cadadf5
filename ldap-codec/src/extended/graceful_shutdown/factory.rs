use ldap_core::{LdapError, LdapResult};

use super::{GracefulShutdown, GracefulShutdownDecoder};
use crate::extended::ExtendedRequestFactory;

/// Response to a Graceful Shutdown request; it carries no value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GracefulShutdownResponse;

impl GracefulShutdownResponse {
    /// OID naming the Graceful Shutdown response
    pub const EXTENSION_OID: &'static str = "1.3.6.1.4.1.18060.0.1.4";
}

/// Factory for Graceful Shutdown requests and responses
#[derive(Debug, Clone, Default)]
pub struct GracefulShutdownFactory {
    decoder: GracefulShutdownDecoder,
}

impl GracefulShutdownFactory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExtendedRequestFactory for GracefulShutdownFactory {
    type Request = GracefulShutdown;
    type Response = GracefulShutdownResponse;

    fn oid(&self) -> &'static str {
        GracefulShutdown::EXTENSION_OID
    }

    fn new_request(&self) -> GracefulShutdown {
        GracefulShutdown::default()
    }

    fn decode_request(&self, encoded_value: &[u8]) -> LdapResult<GracefulShutdown> {
        self.decoder.decode_request(encoded_value)
    }

    fn new_response(&self, encoded_value: &[u8]) -> LdapResult<GracefulShutdownResponse> {
        if !encoded_value.is_empty() {
            return Err(LdapError::decoding(format!(
                "GracefulShutdown response carries no value, got {} bytes",
                encoded_value.len()
            )));
        }
        Ok(GracefulShutdownResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_factory() {
        let factory = GracefulShutdownFactory::new();
        assert_eq!(factory.oid(), "1.3.6.1.4.1.18060.0.1.3");
        assert_eq!(factory.new_request(), GracefulShutdown::new(0, 0));
        assert_eq!(
            factory.decode_request(&hex!("30 03 02 01 0A")).unwrap().time_offset(),
            10
        );
        assert_eq!(factory.new_response(&[]).unwrap(), GracefulShutdownResponse);
        assert!(factory.new_response(&hex!("30 00")).is_err());
        assert_eq!(GracefulShutdownResponse::EXTENSION_OID, "1.3.6.1.4.1.18060.0.1.4");
    }
}
