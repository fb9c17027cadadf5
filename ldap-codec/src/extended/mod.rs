//! Extended operations (RFC 4511 §4.12)
//!
//! Each operation is identified by an OID and carries an optional BER
//! encoded request value. A factory creates the request and response
//! objects of one operation; a codec server keeps one factory per OID.

pub mod cancel;
pub mod graceful_shutdown;

use ldap_core::LdapResult;

/// Creates the request and response objects of one extended operation
pub trait ExtendedRequestFactory {
    type Request;
    type Response;

    /// OID identifying the extended request
    fn oid(&self) -> &'static str;

    /// New request with default field values
    fn new_request(&self) -> Self::Request;

    /// Decode a request from its encoded value
    fn decode_request(&self, encoded_value: &[u8]) -> LdapResult<Self::Request>;

    /// Build the response from its (possibly empty) encoded value
    fn new_response(&self, encoded_value: &[u8]) -> LdapResult<Self::Response>;
}
