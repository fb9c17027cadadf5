//! Cancel extended operation (RFC 3909)
//!
//! # Request Value
//! ```text
//! cancelRequestValue ::= SEQUENCE {
//!     cancelID        MessageID  -- INTEGER (0 .. maxInt)
//! }
//! ```
//!
//! `30 03 02 01 01` asks to cancel the operation with message ID 1.

mod container;
mod decoder;
mod factory;

pub use container::CancelContainer;
pub use decoder::CancelDecoder;
pub use factory::{CancelFactory, CancelResponse};

use bytes::Bytes;
use ldap_asn1::ber::{BerEncoder, BerLength};
use ldap_core::{LdapError, LdapResult};

/// Request value of the Cancel extended operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cancel {
    cancel_id: i32,
}

impl Cancel {
    /// OID of the Cancel extended request
    pub const EXTENSION_OID: &'static str = "1.3.6.1.1.8";

    /// Create a request cancelling the operation with message ID `cancel_id`
    pub fn new(cancel_id: i32) -> Self {
        Self { cancel_id }
    }

    /// Message ID of the operation to cancel
    pub fn cancel_id(&self) -> i32 {
        self.cancel_id
    }

    /// Total length of the encoded request value
    ///
    /// `0x30 L(I) 0x02 L(N) N`, where N is the minimal two's complement
    /// form of the ID.
    pub fn compute_length(&self) -> usize {
        let id_length = BerEncoder::integer_content(self.cancel_id as i64).len();
        let sequence_length = 1 + BerLength::new(id_length).encoded_len() + id_length;
        1 + BerLength::new(sequence_length).encoded_len() + sequence_length
    }

    /// Encode the request value
    ///
    /// # Error Handling
    /// Returns `Encoding` if the ID is negative.
    pub fn encode(&self) -> LdapResult<Bytes> {
        if self.cancel_id < 0 {
            return Err(LdapError::Encoding(format!(
                "cancelId must be non-negative, got {}",
                self.cancel_id
            )));
        }

        let mut fields = BerEncoder::new();
        fields.encode_integer(self.cancel_id as i64);

        let mut encoder = BerEncoder::with_capacity(self.compute_length());
        encoder.encode_sequence(fields.as_bytes());
        Ok(encoder.into_bytes())
    }

    /// Decode a request value with the default decoder configuration
    pub fn decode(data: &[u8]) -> LdapResult<Self> {
        CancelDecoder::new().decode_cancel(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_encode() {
        assert_eq!(&Cancel::new(1).encode().unwrap()[..], &hex!("30 03 02 01 01"));
        assert_eq!(&Cancel::new(0).encode().unwrap()[..], &hex!("30 03 02 01 00"));
        assert_eq!(
            &Cancel::new(128).encode().unwrap()[..],
            &hex!("30 04 02 02 00 80")
        );
        assert_eq!(
            &Cancel::new(i32::MAX).encode().unwrap()[..],
            &hex!("30 06 02 04 7F FF FF FF")
        );
    }

    #[test]
    fn test_compute_length() {
        for id in [0, 1, 127, 128, 65_535, i32::MAX] {
            let cancel = Cancel::new(id);
            assert_eq!(cancel.compute_length(), cancel.encode().unwrap().len(), "{}", id);
        }
    }

    #[test]
    fn test_negative_id_is_not_encodable() {
        let err = Cancel::new(-1).encode().unwrap_err();
        assert!(matches!(err, LdapError::Encoding(_)));
    }

    #[test]
    fn test_decode_then_encode() {
        let data = hex!("30 03 02 01 01");
        let cancel = Cancel::decode(&data).unwrap();
        assert_eq!(cancel.cancel_id(), 1);
        assert_eq!(&cancel.encode().unwrap()[..], &data);
    }
}
