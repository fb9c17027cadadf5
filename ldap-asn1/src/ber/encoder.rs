//! BER encoder for ASN.1 structures
//!
//! # Usage Example
//!
//! ```rust
//! use ldap_asn1::ber::BerEncoder;
//!
//! let mut inner = BerEncoder::new();
//! inner.encode_integer(1);
//! let mut outer = BerEncoder::new();
//! outer.encode_sequence(inner.as_bytes());
//! assert_eq!(&outer.into_bytes()[..], &[0x30, 0x03, 0x02, 0x01, 0x01]);
//! ```

use crate::ber::types::{BerLength, BerTag};
use bytes::{BufMut, Bytes, BytesMut};

/// BER encoder for ASN.1 structures
///
/// This encoder follows the BER encoding rules as specified in ITU-T X.690.
/// Each encoded value consists of a TLV (Tag-Length-Value) triplet, always
/// with a definite length in its shortest form.
///
/// Constructed values are built inside-out: encode the elements with one
/// encoder, then wrap them with [`BerEncoder::encode_sequence`] on another.
#[derive(Debug, Default)]
pub struct BerEncoder {
    buffer: BytesMut,
}

impl BerEncoder {
    /// Create a new BER encoder
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::new(),
        }
    }

    /// Create a new BER encoder with initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
        }
    }

    /// Encode a TLV (Tag-Length-Value) triplet
    ///
    /// # Arguments
    /// * `tag` - BER tag
    /// * `value` - Value bytes (already encoded)
    pub fn encode_tlv(&mut self, tag: &BerTag, value: &[u8]) {
        self.buffer.put_slice(&tag.encode());
        self.buffer.put_slice(&BerLength::new(value.len()).encode());
        self.buffer.put_slice(value);
    }

    /// Encode an INTEGER
    ///
    /// # Encoding Format
    /// - Tag: Universal, Primitive, tag 2
    /// - Length: Number of bytes in value
    /// - Value: Two's complement representation (big-endian, minimal encoding)
    ///
    /// # Minimal Encoding
    /// 127 is encoded as 1 byte (0x7F), 128 needs a leading 0x00 (0x00 0x80),
    /// -128 is 1 byte (0x80).
    pub fn encode_integer(&mut self, value: i64) {
        let bytes = Self::integer_content(value);
        self.encode_tlv(&BerTag::INTEGER, &bytes);
    }

    /// Minimal big-endian two's complement content octets of an integer
    ///
    /// Exposed for implicitly tagged integers (`[0] INTEGER`).
    pub fn integer_content(value: i64) -> Vec<u8> {
        let all = value.to_be_bytes();
        let mut start = 0;
        // Drop a leading byte while the next one still carries the same sign
        while start < all.len() - 1 {
            let redundant = (all[start] == 0x00 && all[start + 1] & 0x80 == 0)
                || (all[start] == 0xFF && all[start + 1] & 0x80 != 0);
            if !redundant {
                break;
            }
            start += 1;
        }
        all[start..].to_vec()
    }

    /// Encode an OCTET STRING
    ///
    /// # Encoding Format
    /// - Tag: Universal, Primitive, tag 4
    /// - Length: Number of bytes
    /// - Value: Raw bytes
    pub fn encode_octet_string(&mut self, value: &[u8]) {
        self.encode_tlv(&BerTag::OCTET_STRING, value);
    }

    /// Encode a SEQUENCE (constructed)
    ///
    /// # Arguments
    /// * `elements` - Encoded element bytes (each element is already a TLV)
    pub fn encode_sequence(&mut self, elements: &[u8]) {
        self.encode_tlv(&BerTag::SEQUENCE, elements);
    }

    /// Encode a context-specific tag
    ///
    /// # Arguments
    /// * `tag_number` - Context-specific tag number
    /// * `value` - Encoded value bytes
    /// * `constructed` - Whether this is a constructed type
    pub fn encode_context_specific(&mut self, tag_number: u32, value: &[u8], constructed: bool) {
        let tag = BerTag::context_specific(constructed, tag_number);
        self.encode_tlv(&tag, value);
    }

    /// Number of bytes encoded so far
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if nothing has been encoded yet
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Get the encoded bytes
    pub fn into_bytes(self) -> Bytes {
        self.buffer.freeze()
    }

    /// Get a reference to the encoded bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Clear the encoder buffer
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_encode_integer() {
        let mut encoder = BerEncoder::new();
        encoder.encode_integer(12345);
        assert_eq!(encoder.as_bytes(), &hex!("02 02 30 39"));
    }

    #[test]
    fn test_integer_content_minimal() {
        assert_eq!(BerEncoder::integer_content(0), vec![0x00]);
        assert_eq!(BerEncoder::integer_content(1), vec![0x01]);
        assert_eq!(BerEncoder::integer_content(127), vec![0x7F]);
        assert_eq!(BerEncoder::integer_content(128), vec![0x00, 0x80]);
        assert_eq!(BerEncoder::integer_content(256), vec![0x01, 0x00]);
        assert_eq!(BerEncoder::integer_content(-1), vec![0xFF]);
        assert_eq!(BerEncoder::integer_content(-128), vec![0x80]);
        assert_eq!(BerEncoder::integer_content(-129), vec![0xFF, 0x7F]);
        assert_eq!(
            BerEncoder::integer_content(i32::MAX as i64),
            vec![0x7F, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn test_encode_octet_string() {
        let mut encoder = BerEncoder::new();
        encoder.encode_octet_string(b"Hello");
        let bytes = encoder.into_bytes();
        assert_eq!(bytes[0], 0x04);
        assert_eq!(bytes[1], 5);
        assert_eq!(&bytes[2..], b"Hello");
    }

    #[test]
    fn test_encode_sequence() {
        let mut element_encoder = BerEncoder::new();
        element_encoder.encode_integer(1);
        let mut encoder = BerEncoder::new();
        encoder.encode_sequence(element_encoder.as_bytes());
        assert_eq!(&encoder.into_bytes()[..], &hex!("30 03 02 01 01"));
    }

    #[test]
    fn test_encode_long_octet_string() {
        let mut encoder = BerEncoder::with_capacity(256);
        encoder.encode_octet_string(&[0xAA; 200]);
        assert_eq!(encoder.len(), 203);
        assert_eq!(&encoder.as_bytes()[..3], &hex!("04 81 C8"));
    }

    #[test]
    fn test_encode_context_specific() {
        let mut encoder = BerEncoder::new();
        encoder.encode_context_specific(0, &BerEncoder::integer_content(300), false);
        assert_eq!(encoder.as_bytes(), &hex!("80 02 01 2C"));
        encoder.clear();
        assert!(encoder.is_empty());
    }
}
