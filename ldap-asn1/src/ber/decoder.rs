//! BER decoder for ASN.1 structures
//!
//! # Usage Example
//!
//! ```rust
//! use ldap_asn1::ber::BerDecoder;
//!
//! let data = [0x02, 0x02, 0x30, 0x39];
//! let mut decoder = BerDecoder::new(&data);
//! assert_eq!(decoder.decode_integer().unwrap(), 12345);
//! ```

use crate::ber::types::{BerLength, BerTag};
use ldap_core::{LdapError, LdapResult};

/// BER decoder for ASN.1 structures
///
/// This decoder follows the BER decoding rules as specified in ITU-T X.690.
/// It reads TLV (Tag-Length-Value) triplets from a byte buffer and keeps a
/// cursor that advances as data is decoded.
///
/// # Error Handling
///
/// Every failure is a `Decoding` error:
/// - Buffer underflow (a tag, length or value is cut short)
/// - A declared length exceeding the remaining bytes
/// - Empty or oversized INTEGER content
/// - Unexpected tag values
pub struct BerDecoder<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> BerDecoder<'a> {
    /// Create a new BER decoder over `buffer`
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Get current position in buffer
    pub fn position(&self) -> usize {
        self.position
    }

    /// Get remaining bytes
    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    /// Check if there is more data to decode
    pub fn has_remaining(&self) -> bool {
        self.position < self.buffer.len()
    }

    /// Read a tag at the cursor
    pub fn read_tag(&mut self) -> LdapResult<BerTag> {
        let (tag, consumed) = BerTag::decode(&self.buffer[self.position..])?;
        self.position += consumed;
        Ok(tag)
    }

    /// Read a length at the cursor
    ///
    /// The declared length is not checked against the remaining bytes here;
    /// [`BerDecoder::read_bytes`] does that when the value is read.
    pub fn read_length(&mut self) -> LdapResult<usize> {
        let (length, consumed) = BerLength::decode(&self.buffer[self.position..])?;
        self.position += consumed;
        Ok(length.value())
    }

    /// Read `count` value bytes at the cursor
    ///
    /// # Error Handling
    /// Returns error if the buffer doesn't have enough bytes.
    pub fn read_bytes(&mut self, count: usize) -> LdapResult<&'a [u8]> {
        if count > self.remaining() {
            return Err(LdapError::decoding(format!(
                "buffer exhausted: need {} bytes, have {}",
                count,
                self.remaining()
            )));
        }
        let start = self.position;
        self.position += count;
        Ok(&self.buffer[start..start + count])
    }

    /// Decode a TLV (Tag-Length-Value) triplet
    ///
    /// # Returns
    /// Returns `Ok((tag, value_bytes, total_bytes_consumed))` if successful.
    pub fn decode_tlv(&mut self) -> LdapResult<(BerTag, &'a [u8], usize)> {
        let start_pos = self.position;
        let tag = self.read_tag()?;
        let length = self.read_length()?;
        let value = self.read_bytes(length)?;
        Ok((tag, value, self.position - start_pos))
    }

    fn expect(&mut self, expected: BerTag, name: &str) -> LdapResult<&'a [u8]> {
        let (tag, value, _) = self.decode_tlv()?;
        if tag != expected {
            return Err(LdapError::decoding(format!(
                "expected {} tag, got {:?}",
                name, tag
            )));
        }
        Ok(value)
    }

    /// Decode an INTEGER
    ///
    /// # Decoding Format
    /// - Tag: Universal, Primitive, tag 2
    /// - Length: Number of bytes in value
    /// - Value: Two's complement representation (big-endian)
    pub fn decode_integer(&mut self) -> LdapResult<i64> {
        let value = self.expect(BerTag::INTEGER, "INTEGER")?;
        Self::parse_integer(value)
    }

    /// Convert big-endian two's complement content octets to i64
    ///
    /// Non-minimal encodings (a redundant leading `0x00`/`0xFF`) are accepted
    /// as long as the value fits; empty content is an error.
    pub fn parse_integer(bytes: &[u8]) -> LdapResult<i64> {
        if bytes.is_empty() {
            return Err(LdapError::decoding("empty integer encoding"));
        }

        if bytes.len() > 8 {
            return Err(LdapError::decoding(format!(
                "integer too large: {} bytes (max 8)",
                bytes.len()
            )));
        }

        let is_negative = (bytes[0] & 0x80) != 0;

        let mut value = 0i64;
        for &byte in bytes {
            value = (value << 8) | (byte as i64);
        }

        // Sign extend
        if is_negative && bytes.len() < 8 {
            let shift = 64 - (bytes.len() * 8);
            value = (value << shift) >> shift;
        }

        Ok(value)
    }

    /// Convert INTEGER content octets and check the value lies in `min..=max`
    pub fn parse_integer_in_range(bytes: &[u8], min: i64, max: i64) -> LdapResult<i64> {
        let value = Self::parse_integer(bytes)?;
        if value < min || value > max {
            return Err(LdapError::decoding(format!(
                "integer {} out of range [{}, {}]",
                value, min, max
            )));
        }
        Ok(value)
    }

    /// Decode an OCTET STRING
    ///
    /// # Decoding Format
    /// - Tag: Universal, Primitive, tag 4
    /// - Length: Number of bytes
    /// - Value: Raw bytes
    pub fn decode_octet_string(&mut self) -> LdapResult<&'a [u8]> {
        self.expect(BerTag::OCTET_STRING, "OCTET STRING")
    }

    /// Decode a SEQUENCE (constructed)
    ///
    /// # Returns
    /// Returns the content bytes (the concatenated element TLVs).
    pub fn decode_sequence(&mut self) -> LdapResult<&'a [u8]> {
        self.expect(BerTag::SEQUENCE, "SEQUENCE")
    }

    /// Skip a TLV (useful for skipping optional fields)
    ///
    /// # Returns
    /// Returns the number of bytes skipped.
    pub fn skip_tlv(&mut self) -> LdapResult<usize> {
        let (_, _, bytes_consumed) = self.decode_tlv()?;
        Ok(bytes_consumed)
    }
}
