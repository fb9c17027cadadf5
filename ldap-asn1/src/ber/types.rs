//! BER encoding types (Tag, Length)

use ldap_core::{LdapError, LdapResult};

/// BER Tag Class
///
/// ASN.1 defines four tag classes:
/// - **Universal**: Standard ASN.1 types (INTEGER, OCTET STRING, etc.)
/// - **Application**: Application-specific types (LDAP protocol ops)
/// - **Context-specific**: Context-dependent types (used in SEQUENCE/SET)
/// - **Private**: Private/implementation-specific types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BerTagClass {
    /// Universal class (00)
    Universal = 0,
    /// Application class (01)
    Application = 1,
    /// Context-specific class (10)
    ContextSpecific = 2,
    /// Private class (11)
    Private = 3,
}

impl BerTagClass {
    /// Get tag class from bits (bits 7-6 of tag byte)
    pub fn from_bits(bits: u8) -> Self {
        match (bits >> 6) & 0x03 {
            0 => BerTagClass::Universal,
            1 => BerTagClass::Application,
            2 => BerTagClass::ContextSpecific,
            _ => BerTagClass::Private,
        }
    }

    /// Convert tag class to bits (for encoding)
    pub fn to_bits(self) -> u8 {
        (self as u8) << 6
    }
}

/// BER Tag
///
/// A BER tag identifies the type of an ASN.1 value. It consists of:
/// - **Class**: Universal, Application, Context-specific, or Private
/// - **Constructed/Primitive**: Whether the value contains other TLVs
/// - **Tag Number**: 0-30 in short form, larger numbers in extended form
///
/// # Encoding Format
///
/// Extended form (tag number > 30):
/// ```text
/// First byte:  C C P 1 1 1 1 1  (all tag bits set to 1)
/// Following bytes: 1 T T T T T T T  (continuation bytes, last byte has bit 7 = 0)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BerTag {
    class: BerTagClass,
    constructed: bool,
    number: u32,
}

impl BerTag {
    /// INTEGER (`0x02`)
    pub const INTEGER: BerTag = BerTag::universal(false, 2);
    /// OCTET STRING (`0x04`)
    pub const OCTET_STRING: BerTag = BerTag::universal(false, 4);
    /// SEQUENCE / SEQUENCE OF (`0x30`)
    pub const SEQUENCE: BerTag = BerTag::universal(true, 16);

    /// Create a new BER tag
    pub const fn new(class: BerTagClass, constructed: bool, number: u32) -> Self {
        Self {
            class,
            constructed,
            number,
        }
    }

    /// Create a Universal class tag
    pub const fn universal(constructed: bool, number: u32) -> Self {
        Self::new(BerTagClass::Universal, constructed, number)
    }

    /// Create an Application class tag
    pub const fn application(constructed: bool, number: u32) -> Self {
        Self::new(BerTagClass::Application, constructed, number)
    }

    /// Create a Context-specific class tag
    pub const fn context_specific(constructed: bool, number: u32) -> Self {
        Self::new(BerTagClass::ContextSpecific, constructed, number)
    }

    /// Get tag class
    pub fn class(&self) -> BerTagClass {
        self.class
    }

    /// Check if tag is constructed
    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    /// Get tag number
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Encode tag to bytes
    ///
    /// Tag numbers up to 30 use a single byte, larger ones the extended form.
    pub fn encode(&self) -> Vec<u8> {
        let mut result = Vec::new();

        let class_bits = self.class.to_bits();
        let constructed_bit = if self.constructed { 0x20 } else { 0x00 };

        if self.number <= 30 {
            result.push(class_bits | constructed_bit | (self.number as u8 & 0x1F));
        } else {
            result.push(class_bits | constructed_bit | 0x1F);

            let mut remaining = self.number;
            let mut bytes = Vec::new();
            while remaining > 0 {
                bytes.push((remaining & 0x7F) as u8);
                remaining >>= 7;
            }

            // Continuation bit on all but the last byte
            for (i, &byte) in bytes.iter().rev().enumerate() {
                if i < bytes.len() - 1 {
                    result.push(byte | 0x80);
                } else {
                    result.push(byte);
                }
            }
        }

        result
    }

    /// Decode tag from bytes
    ///
    /// # Returns
    /// Returns `Ok((BerTag, bytes_consumed))` if successful
    ///
    /// # Error Handling
    /// Returns a `Decoding` error if the buffer is empty or an extended tag
    /// is truncated or does not fit in 32 bits.
    pub fn decode(data: &[u8]) -> LdapResult<(Self, usize)> {
        if data.is_empty() {
            return Err(LdapError::decoding("buffer exhausted while reading tag"));
        }

        let first_byte = data[0];
        let class = BerTagClass::from_bits(first_byte);
        let constructed = (first_byte & 0x20) != 0;
        let tag_bits = first_byte & 0x1F;

        if tag_bits < 31 {
            return Ok((Self::new(class, constructed, tag_bits as u32), 1));
        }

        let mut tag_number = 0u32;
        let mut pos = 1;
        let mut has_more = true;

        while has_more && pos < data.len() {
            let byte = data[pos];
            has_more = (byte & 0x80) != 0;
            tag_number = (tag_number << 7) | ((byte & 0x7F) as u32);
            pos += 1;

            // max 5 bytes for u32
            if pos > 5 {
                return Err(LdapError::decoding(
                    "tag number too large or invalid encoding",
                ));
            }
        }

        if has_more {
            return Err(LdapError::decoding("incomplete extended tag encoding"));
        }

        Ok((Self::new(class, constructed, tag_number), pos))
    }
}

/// BER Length encoding
///
/// # Encoding Format
///
/// Short form:
/// ```text
/// Byte: 0 L L L L L L L
/// ```
///
/// Long form:
/// ```text
/// First byte:  1 N N N N N N N  (N = number of length bytes)
/// Following bytes: L L L L L L L L  (big-endian length value)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BerLength {
    /// Short form: length 0-127
    Short(u8),
    /// Long form: length encoded with length-of-length
    Long(usize),
}

impl BerLength {
    /// Create a new BER length, choosing the short form whenever possible
    pub fn new(length: usize) -> Self {
        if length < 128 {
            BerLength::Short(length as u8)
        } else {
            BerLength::Long(length)
        }
    }

    /// Get the length value
    pub fn value(&self) -> usize {
        match self {
            BerLength::Short(l) => *l as usize,
            BerLength::Long(l) => *l,
        }
    }

    /// Number of bytes the encoded form of this length occupies
    pub fn encoded_len(&self) -> usize {
        match self {
            BerLength::Short(_) => 1,
            BerLength::Long(length) => 1 + Self::significant_bytes(*length),
        }
    }

    fn significant_bytes(length: usize) -> usize {
        let mut num_bytes = 0;
        let mut temp = length;
        while temp > 0 {
            num_bytes += 1;
            temp >>= 8;
        }
        num_bytes.max(1)
    }

    /// Encode length to bytes
    pub fn encode(&self) -> Vec<u8> {
        match self {
            BerLength::Short(length) => vec![*length],
            BerLength::Long(length) => {
                let num_bytes = Self::significant_bytes(*length);
                let mut result = vec![0x80 | (num_bytes as u8)];
                for i in (0..num_bytes).rev() {
                    result.push(((*length >> (i * 8)) & 0xFF) as u8);
                }
                result
            }
        }
    }

    /// Decode length from bytes
    ///
    /// # Returns
    /// Returns `Ok((BerLength, bytes_consumed))` if successful
    ///
    /// # Error Handling
    /// Returns a `Decoding` error if:
    /// - Buffer is too short
    /// - The indefinite form (`0x80`) is used
    /// - More than 4 length bytes are announced
    pub fn decode(data: &[u8]) -> LdapResult<(Self, usize)> {
        if data.is_empty() {
            return Err(LdapError::decoding("buffer exhausted while reading length"));
        }

        let first_byte = data[0];

        if (first_byte & 0x80) == 0 {
            return Ok((BerLength::Short(first_byte & 0x7F), 1));
        }

        let num_bytes = (first_byte & 0x7F) as usize;

        if num_bytes == 0 {
            return Err(LdapError::decoding(
                "indefinite length encoding not supported",
            ));
        }

        if num_bytes > 4 {
            return Err(LdapError::decoding(format!(
                "length encoding too large: {} bytes (max 4)",
                num_bytes
            )));
        }

        if data.len() < 1 + num_bytes {
            return Err(LdapError::decoding(format!(
                "buffer too short for long form length: need {} bytes, got {}",
                1 + num_bytes,
                data.len()
            )));
        }

        let mut length = 0usize;
        for i in 0..num_bytes {
            length = (length << 8) | (data[1 + i] as usize);
        }

        Ok((BerLength::Long(length), 1 + num_bytes))
    }
}
