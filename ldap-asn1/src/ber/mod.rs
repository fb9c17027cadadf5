//! BER (Basic Encoding Rules) encoder and decoder for ASN.1
//!
//! This module provides BER encoding/decoding functionality for the ASN.1
//! structures carried in LDAP extended operations.
//!
//! # ASN.1 BER Encoding Overview
//!
//! Each ASN.1 value is encoded as a TLV (Tag-Length-Value) triplet:
//!
//! ```text
//! [Tag] [Length] [Value]
//! ```
//!
//! ## Tag Encoding
//!
//! ```text
//! Bits: 8 7 6 5 4 3 2 1
//!       C C P T T T T T
//! ```
//! Where:
//! - CC = Class (00=Universal, 01=Application, 10=Context, 11=Private)
//! - P = Primitive (0) or Constructed (1)
//! - TTTTT = Tag number (0-30), or 11111 indicates extended tag
//!
//! ## Length Encoding
//!
//! - **Short form** (1 byte): lengths 0-127, bit 7 = 0
//! - **Long form** (2-5 bytes): first byte `0x80 | n`, then `n` big-endian
//!   length bytes. Accepted on input; emitted only for lengths above 127.
//!
//! ## Universal types used by LDAP extended operations
//!
//! | Type         | Tag    |
//! |--------------|--------|
//! | INTEGER      | `0x02` |
//! | OCTET STRING | `0x04` |
//! | SEQUENCE     | `0x30` |
//!
//! Indefinite lengths are rejected: LDAP mandates definite-length BER.

pub mod asn1_decoder;
pub mod container;
pub mod decoder;
pub mod encoder;
pub mod types;

pub use asn1_decoder::Asn1Decoder;
pub use container::{Asn1Container, DecodeProgress, DecoderState};
pub use decoder::BerDecoder;
pub use encoder::BerEncoder;
pub use types::{BerLength, BerTag, BerTagClass};
