//! ASN.1 processing for LDAP protocol payloads
//!
//! This crate provides the BER primitive codec (tags, lengths, INTEGER,
//! OCTET STRING, SEQUENCE) and the container-driven decoder used by the
//! extended-operation codecs.
//!
//! # Decoding model
//!
//! An [`Asn1Decoder`] is stateless and may be shared across threads. Every
//! decode call works on its own container (an [`Asn1Container`]
//! implementation) holding the mutable per-decode state: the TLV state
//! machine position, the expected and consumed lengths, and the typed
//! object under construction.

pub mod ber;
pub mod config;

pub use ber::{
    Asn1Container, Asn1Decoder, BerDecoder, BerEncoder, BerLength, BerTag, BerTagClass,
    DecodeProgress, DecoderState,
};
pub use config::DecoderConfig;
