//! Graceful Shutdown extended operation (Apache Directory)
//!
//! # Request Value
//! ```text
//! GracefulShutdown ::= SEQUENCE {
//!     timeOffset  INTEGER (0..720) DEFAULT 0,
//!     delay       [0] INTEGER (0..86400) DEFAULT 0
//! }
//! ```
//!
//! `timeOffset` is in minutes, `delay` in seconds. Fields equal to their
//! default are left out when encoding.

mod container;
mod factory;

pub use container::{GracefulShutdownContainer, GracefulShutdownDecoder};
pub use factory::{GracefulShutdownFactory, GracefulShutdownResponse};

use bytes::Bytes;
use ldap_asn1::ber::{BerEncoder, BerTag};
use ldap_core::{LdapError, LdapResult};

pub(crate) const MAX_TIME_OFFSET: u32 = 720;
pub(crate) const MAX_DELAY: u32 = 86_400;

/// Context tag of the `delay` field
pub(crate) const DELAY_TAG: BerTag = BerTag::context_specific(false, 0);

/// Request value of the Graceful Shutdown extended operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GracefulShutdown {
    time_offset: u32,
    delay: u32,
}

impl GracefulShutdown {
    /// OID of the Graceful Shutdown extended request
    pub const EXTENSION_OID: &'static str = "1.3.6.1.4.1.18060.0.1.3";

    pub fn new(time_offset: u32, delay: u32) -> Self {
        Self { time_offset, delay }
    }

    /// Minutes before the server goes offline
    pub fn time_offset(&self) -> u32 {
        self.time_offset
    }

    /// Seconds between the notice of disconnection and the shutdown
    pub fn delay(&self) -> u32 {
        self.delay
    }

    pub fn set_time_offset(&mut self, time_offset: u32) {
        self.time_offset = time_offset;
    }

    pub fn set_delay(&mut self, delay: u32) {
        self.delay = delay;
    }

    /// Encode the request value
    ///
    /// # Error Handling
    /// Returns `Encoding` if a field is out of its range.
    pub fn encode(&self) -> LdapResult<Bytes> {
        if self.time_offset > MAX_TIME_OFFSET {
            return Err(LdapError::Encoding(format!(
                "timeOffset {} out of range [0, {}]",
                self.time_offset, MAX_TIME_OFFSET
            )));
        }
        if self.delay > MAX_DELAY {
            return Err(LdapError::Encoding(format!(
                "delay {} out of range [0, {}]",
                self.delay, MAX_DELAY
            )));
        }

        let mut fields = BerEncoder::new();
        if self.time_offset != 0 {
            fields.encode_integer(self.time_offset as i64);
        }
        if self.delay != 0 {
            fields.encode_tlv(&DELAY_TAG, &BerEncoder::integer_content(self.delay as i64));
        }

        let mut encoder = BerEncoder::with_capacity(fields.len() + 2);
        encoder.encode_sequence(fields.as_bytes());
        Ok(encoder.into_bytes())
    }

    /// Decode a request value with the default decoder configuration
    pub fn decode(data: &[u8]) -> LdapResult<Self> {
        GracefulShutdownDecoder::new().decode_request(data)
    }
}
