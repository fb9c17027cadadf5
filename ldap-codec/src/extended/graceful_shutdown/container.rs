use ldap_asn1::DecoderConfig;
use ldap_asn1::ber::{Asn1Container, Asn1Decoder, BerDecoder, BerTag, DecodeProgress, DecoderState};
use ldap_core::{LdapError, LdapResult};

use super::{DELAY_TAG, GracefulShutdown, MAX_DELAY, MAX_TIME_OFFSET};

/// Decode state of one Graceful Shutdown request value
///
/// Both fields are optional, but `timeOffset` must come before `delay` and
/// each appears at most once.
#[derive(Debug, Default)]
pub struct GracefulShutdownContainer {
    progress: DecodeProgress,
    time_offset: Option<u32>,
    delay: Option<u32>,
}

impl GracefulShutdownContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DecoderState {
        self.progress.state()
    }

    /// Take the decoded request, missing fields set to their default
    ///
    /// # Error Handling
    /// Returns `Decoding` if the decode did not complete.
    pub fn into_request(self) -> LdapResult<GracefulShutdown> {
        if self.progress.state() != DecoderState::Done {
            return Err(LdapError::decoding(format!(
                "GracefulShutdown decoding not complete (state {})",
                self.progress.state().as_str()
            )));
        }
        Ok(GracefulShutdown::new(
            self.time_offset.unwrap_or(0),
            self.delay.unwrap_or(0),
        ))
    }
}

fn parse_bounded(value: &[u8], max: u32, field: &str) -> LdapResult<u32> {
    if value.is_empty() {
        return Err(LdapError::decoding(format!("empty {}", field)));
    }
    BerDecoder::parse_integer_in_range(value, 0, max as i64)
        .map(|v| v as u32)
        .map_err(|e| {
            log::debug!("{} rejected: {}", field, e);
            LdapError::decoding(format!("bad {}", field))
        })
}

impl Asn1Container for GracefulShutdownContainer {
    fn name(&self) -> &'static str {
        "GracefulShutdown"
    }

    fn progress(&self) -> &DecodeProgress {
        &self.progress
    }

    fn progress_mut(&mut self) -> &mut DecodeProgress {
        &mut self.progress
    }

    fn on_field(&mut self, tag: BerTag, value: &[u8]) -> LdapResult<()> {
        if tag == BerTag::INTEGER {
            if self.time_offset.is_some() || self.delay.is_some() {
                return Err(LdapError::decoding("unexpected timeOffset"));
            }
            self.time_offset = Some(parse_bounded(value, MAX_TIME_OFFSET, "timeOffset")?);
        } else if tag == DELAY_TAG {
            if self.delay.is_some() {
                return Err(LdapError::decoding("unexpected delay"));
            }
            self.delay = Some(parse_bounded(value, MAX_DELAY, "delay")?);
        } else {
            return Err(LdapError::decoding("unexpected extra field"));
        }
        Ok(())
    }

    fn finish(&mut self) -> LdapResult<()> {
        Ok(())
    }
}

/// Decoder for Graceful Shutdown request values
#[derive(Debug, Clone, Default)]
pub struct GracefulShutdownDecoder {
    inner: Asn1Decoder,
}

impl GracefulShutdownDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            inner: Asn1Decoder::with_config(config),
        }
    }

    pub fn decode(&self, data: &[u8], container: &mut GracefulShutdownContainer) -> LdapResult<()> {
        self.inner.decode(data, container)
    }

    /// Decode `data` with a fresh container
    ///
    /// An absent request value (no bytes at all) is the default request.
    pub fn decode_request(&self, data: &[u8]) -> LdapResult<GracefulShutdown> {
        if data.is_empty() {
            return Ok(GracefulShutdown::default());
        }
        let mut container = GracefulShutdownContainer::new();
        self.decode(data, &mut container)?;
        container.into_request()
    }
}
