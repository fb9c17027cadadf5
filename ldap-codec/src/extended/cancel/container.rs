use ldap_asn1::ber::{Asn1Container, BerDecoder, BerTag, DecodeProgress, DecoderState};
use ldap_core::{LdapError, LdapResult};

use super::Cancel;

/// Longest accepted cancelId content, in octets
const MAX_CANCEL_ID_LENGTH: usize = 4;

/// Decode state of one Cancel request value
///
/// Single use: create one per decode and discard it afterwards, whether
/// the decode succeeded or not.
#[derive(Debug, Default)]
pub struct CancelContainer {
    progress: DecodeProgress,
    cancel: Option<Cancel>,
}

impl CancelContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position in the decode state machine
    pub fn state(&self) -> DecoderState {
        self.progress.state()
    }

    /// Decoded request, available once the decode is done
    pub fn cancel(&self) -> Option<&Cancel> {
        match self.progress.state() {
            DecoderState::Done => self.cancel.as_ref(),
            _ => None,
        }
    }

    /// Take the decoded request
    ///
    /// # Error Handling
    /// Returns `Decoding` if the decode did not complete.
    pub fn into_cancel(self) -> LdapResult<Cancel> {
        let state = self.progress.state();
        match (state, self.cancel) {
            (DecoderState::Done, Some(cancel)) => Ok(cancel),
            _ => Err(LdapError::decoding(format!(
                "Cancel decoding not complete (state {})",
                state.as_str()
            ))),
        }
    }
}

impl Asn1Container for CancelContainer {
    fn name(&self) -> &'static str {
        "Cancel"
    }

    fn progress(&self) -> &DecodeProgress {
        &self.progress
    }

    fn progress_mut(&mut self) -> &mut DecodeProgress {
        &mut self.progress
    }

    fn on_field(&mut self, tag: BerTag, value: &[u8]) -> LdapResult<()> {
        if self.cancel.is_some() {
            return Err(LdapError::decoding("unexpected extra field"));
        }
        if tag != BerTag::INTEGER {
            return Err(LdapError::decoding(format!(
                "bad cancelId tag: {:?}",
                tag
            )));
        }
        if value.is_empty() {
            return Err(LdapError::decoding("empty cancelId"));
        }
        if value.len() > MAX_CANCEL_ID_LENGTH {
            log::debug!("cancelId spans {} octets", value.len());
            return Err(LdapError::decoding("bad cancelId"));
        }

        let cancel_id = BerDecoder::parse_integer_in_range(value, 0, i32::MAX as i64)
            .map_err(|e| {
                log::debug!("cancelId rejected: {}", e);
                LdapError::decoding("bad cancelId")
            })?;
        log::trace!("cancelId = {}", cancel_id);
        self.cancel = Some(Cancel::new(cancel_id as i32));
        Ok(())
    }

    fn finish(&mut self) -> LdapResult<()> {
        if self.cancel.is_none() {
            return Err(LdapError::decoding("cancelId required"));
        }
        Ok(())
    }
}
