//! Per-decode state for SEQUENCE-wrapped PDUs
//!
//! A container owns everything that changes while one PDU is decoded: the
//! position in the TLV state machine, the declared and consumed lengths and
//! the typed object being filled in. It belongs to a single decode call and
//! must not be shared between concurrent decodes.

use ldap_core::{LdapError, LdapResult};

use crate::ber::types::BerTag;

/// Position in the TLV state machine
///
/// # State Transitions
/// ```text
/// Start -> ExpectSequenceTag              (decode begins)
/// ExpectSequenceTag -> ExpectFieldTag     (SEQUENCE header read, content follows)
/// ExpectSequenceTag -> Done               (empty SEQUENCE)
/// ExpectFieldTag -> ExpectFieldLength
/// ExpectFieldLength -> ExpectFieldValue
/// ExpectFieldValue -> ExpectFieldTag      (more content in the SEQUENCE)
/// ExpectFieldValue -> Done                (SEQUENCE content consumed)
/// any non-terminal state -> Failed
/// ```
///
/// `Done` and `Failed` are terminal: a container that reached either is
/// discarded, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecoderState {
    /// Nothing read yet (initial state)
    #[default]
    Start,
    /// Waiting for the outer SEQUENCE tag and length
    ExpectSequenceTag,
    /// Waiting for the tag of the next field
    ExpectFieldTag,
    /// Waiting for the length of the current field
    ExpectFieldLength,
    /// Waiting for the value octets of the current field
    ExpectFieldValue,
    /// The PDU is fully decoded
    Done,
    /// Decoding failed; no partial result is available
    Failed,
}

impl DecoderState {
    /// Check if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, DecoderState::Done | DecoderState::Failed)
    }

    /// Validate state transition
    pub fn validate_transition(&self, new_state: DecoderState) -> LdapResult<()> {
        use DecoderState::*;

        let valid = match (*self, new_state) {
            (Start, ExpectSequenceTag) => true,
            (ExpectSequenceTag, ExpectFieldTag) => true,
            (ExpectSequenceTag, Done) => true,
            (ExpectFieldTag, ExpectFieldLength) => true,
            (ExpectFieldLength, ExpectFieldValue) => true,
            (ExpectFieldValue, ExpectFieldTag) => true,
            (ExpectFieldValue, Done) => true,
            (from, Failed) => !from.is_terminal(),
            _ => false,
        };

        if valid {
            Ok(())
        } else {
            Err(LdapError::decoding(format!(
                "invalid decoder state transition: {:?} -> {:?}",
                self, new_state
            )))
        }
    }

    /// Get human-readable state name
    pub fn as_str(&self) -> &'static str {
        match self {
            DecoderState::Start => "START",
            DecoderState::ExpectSequenceTag => "EXPECT_SEQUENCE_TAG",
            DecoderState::ExpectFieldTag => "EXPECT_FIELD_TAG",
            DecoderState::ExpectFieldLength => "EXPECT_FIELD_LENGTH",
            DecoderState::ExpectFieldValue => "EXPECT_FIELD_VALUE",
            DecoderState::Done => "DONE",
            DecoderState::Failed => "FAILED",
        }
    }
}

/// State machine position plus expected/consumed SEQUENCE content length
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeProgress {
    state: DecoderState,
    expected_length: usize,
    consumed: usize,
}

impl DecodeProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current state
    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Transition to a new state with validation
    pub fn transition_to(&mut self, new_state: DecoderState) -> LdapResult<()> {
        self.state.validate_transition(new_state)?;
        log::trace!("decoder state {} -> {}", self.state.as_str(), new_state.as_str());
        self.state = new_state;
        Ok(())
    }

    /// Declared length of the SEQUENCE content
    pub fn expected_length(&self) -> usize {
        self.expected_length
    }

    pub fn set_expected_length(&mut self, length: usize) {
        self.expected_length = length;
    }

    /// Bytes of SEQUENCE content consumed so far
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Account for `count` more content bytes
    ///
    /// # Error Handling
    /// Fails if the content would overrun the declared SEQUENCE length.
    pub fn consume(&mut self, count: usize) -> LdapResult<()> {
        let consumed = self.consumed + count;
        if consumed > self.expected_length {
            return Err(LdapError::decoding(format!(
                "field overruns SEQUENCE: {} bytes declared, {} used",
                self.expected_length, consumed
            )));
        }
        self.consumed = consumed;
        Ok(())
    }

    /// Check if the whole SEQUENCE content has been consumed
    pub fn is_complete(&self) -> bool {
        self.consumed == self.expected_length
    }
}

/// Mutable, single-use decode target for one SEQUENCE-wrapped PDU
///
/// The generic [`Asn1Decoder`](crate::ber::Asn1Decoder) reads the TLV
/// structure and calls back into the container; the container validates
/// each field against the PDU grammar and builds the typed object.
pub trait Asn1Container {
    /// Name of the PDU, used in log messages
    fn name(&self) -> &'static str;

    fn progress(&self) -> &DecodeProgress;

    fn progress_mut(&mut self) -> &mut DecodeProgress;

    /// Handle one field of the SEQUENCE content
    ///
    /// Called in the `ExpectFieldValue` state with the raw value octets.
    fn on_field(&mut self, tag: BerTag, value: &[u8]) -> LdapResult<()>;

    /// Check the PDU is complete once the SEQUENCE content is consumed
    ///
    /// Called right before the transition to `Done`; this is where required
    /// fields are enforced.
    fn finish(&mut self) -> LdapResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let mut progress = DecodeProgress::new();
        for state in [
            DecoderState::ExpectSequenceTag,
            DecoderState::ExpectFieldTag,
            DecoderState::ExpectFieldLength,
            DecoderState::ExpectFieldValue,
            DecoderState::ExpectFieldTag,
            DecoderState::ExpectFieldLength,
            DecoderState::ExpectFieldValue,
            DecoderState::Done,
        ] {
            progress.transition_to(state).unwrap();
        }
        assert!(progress.state().is_terminal());
    }

    #[test]
    fn test_invalid_transitions() {
        let mut progress = DecodeProgress::new();
        assert!(progress.transition_to(DecoderState::ExpectFieldTag).is_err());
        progress.transition_to(DecoderState::Failed).unwrap();
        assert!(progress.transition_to(DecoderState::Failed).is_err());
        assert!(progress.transition_to(DecoderState::ExpectSequenceTag).is_err());
    }

    #[test]
    fn test_empty_sequence_goes_straight_to_done() {
        let mut progress = DecodeProgress::new();
        progress.transition_to(DecoderState::ExpectSequenceTag).unwrap();
        progress.transition_to(DecoderState::Done).unwrap();
        assert_eq!(progress.state().as_str(), "DONE");
    }

    #[test]
    fn test_consume_bounds() {
        let mut progress = DecodeProgress::new();
        progress.set_expected_length(3);
        progress.consume(2).unwrap();
        assert!(!progress.is_complete());
        progress.consume(1).unwrap();
        assert!(progress.is_complete());
        assert!(progress.consume(1).is_err());
        assert_eq!(progress.consumed(), 3);
    }
}
