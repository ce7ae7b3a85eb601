//! Typing state - transient per-conversation flags

use std::collections::{BTreeMap, BTreeSet};

use crate::value_objects::ParticipantId;

/// Live typing slice of one conversation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypingState {
    flags: BTreeMap<ParticipantId, bool>,
}

impl TypingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite one participant's flag
    pub fn set(&mut self, participant: ParticipantId, typing: bool) {
        self.flags.insert(participant, typing);
    }

    /// Check if a participant is currently typing
    pub fn is_typing(&self, participant: &ParticipantId) -> bool {
        self.flags.get(participant).copied().unwrap_or(false)
    }

    /// Participants other than `viewer` whose flag is set
    pub fn typing_others(&self, viewer: &ParticipantId) -> BTreeSet<ParticipantId> {
        self.flags
            .iter()
            .filter(|(participant, typing)| **typing && *participant != viewer)
            .map(|(participant, _)| participant.clone())
            .collect()
    }
}

impl FromIterator<(ParticipantId, bool)> for TypingState {
    fn from_iter<I: IntoIterator<Item = (ParticipantId, bool)>>(iter: I) -> Self {
        Self {
            flags: iter.into_iter().collect(),
        }
    }
}
