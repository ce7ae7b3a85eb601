//! Participant directory
//!
//! Read-only snapshot of every profile, used to resolve names and presence
//! while rendering feeds, typing indicators and contact lists.

use std::collections::BTreeMap;

use chat_core::entities::Profile;
use chat_core::value_objects::ParticipantId;

/// Snapshot of the profile table keyed by participant
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDirectory {
    profiles: BTreeMap<ParticipantId, Profile>,
}

impl ProfileDirectory {
    pub fn new(profiles: impl IntoIterator<Item = Profile>) -> Self {
        profiles.into_iter().collect()
    }

    pub fn get(&self, participant: &ParticipantId) -> Option<&Profile> {
        self.profiles.get(participant)
    }

    /// Name or pseudo the participant chose, if any
    pub fn known_name(&self, participant: &ParticipantId) -> Option<&str> {
        let profile = self.get(participant)?;
        profile
            .name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or_else(|| profile.pseudo.as_deref().filter(|pseudo| !pseudo.is_empty()))
    }

    /// Name shown for a participant; unknown participants show their raw id
    pub fn display_name<'a>(&'a self, participant: &'a ParticipantId) -> &'a str {
        self.get(participant)
            .map_or(participant.as_str(), Profile::display_name)
    }

    /// Presence flag of a participant
    pub fn is_online(&self, participant: &ParticipantId) -> bool {
        self.get(participant).is_some_and(|profile| profile.is_connected)
    }

    /// Everyone except `viewer` whose name or pseudo matches `query`
    ///
    /// An empty query lists everyone.
    pub fn contacts<'a>(&'a self, viewer: &ParticipantId, query: &str) -> Vec<&'a Profile> {
        let query = query.trim();
        self.profiles
            .values()
            .filter(|profile| &profile.id != viewer)
            .filter(|profile| query.is_empty() || profile.matches(query))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl FromIterator<Profile> for ProfileDirectory {
    fn from_iter<I: IntoIterator<Item = Profile>>(iter: I) -> Self {
        Self {
            profiles: iter
                .into_iter()
                .map(|profile| (profile.id.clone(), profile))
                .collect(),
        }
    }
}
