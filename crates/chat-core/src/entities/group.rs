//! Group entity - an explicit multi-participant conversation

use std::collections::BTreeSet;

use crate::value_objects::{ConversationId, GroupId, ParticipantId};

/// Whether a conversation is one-to-one or a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversationKind {
    Direct,
    Group,
}

impl ConversationKind {
    #[inline]
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group)
    }
}

/// Group entity
///
/// Membership is fixed at creation; there is no add/remove member operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub admin: ParticipantId,
    pub members: BTreeSet<ParticipantId>,
}

impl Group {
    /// Create a group; the admin is always a member
    pub fn new(
        id: GroupId,
        name: String,
        admin: ParticipantId,
        members: impl IntoIterator<Item = ParticipantId>,
    ) -> Self {
        let mut members: BTreeSet<_> = members.into_iter().collect();
        members.insert(admin.clone());
        Self {
            id,
            name,
            admin,
            members,
        }
    }

    /// Check if participant belongs to the group
    #[inline]
    pub fn is_member(&self, participant: &ParticipantId) -> bool {
        self.members.contains(participant)
    }

    /// Check if participant created the group
    #[inline]
    pub fn is_admin(&self, participant: &ParticipantId) -> bool {
        &self.admin == participant
    }

    /// Partition key of the group's messages
    pub fn conversation_id(&self) -> ConversationId {
        ConversationId::group(&self.id)
    }

    /// Case-insensitive name search
    pub fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }
}
