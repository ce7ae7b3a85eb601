//! Conversation handle shared by the composer, feeds and typing watches

use chat_core::entities::{ConversationKind, Group};
use chat_core::value_objects::{ConversationId, ParticipantId};

/// The conversation a participant has opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationRef {
    /// One-to-one conversation with `peer`
    Direct { peer: ParticipantId },
    Group(Group),
}

impl ConversationRef {
    pub fn direct(peer: ParticipantId) -> Self {
        Self::Direct { peer }
    }

    pub fn group(group: Group) -> Self {
        Self::Group(group)
    }

    /// Storage partition of the conversation as seen by `viewer`
    pub fn id(&self, viewer: &ParticipantId) -> ConversationId {
        match self {
            Self::Direct { peer } => ConversationId::direct(viewer, peer),
            Self::Group(group) => group.conversation_id(),
        }
    }

    pub fn kind(&self) -> ConversationKind {
        match self {
            Self::Direct { .. } => ConversationKind::Direct,
            Self::Group(_) => ConversationKind::Group,
        }
    }
}
