//! Repository traits (ports) - define the interface for data access
//!
//! These traits follow the Repository pattern from Domain-Driven Design.
//! The domain layer defines what it needs, and the store adapters
//! provide the implementation on top of the realtime keyed store.

use async_trait::async_trait;

use crate::entities::{Group, Message, MessageDraft, MessagePatch, Profile, ProfilePatch, TypingState};
use crate::error::DomainError;
use crate::value_objects::{ConversationId, GroupId, MessageId, ParticipantId};

use super::subscription::{Listener, Subscription};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Message Repository
// ============================================================================

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Listen to every message of a conversation
    ///
    /// `on_change` receives the full current message set immediately and after
    /// every insert or update. The typing slice is not part of it.
    fn subscribe(
        &self,
        conversation: &ConversationId,
        on_change: Listener<Vec<Message>>,
    ) -> RepoResult<Subscription>;

    /// Reserve a fresh message key without writing
    fn reserve_id(&self, conversation: &ConversationId) -> RepoResult<MessageId>;

    /// Write a new message, assigning a key when the draft has none
    async fn append(&self, conversation: &ConversationId, draft: MessageDraft)
        -> RepoResult<Message>;

    /// Merge a field-level change into an existing message
    async fn update(
        &self,
        conversation: &ConversationId,
        message_id: &MessageId,
        patch: MessagePatch,
    ) -> RepoResult<()>;

    /// Read all messages once
    async fn find_all(&self, conversation: &ConversationId) -> RepoResult<Vec<Message>>;

    /// Newest message of a conversation
    async fn latest(&self, conversation: &ConversationId) -> RepoResult<Option<Message>>;
}

// ============================================================================
// Typing Repository
// ============================================================================

#[async_trait]
pub trait TypingRepository: Send + Sync {
    /// Listen to the typing slice of a conversation
    fn subscribe(
        &self,
        conversation: &ConversationId,
        on_change: Listener<TypingState>,
    ) -> RepoResult<Subscription>;

    /// Overwrite one participant's typing flag
    async fn set_typing(
        &self,
        conversation: &ConversationId,
        participant: &ParticipantId,
        typing: bool,
    ) -> RepoResult<()>;
}

// ============================================================================
// Group Repository
// ============================================================================

#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Reserve a fresh group key
    fn next_id(&self) -> RepoResult<GroupId>;

    /// Find group by ID
    async fn find_by_id(&self, id: &GroupId) -> RepoResult<Option<Group>>;

    /// List every group
    async fn find_all(&self) -> RepoResult<Vec<Group>>;

    /// Store a new group
    async fn create(&self, group: &Group) -> RepoResult<()>;

    /// Listen to the group table
    fn subscribe(&self, on_change: Listener<Vec<Group>>) -> RepoResult<Subscription>;
}

// ============================================================================
// Profile Repository
// ============================================================================

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find profile by participant ID
    async fn find_by_id(&self, id: &ParticipantId) -> RepoResult<Option<Profile>>;

    /// List every profile
    async fn find_all(&self) -> RepoResult<Vec<Profile>>;

    /// Merge the set fields of `patch` into a profile (creating it if needed)
    async fn update(&self, id: &ParticipantId, patch: &ProfilePatch) -> RepoResult<()>;

    /// Listen to the profile table
    fn subscribe(&self, on_change: Listener<Vec<Profile>>) -> RepoResult<Subscription>;
}
