//! Store layout - where each kind of record lives in the keyed tree

use chat_common::StoreConfig;
use chat_core::error::DomainError;
use chat_core::traits::RepoResult;
use chat_core::value_objects::{ConversationId, GroupId, MessageId, ParticipantId, StorePath};

/// Resolves store paths for conversations, groups and profiles
///
/// ```text
/// {messages_root}/{conversation}/{message}
/// {messages_root}/{conversation}/{typing_key}/{participant}
/// {groups_root}/{group}
/// {profiles_root}/{profile_key_prefix}{participant}
/// ```
#[derive(Debug, Clone)]
pub struct StoreLayout {
    messages_root: String,
    groups_root: String,
    profiles_root: String,
    typing_key: String,
    profile_key_prefix: String,
}

impl Default for StoreLayout {
    fn default() -> Self {
        Self::new(&StoreConfig::default())
    }
}

impl StoreLayout {
    /// Build the layout from configuration
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            messages_root: config.messages_root.clone(),
            groups_root: config.groups_root.clone(),
            profiles_root: config.profiles_root.clone(),
            typing_key: config.typing_key.clone(),
            profile_key_prefix: config.profile_key_prefix.clone(),
        }
    }

    /// Reserved child of a conversation partition holding typing flags
    pub fn typing_key(&self) -> &str {
        &self.typing_key
    }

    /// Partition holding every message of a conversation
    pub fn conversation(&self, conversation: &ConversationId) -> RepoResult<StorePath> {
        Ok(StorePath::parse(&self.messages_root)?.child(conversation.as_str())?)
    }

    /// One message record
    pub fn message(
        &self,
        conversation: &ConversationId,
        message: &MessageId,
    ) -> RepoResult<StorePath> {
        if message.as_str() == self.typing_key {
            return Err(DomainError::ValidationError(format!(
                "message id '{message}' is reserved"
            )));
        }
        Ok(self.conversation(conversation)?.child(message.as_str())?)
    }

    /// Typing slice of a conversation
    pub fn typing(&self, conversation: &ConversationId) -> RepoResult<StorePath> {
        Ok(self.conversation(conversation)?.child(&self.typing_key)?)
    }

    /// Typing flag of one participant
    pub fn typing_slot(
        &self,
        conversation: &ConversationId,
        participant: &ParticipantId,
    ) -> RepoResult<StorePath> {
        Ok(self.typing(conversation)?.child(participant.as_str())?)
    }

    /// Group table
    pub fn groups(&self) -> RepoResult<StorePath> {
        Ok(StorePath::parse(&self.groups_root)?)
    }

    /// One group record
    pub fn group(&self, group: &GroupId) -> RepoResult<StorePath> {
        Ok(self.groups()?.child(group.as_str())?)
    }

    /// Profile table
    pub fn profiles(&self) -> RepoResult<StorePath> {
        Ok(StorePath::parse(&self.profiles_root)?)
    }

    /// One profile record
    pub fn profile(&self, participant: &ParticipantId) -> RepoResult<StorePath> {
        Ok(self.profiles()?.child(self.profile_key(participant))?)
    }

    /// Key of a participant's profile record
    pub fn profile_key(&self, participant: &ParticipantId) -> String {
        format!("{}{participant}", self.profile_key_prefix)
    }

    /// Participant owning a profile key, if the key follows the layout
    pub fn participant_from_profile_key(&self, key: &str) -> Option<ParticipantId> {
        key.strip_prefix(&self.profile_key_prefix)
            .filter(|id| !id.is_empty())
            .map(ParticipantId::from)
    }
}
