//! Message service
//!
//! Handles message creation, reactions, and read receipts.

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use chat_core::entities::{Message, MessageContent, MessageDraft, MessagePatch, SeenReceipt};
use chat_core::value_objects::{ConversationId, MessageId, ParticipantId};

use crate::feed::pending_acknowledgement;

use super::context::ServiceContext;
use super::conversation::ConversationRef;
use super::error::{ServiceError, ServiceResult};

/// Message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    /// Create a new MessageService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Append a message to a conversation
    ///
    /// Group messages carry the sender's name and start unseen; direct
    /// messages record the receiver.
    #[instrument(skip(self, conversation, content), fields(kind = ?content.kind()))]
    pub async fn send(
        &self,
        conversation: &ConversationRef,
        sender: &ParticipantId,
        content: MessageContent,
        reserved_id: Option<MessageId>,
    ) -> ServiceResult<Message> {
        let mut draft = MessageDraft::new(sender.clone(), content);
        if let Some(id) = reserved_id {
            draft = draft.with_id(id);
        }

        draft = match conversation {
            ConversationRef::Direct { peer } => draft.with_receiver(peer.clone()),
            ConversationRef::Group(_) => {
                let sender_name = self
                    .ctx
                    .profile_repo()
                    .find_by_id(sender)
                    .await?
                    .and_then(|profile| profile.name);
                draft.with_sender_name(sender_name).track_seen()
            }
        };

        let conversation_id = conversation.id(sender);
        let message = self.ctx.message_repo().append(&conversation_id, draft).await?;

        info!(message_id = %message.id, conversation = %conversation_id, "Message sent");
        Ok(message)
    }

    /// Set `participant`'s reaction, replacing any earlier one
    #[instrument(skip(self))]
    pub async fn react(
        &self,
        conversation: &ConversationId,
        message_id: &MessageId,
        participant: &ParticipantId,
        emoji: &str,
    ) -> ServiceResult<()> {
        let emoji = emoji.trim();
        if emoji.is_empty() {
            return Err(ServiceError::validation("Reaction must not be empty"));
        }

        self.ctx
            .message_repo()
            .update(
                conversation,
                message_id,
                MessagePatch::Reaction {
                    participant: participant.clone(),
                    emoji: emoji.to_string(),
                },
            )
            .await?;

        info!("Reaction set");
        Ok(())
    }

    /// Mark a message seen now
    #[instrument(skip(self))]
    pub async fn mark_seen(&self, conversation: &ConversationId, message_id: &MessageId) -> ServiceResult<()> {
        self.ctx
            .message_repo()
            .update(
                conversation,
                message_id,
                MessagePatch::Seen(SeenReceipt::seen_at(Utc::now())),
            )
            .await?;

        debug!("Message marked seen");
        Ok(())
    }

    /// Acknowledge the newest message of `messages` if `viewer` still owes it
    ///
    /// Undated records count as sent at `fallback_time`, as in the feed.
    /// Returns the id that was marked seen.
    pub async fn acknowledge_latest(
        &self,
        conversation: &ConversationId,
        messages: &[Message],
        viewer: &ParticipantId,
        fallback_time: DateTime<Utc>,
    ) -> ServiceResult<Option<MessageId>> {
        let Some(pending) = pending_acknowledgement(messages, viewer, fallback_time) else {
            return Ok(None);
        };

        self.mark_seen(conversation, &pending.id).await?;
        Ok(Some(pending.id.clone()))
    }
}
