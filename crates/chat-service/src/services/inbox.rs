//! Inbox service
//!
//! Builds the conversation list: one row per contact with a preview of the
//! latest direct message.

use tracing::instrument;

use chat_core::value_objects::{ConversationId, ParticipantId};

use crate::dto::{ContactResponse, ConversationPreview, EMPTY_CONVERSATION_PREVIEW};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::profile::ProfileService;

/// Inbox service
pub struct InboxService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> InboxService<'a> {
    /// Create a new InboxService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Preview rows for every contact of `viewer`, in directory order
    #[instrument(skip(self))]
    pub async fn previews(&self, viewer: &ParticipantId) -> ServiceResult<Vec<ConversationPreview>> {
        let directory = ProfileService::new(self.ctx).directory().await?;

        let mut previews = Vec::with_capacity(directory.len());
        for contact in directory.contacts(viewer, "") {
            let conversation_id = ConversationId::direct(viewer, &contact.id);
            let latest = self.ctx.message_repo().latest(&conversation_id).await?;

            let (preview, last_sent_at) = match latest {
                Some(message) => (message.content.preview(), message.sent_at),
                None => (EMPTY_CONVERSATION_PREVIEW.to_string(), None),
            };

            previews.push(ConversationPreview {
                contact: ContactResponse::from(contact),
                conversation_id,
                preview,
                last_sent_at,
            });
        }

        Ok(previews)
    }
}
