//! Realtime store implementation of MessageRepository

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use chat_core::entities::{Message, MessageDraft, MessagePatch};
use chat_core::traits::{Listener, MessageRepository, RealtimeStore, RepoResult, Subscription};
use chat_core::value_objects::{ConversationId, MessageId};

use crate::layout::StoreLayout;
use crate::mappers::messages_from_snapshot;
use crate::models::{MessageModel, SeenModel};

use super::error::{map_encode_error, message_not_found};

/// Realtime store implementation of MessageRepository
#[derive(Clone)]
pub struct RealtimeMessageRepository {
    store: Arc<dyn RealtimeStore>,
    layout: StoreLayout,
}

impl RealtimeMessageRepository {
    /// Create a new RealtimeMessageRepository
    pub fn new(store: Arc<dyn RealtimeStore>, layout: StoreLayout) -> Self {
        Self { store, layout }
    }
}

#[async_trait]
impl MessageRepository for RealtimeMessageRepository {
    #[instrument(skip(self, on_change))]
    fn subscribe(
        &self,
        conversation: &ConversationId,
        on_change: Listener<Vec<Message>>,
    ) -> RepoResult<Subscription> {
        let path = self.layout.conversation(conversation)?;
        let conversation = conversation.clone();
        let typing_key = self.layout.typing_key().to_string();
        let last: Mutex<Option<Vec<Message>>> = Mutex::new(None);

        // Typing writes land in the same partition; only message changes are delivered.
        // The store hands this listener one snapshot at a time, newest last.
        let listener: Listener<Value> = Arc::new(move |snapshot: Value| {
            let messages = messages_from_snapshot(&conversation, &snapshot, &typing_key);
            {
                let mut last = last.lock();
                if last.as_ref() == Some(&messages) {
                    return;
                }
                *last = Some(messages.clone());
            }
            debug!(count = messages.len(), "Message snapshot");
            on_change(messages);
        });

        self.store.subscribe(&path, listener)
    }

    fn reserve_id(&self, conversation: &ConversationId) -> RepoResult<MessageId> {
        let path = self.layout.conversation(conversation)?;
        Ok(MessageId::new(self.store.push_key(&path)))
    }

    #[instrument(skip(self, draft), fields(sender = %draft.sender))]
    async fn append(
        &self,
        conversation: &ConversationId,
        draft: MessageDraft,
    ) -> RepoResult<Message> {
        let id = match draft.id.clone() {
            Some(id) => id,
            None => self.reserve_id(conversation)?,
        };
        let path = self.layout.message(conversation, &id)?;

        let message = Message::from_draft(id, conversation.clone(), draft);
        let record = serde_json::to_value(MessageModel::from(&message)).map_err(map_encode_error)?;

        self.store.set(&path, record).await?;

        info!(message_id = %message.id, "Message appended");
        Ok(message)
    }

    #[instrument(skip(self))]
    async fn update(
        &self,
        conversation: &ConversationId,
        message_id: &MessageId,
        patch: MessagePatch,
    ) -> RepoResult<()> {
        let path = self.layout.message(conversation, message_id)?;

        if self.store.once(&path).await?.is_null() {
            return Err(message_not_found(message_id));
        }

        let mut fields = Map::new();
        match &patch {
            MessagePatch::Reaction { participant, emoji } => {
                fields.insert(format!("reactions/{participant}"), Value::String(emoji.clone()));
            }
            MessagePatch::Seen(receipt) => {
                let seen = serde_json::to_value(SeenModel::from(receipt)).map_err(map_encode_error)?;
                fields.insert("seen".to_string(), seen);
            }
        }

        self.store.update(&path, fields).await?;

        info!("Message updated");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_all(&self, conversation: &ConversationId) -> RepoResult<Vec<Message>> {
        let path = self.layout.conversation(conversation)?;
        let snapshot = self.store.once(&path).await?;

        Ok(messages_from_snapshot(
            conversation,
            &snapshot,
            self.layout.typing_key(),
        ))
    }

    #[instrument(skip(self))]
    async fn latest(&self, conversation: &ConversationId) -> RepoResult<Option<Message>> {
        let messages = self.find_all(conversation).await?;

        // Records without a timestamp count as just sent, like in an open feed
        let now = Utc::now();
        Ok(messages
            .into_iter()
            .max_by(|a, b| a.order_key(now).cmp(&b.order_key(now))))
    }
}
