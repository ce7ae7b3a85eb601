//! Realtime store implementation of TypingRepository

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

use chat_core::entities::TypingState;
use chat_core::traits::{Listener, RealtimeStore, RepoResult, Subscription, TypingRepository};
use chat_core::value_objects::{ConversationId, ParticipantId};

use crate::layout::StoreLayout;
use crate::mappers::typing_state_from_value;

/// Realtime store implementation of TypingRepository
#[derive(Clone)]
pub struct RealtimeTypingRepository {
    store: Arc<dyn RealtimeStore>,
    layout: StoreLayout,
}

impl RealtimeTypingRepository {
    /// Create a new RealtimeTypingRepository
    pub fn new(store: Arc<dyn RealtimeStore>, layout: StoreLayout) -> Self {
        Self { store, layout }
    }
}

#[async_trait]
impl TypingRepository for RealtimeTypingRepository {
    fn subscribe(
        &self,
        conversation: &ConversationId,
        on_change: Listener<TypingState>,
    ) -> RepoResult<Subscription> {
        let path = self.layout.typing(conversation)?;
        let listener: Listener<Value> =
            Arc::new(move |snapshot: Value| on_change(typing_state_from_value(&snapshot)));

        self.store.subscribe(&path, listener)
    }

    #[instrument(skip(self))]
    async fn set_typing(
        &self,
        conversation: &ConversationId,
        participant: &ParticipantId,
        typing: bool,
    ) -> RepoResult<()> {
        let path = self.layout.typing_slot(conversation, participant)?;
        self.store.set(&path, Value::Bool(typing)).await?;

        debug!("Typing flag written");
        Ok(())
    }
}
