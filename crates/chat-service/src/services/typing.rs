//! Typing indicators
//!
//! Each participant owns one boolean slot per conversation. The tracker
//! writes it only when the input buffer flips between empty and non-empty,
//! and the watch turns the shared slice into the set of other typists.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use chat_core::entities::TypingState;
use chat_core::traits::Subscription;
use chat_core::value_objects::{ConversationId, ParticipantId};

use crate::directory::ProfileDirectory;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Local typing phase of one participant in one conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypingPhase {
    #[default]
    Idle,
    Typing,
}

/// Writes the participant's typing flag on input transitions
pub struct TypingTracker {
    ctx: ServiceContext,
    conversation: ConversationId,
    participant: ParticipantId,
    phase: TypingPhase,
}

impl TypingTracker {
    pub fn new(ctx: ServiceContext, conversation: ConversationId, participant: ParticipantId) -> Self {
        Self {
            ctx,
            conversation,
            participant,
            phase: TypingPhase::Idle,
        }
    }

    pub fn phase(&self) -> TypingPhase {
        self.phase
    }

    /// Input buffer changed
    pub async fn input_changed(&mut self, text: &str) -> ServiceResult<()> {
        let next = if text.is_empty() {
            TypingPhase::Idle
        } else {
            TypingPhase::Typing
        };
        self.transition(next).await
    }

    /// A message was sent; the participant is no longer typing
    pub async fn message_sent(&mut self) -> ServiceResult<()> {
        self.transition(TypingPhase::Idle).await
    }

    #[instrument(skip(self), fields(conversation = %self.conversation, participant = %self.participant))]
    async fn transition(&mut self, next: TypingPhase) -> ServiceResult<()> {
        if next == self.phase {
            return Ok(());
        }

        let typing = next == TypingPhase::Typing;
        if let Err(e) = self
            .ctx
            .typing_repo()
            .set_typing(&self.conversation, &self.participant, typing)
            .await
        {
            warn!(error = %e, typing, "Typing flag write failed");
            return Err(e.into());
        }

        debug!(typing, "Typing phase changed");
        self.phase = next;
        Ok(())
    }
}

/// Live set of other participants typing in a conversation
///
/// Dropping the watch releases the underlying subscription.
pub struct TypingWatch {
    receiver: watch::Receiver<BTreeSet<ParticipantId>>,
    _subscription: Subscription,
}

impl TypingWatch {
    /// Participants currently typing
    pub fn current(&self) -> BTreeSet<ParticipantId> {
        self.receiver.borrow().clone()
    }

    /// A receiver for UI code that awaits changes itself
    pub fn receiver(&self) -> watch::Receiver<BTreeSet<ParticipantId>> {
        self.receiver.clone()
    }

    /// Wait for the next change
    pub async fn changed(&mut self) -> ServiceResult<BTreeSet<ParticipantId>> {
        self.receiver
            .changed()
            .await
            .map_err(|_| ServiceError::internal("typing watch closed"))?;
        Ok(self.receiver.borrow_and_update().clone())
    }
}

/// Typing service
pub struct TypingService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TypingService<'a> {
    /// Create a new TypingService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Watch who else is typing in `conversation`
    #[instrument(skip(self))]
    pub fn watch(&self, conversation: &ConversationId, viewer: &ParticipantId) -> ServiceResult<TypingWatch> {
        let (sender, receiver) = watch::channel(BTreeSet::new());
        let viewer = viewer.clone();

        let subscription = self.ctx.typing_repo().subscribe(
            conversation,
            Arc::new(move |state: TypingState| {
                let others = state.typing_others(&viewer);
                sender.send_if_modified(|current| {
                    if *current == others {
                        return false;
                    }
                    *current = others;
                    true
                });
            }),
        )?;

        Ok(TypingWatch {
            receiver,
            _subscription: subscription,
        })
    }
}

/// Indicator line for the participants typing besides the viewer
pub fn typing_indicator_text(
    others: &BTreeSet<ParticipantId>,
    directory: Option<&ProfileDirectory>,
) -> Option<String> {
    let mut typists = others.iter();
    let first = typists.next()?;
    if typists.next().is_some() {
        return Some("Several people are typing...".to_string());
    }

    let name = directory.map_or(first.as_str(), |directory| directory.display_name(first));
    Some(format!("{name} is typing..."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::entities::Profile;

    use crate::services::testing::harness;

    fn set(ids: &[&str]) -> BTreeSet<ParticipantId> {
        ids.iter().map(|id| ParticipantId::from(*id)).collect()
    }

    #[test]
    fn test_indicator_text() {
        let directory = ProfileDirectory::new([Profile {
            name: Some("Bilal".to_string()),
            ..Profile::new(ParticipantId::from("u2"))
        }]);

        assert_eq!(typing_indicator_text(&set(&[]), Some(&directory)), None);
        assert_eq!(
            typing_indicator_text(&set(&["u2"]), Some(&directory)).as_deref(),
            Some("Bilal is typing...")
        );
        assert_eq!(
            typing_indicator_text(&set(&["u3"]), None).as_deref(),
            Some("u3 is typing...")
        );
        assert_eq!(
            typing_indicator_text(&set(&["u2", "u3"]), Some(&directory)).as_deref(),
            Some("Several people are typing...")
        );
    }

    #[tokio::test]
    async fn test_tracker_writes_only_on_transitions() {
        let h = harness(Some("u1"));
        let conversation = ConversationId::from("g1");
        let mut tracker = TypingTracker::new(h.ctx.clone(), conversation, ParticipantId::from("u1"));

        for text in ["h", "he", "hel"] {
            tracker.input_changed(text).await.unwrap();
        }
        assert_eq!(tracker.phase(), TypingPhase::Typing);
        assert_eq!(h.store.write_count(), 1);

        tracker.input_changed("").await.unwrap();
        tracker.message_sent().await.unwrap();
        assert_eq!(tracker.phase(), TypingPhase::Idle);
        assert_eq!(h.store.write_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_phase() {
        let h = harness(Some("u1"));
        let mut tracker =
            TypingTracker::new(h.ctx.clone(), ConversationId::from("g1"), ParticipantId::from("u1"));
        h.store.set_write_failure(Some("offline"));

        let result = tracker.input_changed("hi").await;

        assert!(matches!(result, Err(ServiceError::Domain(e)) if e.is_store()));
        assert_eq!(tracker.phase(), TypingPhase::Idle);
    }

    #[tokio::test]
    async fn test_watch_reports_other_typists() {
        let h = harness(Some("u1"));
        let conversation = ConversationId::from("g1");
        let watch = TypingService::new(&h.ctx)
            .watch(&conversation, &ParticipantId::from("u1"))
            .unwrap();
        let mut own = TypingTracker::new(h.ctx.clone(), conversation.clone(), ParticipantId::from("u1"));
        let mut other = TypingTracker::new(h.ctx.clone(), conversation, ParticipantId::from("u2"));

        own.input_changed("me").await.unwrap();
        assert!(watch.current().is_empty());

        other.input_changed("you").await.unwrap();
        assert_eq!(watch.current(), set(&["u2"]));

        other.message_sent().await.unwrap();
        assert!(watch.current().is_empty());
    }

    #[tokio::test]
    async fn test_dropping_watch_releases_subscription() {
        let h = harness(Some("u1"));
        let watch = TypingService::new(&h.ctx)
            .watch(&ConversationId::from("g1"), &ParticipantId::from("u1"))
            .unwrap();
        assert_eq!(h.store.listener_count(), 1);

        drop(watch);
        assert_eq!(h.store.listener_count(), 0);
    }
}
