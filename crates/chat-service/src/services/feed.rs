//! Live conversation feed
//!
//! A [`LiveFeed`] owns the subscriptions of one open conversation screen.
//! Every message snapshot is projected and published on a watch channel;
//! group feeds also acknowledge the newest message from others in a
//! background task.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use chat_core::entities::{ConversationKind, Message, Profile};
use chat_core::traits::Subscription;
use chat_core::value_objects::{ConversationId, ParticipantId};

use crate::directory::ProfileDirectory;
use crate::feed::{project, receipt_for_latest, DisplayItem, LatestReceipt, ProjectionContext};

use super::context::ServiceContext;
use super::conversation::ConversationRef;
use super::error::{ServiceError, ServiceResult};
use super::message::MessageService;

/// Rendered state of a conversation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feed {
    /// Chronological display items
    pub items: Vec<DisplayItem>,
    /// Receipt under the viewer's own newest message (groups only)
    pub receipt: Option<LatestReceipt>,
}

impl Feed {
    /// Number of message rows
    pub fn message_count(&self) -> usize {
        self.items.iter().filter_map(DisplayItem::as_message).count()
    }
}

#[derive(Default)]
struct Snapshot {
    messages: Vec<Message>,
    directory: ProfileDirectory,
}

/// Projects snapshots for one viewer and publishes the result
struct Projection {
    viewer: ParticipantId,
    kind: ConversationKind,
    opened_at: DateTime<Utc>,
    offset: FixedOffset,
    snapshot: Mutex<Snapshot>,
    feed: watch::Sender<Feed>,
    acks: Option<watch::Sender<Vec<Message>>>,
}

impl Projection {
    fn on_messages(&self, messages: Vec<Message>) {
        if let Some(acks) = &self.acks {
            acks.send_replace(messages.clone());
        }

        let mut snapshot = self.snapshot.lock();
        snapshot.messages = messages;
        self.publish(&snapshot);
    }

    fn on_profiles(&self, profiles: Vec<Profile>) {
        let mut snapshot = self.snapshot.lock();
        snapshot.directory = ProfileDirectory::new(profiles);
        self.publish(&snapshot);
    }

    fn publish(&self, snapshot: &Snapshot) {
        let mut ctx = ProjectionContext::new(&self.viewer, self.kind, self.opened_at).with_offset(self.offset);
        let receipt = if self.kind.is_group() {
            ctx = ctx.with_directory(&snapshot.directory);
            receipt_for_latest(&snapshot.messages, &self.viewer, self.opened_at)
        } else {
            None
        };

        let feed = Feed {
            items: project(&snapshot.messages, &ctx),
            receipt,
        };
        self.feed.send_if_modified(|current| {
            if *current == feed {
                return false;
            }
            *current = feed;
            true
        });
    }
}

/// An open conversation
///
/// Dropping it releases the subscriptions and stops acknowledging.
pub struct LiveFeed {
    conversation_id: ConversationId,
    receiver: watch::Receiver<Feed>,
    acknowledger: Option<JoinHandle<()>>,
    _subscription: Subscription,
}

impl LiveFeed {
    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    /// Latest rendered feed
    pub fn current(&self) -> Feed {
        self.receiver.borrow().clone()
    }

    /// A receiver for UI code that awaits changes itself
    pub fn receiver(&self) -> watch::Receiver<Feed> {
        self.receiver.clone()
    }

    /// Wait for the next change
    pub async fn changed(&mut self) -> ServiceResult<Feed> {
        self.receiver
            .changed()
            .await
            .map_err(|_| ServiceError::internal("feed watch closed"))?;
        Ok(self.receiver.borrow_and_update().clone())
    }
}

impl Drop for LiveFeed {
    fn drop(&mut self) {
        if let Some(task) = self.acknowledger.take() {
            task.abort();
        }
    }
}

/// Feed service
pub struct FeedService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> FeedService<'a> {
    /// Create a new FeedService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Open `conversation` for `viewer`
    ///
    /// Must be called from within a tokio runtime when the conversation is
    /// a group.
    #[instrument(skip(self, conversation), fields(kind = ?conversation.kind()))]
    pub fn open(&self, conversation: &ConversationRef, viewer: &ParticipantId) -> ServiceResult<LiveFeed> {
        let kind = conversation.kind();
        let conversation_id = conversation.id(viewer);
        let (feed, receiver) = watch::channel(Feed::default());
        let opened_at = Utc::now();

        let (acks, acknowledger) = if kind.is_group() {
            let runtime = tokio::runtime::Handle::try_current()
                .map_err(|e| ServiceError::internal(format!("no async runtime: {e}")))?;
            let (acks, pending) = watch::channel(Vec::new());
            let task = runtime.spawn(acknowledge_loop(
                self.ctx.clone(),
                conversation_id.clone(),
                viewer.clone(),
                opened_at,
                pending,
            ));
            (Some(acks), Some(task))
        } else {
            (None, None)
        };

        let projection = Arc::new(Projection {
            viewer: viewer.clone(),
            kind,
            opened_at,
            offset: self.ctx.config().feed.offset(),
            snapshot: Mutex::new(Snapshot::default()),
            feed,
            acks,
        });

        let mut parts = Vec::with_capacity(2);
        if kind.is_group() {
            let on_profiles = Arc::clone(&projection);
            parts.push(
                self.ctx
                    .profile_repo()
                    .subscribe(Arc::new(move |profiles: Vec<Profile>| on_profiles.on_profiles(profiles)))?,
            );
        }
        let on_messages = Arc::clone(&projection);
        parts.push(self.ctx.message_repo().subscribe(
            &conversation_id,
            Arc::new(move |messages: Vec<Message>| on_messages.on_messages(messages)),
        )?);

        debug!(conversation = %conversation_id, "Feed opened");
        Ok(LiveFeed {
            conversation_id: conversation_id.clone(),
            receiver,
            acknowledger,
            _subscription: Subscription::merge(format!("feed {conversation_id}"), parts),
        })
    }
}

async fn acknowledge_loop(
    ctx: ServiceContext,
    conversation: ConversationId,
    viewer: ParticipantId,
    opened_at: DateTime<Utc>,
    mut pending: watch::Receiver<Vec<Message>>,
) {
    let service = MessageService::new(&ctx);
    while pending.changed().await.is_ok() {
        let messages = pending.borrow_and_update().clone();
        let acknowledged = service
            .acknowledge_latest(&conversation, &messages, &viewer, opened_at)
            .await;
        if let Err(e) = acknowledged {
            warn!(conversation = %conversation, error = %e, "Acknowledgement failed");
        }
    }
}
