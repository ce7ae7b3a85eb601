//! Composer - text, attachment and location sends for one conversation
//!
//! Attachments go through a small pipeline whose progress is published on a
//! watch channel:
//!
//! ```text
//! Idle -> PermissionRequested -> Captured -> Uploading -> Uploaded -> MessageAppended -> Idle
//!                  |                 |            |
//!                  +-> Idle          +------------+-> UploadFailed -> Idle
//! ```
//!
//! The message id is reserved as soon as the asset is captured so the
//! object path and the message share one time-ordered key.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use chat_core::entities::{
    AssetData, CaptureSource, CapturedAsset, DevicePermission, Message, MessageContent,
};
use chat_core::error::DomainError;
use chat_core::traits::{Listener, UploadOptions};
use chat_core::value_objects::{ConversationId, MessageId, ParticipantId};

use super::context::ServiceContext;
use super::conversation::ConversationRef;
use super::error::ServiceResult;
use super::message::MessageService;
use super::typing::TypingTracker;

/// Kind of attachment being sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Image,
    File,
}

/// What to attach and where to pick it from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentRequest {
    pub kind: AttachmentKind,
    pub source: CaptureSource,
}

impl AttachmentRequest {
    /// Photo from the camera
    pub fn camera() -> Self {
        Self {
            kind: AttachmentKind::Image,
            source: CaptureSource::Camera,
        }
    }

    /// Image from the media library
    pub fn library() -> Self {
        Self {
            kind: AttachmentKind::Image,
            source: CaptureSource::Library,
        }
    }

    /// Any document
    pub fn document() -> Self {
        Self {
            kind: AttachmentKind::File,
            source: CaptureSource::Documents,
        }
    }
}

/// Progress of the attachment pipeline
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AttachmentState {
    #[default]
    Idle,
    PermissionRequested(DevicePermission),
    Captured { message_id: MessageId },
    Uploading { message_id: MessageId, object_path: String },
    Uploaded { message_id: MessageId, url: String },
    UploadFailed { reason: String },
    MessageAppended { message_id: MessageId },
}

/// Composer bound to one conversation and sender
pub struct Composer {
    ctx: ServiceContext,
    conversation: ConversationRef,
    conversation_id: ConversationId,
    sender: ParticipantId,
    typing: TypingTracker,
    state: watch::Sender<AttachmentState>,
    observers: Vec<Listener<AttachmentState>>,
}

impl Composer {
    pub fn new(ctx: ServiceContext, conversation: ConversationRef, sender: ParticipantId) -> Self {
        let conversation_id = conversation.id(&sender);
        let typing = TypingTracker::new(ctx.clone(), conversation_id.clone(), sender.clone());
        let (state, _) = watch::channel(AttachmentState::Idle);

        Self {
            ctx,
            conversation,
            conversation_id,
            sender,
            typing,
            state,
            observers: Vec::new(),
        }
    }

    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    /// Attachment pipeline progress
    pub fn attachment_state(&self) -> watch::Receiver<AttachmentState> {
        self.state.subscribe()
    }

    /// Call `listener` with every state the pipeline goes through
    pub fn observe(&mut self, listener: Listener<AttachmentState>) {
        self.observers.push(listener);
    }

    /// Input buffer changed; drives the typing flag
    pub async fn input_changed(&mut self, text: &str) -> ServiceResult<()> {
        self.typing.input_changed(text).await
    }

    /// Send a text message; whitespace-only input sends nothing
    #[instrument(skip(self, text), fields(conversation = %self.conversation_id))]
    pub async fn send_text(&mut self, text: &str) -> ServiceResult<Option<Message>> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let message = self.append(MessageContent::text(text), None).await?;
        self.after_send().await;
        Ok(Some(message))
    }

    /// Pick, upload and send an attachment
    ///
    /// Returns `Ok(None)` when the picker is cancelled. The state always ends
    /// back at `Idle`.
    #[instrument(skip(self), fields(conversation = %self.conversation_id))]
    pub async fn send_attachment(&mut self, request: AttachmentRequest) -> ServiceResult<Option<Message>> {
        let result = self.run_attachment(request).await;
        self.publish(AttachmentState::Idle);
        result
    }

    /// Send the device's current position as a map link
    #[instrument(skip(self), fields(conversation = %self.conversation_id))]
    pub async fn share_location(&mut self) -> ServiceResult<Message> {
        self.require_permission(DevicePermission::Location).await?;

        let position = self.ctx.device().current_position().await?;
        let content = MessageContent::location(
            &self.ctx.config().location.map_link_base,
            position.latitude,
            position.longitude,
        );

        let message = self.append(content, None).await?;
        self.after_send().await;
        Ok(message)
    }

    async fn run_attachment(&mut self, request: AttachmentRequest) -> ServiceResult<Option<Message>> {
        let permission = request.source.permission();
        self.publish(AttachmentState::PermissionRequested(permission));
        self.require_permission(permission).await?;

        let Some(asset) = self.ctx.device().capture(request.source).await? else {
            info!("Picker cancelled");
            return Ok(None);
        };

        let message_id = self.ctx.message_repo().reserve_id(&self.conversation_id)?;
        self.publish(AttachmentState::Captured {
            message_id: message_id.clone(),
        });

        let (file_name, object_path) = match request.kind {
            AttachmentKind::Image => {
                let name = format!("{message_id}.jpg");
                (name.clone(), name)
            }
            AttachmentKind::File => {
                let name = asset
                    .file_name
                    .clone()
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| "file".to_string());
                let path = format!("{message_id}/{name}");
                (name, path)
            }
        };

        let bytes = match self.read_asset(&asset).await {
            Ok(bytes) => bytes,
            Err(e) => return Err(self.upload_failed(e).into()),
        };

        let limit = self.ctx.config().storage.max_file_size_bytes();
        if bytes.len() > limit {
            let e = DomainError::Upload(format!(
                "file is larger than {} MB",
                self.ctx.config().storage.max_file_size_mb
            ));
            return Err(self.upload_failed(e).into());
        }

        let storage = &self.ctx.config().storage;
        let (bucket, content_type) = match request.kind {
            AttachmentKind::Image => (storage.image_bucket.clone(), asset.mime_type.clone()),
            AttachmentKind::File => (
                storage.file_bucket.clone(),
                Some(
                    asset
                        .mime_type
                        .clone()
                        .unwrap_or_else(|| storage.default_file_content_type.clone()),
                ),
            ),
        };

        self.publish(AttachmentState::Uploading {
            message_id: message_id.clone(),
            object_path: object_path.clone(),
        });
        let stored = match self
            .ctx
            .storage()
            .upload(&bucket, &object_path, bytes, UploadOptions { content_type })
            .await
        {
            Ok(stored) => stored,
            Err(e) => return Err(self.upload_failed(e).into()),
        };

        let url = self.ctx.storage().public_url(&stored.full_path);
        self.publish(AttachmentState::Uploaded {
            message_id: message_id.clone(),
            url: url.clone(),
        });

        let content = match request.kind {
            AttachmentKind::Image => MessageContent::Image { url, file_name },
            AttachmentKind::File => MessageContent::File { url, file_name },
        };
        let message = match self.append(content, Some(message_id)).await {
            Ok(message) => message,
            Err(e) => {
                warn!(full_path = %stored.full_path, error = %e, "Message not appended, uploaded object orphaned");
                return Err(e);
            }
        };

        self.publish(AttachmentState::MessageAppended {
            message_id: message.id.clone(),
        });
        self.after_send().await;
        Ok(Some(message))
    }

    async fn require_permission(&self, permission: DevicePermission) -> ServiceResult<()> {
        let status = self.ctx.device().request_permission(permission).await;
        if status.is_granted() {
            return Ok(());
        }

        warn!(permission = %permission, "Permission denied");
        Err(DomainError::PermissionDenied(permission.to_string()).into())
    }

    async fn read_asset(&self, asset: &CapturedAsset) -> Result<Vec<u8>, DomainError> {
        match &asset.data {
            AssetData::Inline(encoded) => STANDARD
                .decode(encoded.trim())
                .map_err(|e| DomainError::Upload(format!("unreadable picker payload: {e}"))),
            AssetData::LocalUri(uri) => self.ctx.device().read_local(uri).await,
        }
    }

    fn upload_failed(&self, error: DomainError) -> DomainError {
        warn!(error = %error, "Upload failed");
        self.publish(AttachmentState::UploadFailed {
            reason: error.to_string(),
        });
        error
    }

    async fn append(
        &self,
        content: MessageContent,
        reserved_id: Option<MessageId>,
    ) -> ServiceResult<Message> {
        MessageService::new(&self.ctx)
            .send(&self.conversation, &self.sender, content, reserved_id)
            .await
    }

    /// Clear the typing flag; a failure here does not undo the send
    async fn after_send(&mut self) {
        if let Err(e) = self.typing.message_sent().await {
            warn!(error = %e, "Typing flag not cleared after send");
        }
    }

    fn publish(&self, state: AttachmentState) {
        for observer in &self.observers {
            observer(state.clone());
        }
        self.state.send_replace(state);
    }
}
