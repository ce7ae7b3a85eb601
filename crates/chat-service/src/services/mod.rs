//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! validation and orchestration of domain operations on top of the ports.

pub mod composer;
pub mod context;
pub mod conversation;
pub mod error;
pub mod feed;
pub mod group;
pub mod inbox;
pub mod message;
pub mod profile;
pub mod session;
pub mod typing;

#[cfg(test)]
pub(crate) mod testing;

// Re-export all services for convenience
pub use composer::{AttachmentKind, AttachmentRequest, AttachmentState, Composer};
pub use context::{ServiceContext, ServiceContextBuilder};
pub use conversation::ConversationRef;
pub use error::{ServiceError, ServiceResult};
pub use feed::{Feed, FeedService, LiveFeed};
pub use group::GroupService;
pub use inbox::InboxService;
pub use message::MessageService;
pub use profile::{DirectoryWatch, ProfileService};
pub use session::SessionService;
pub use typing::{typing_indicator_text, TypingPhase, TypingService, TypingTracker, TypingWatch};
