//! # chat-service
//!
//! Application layer containing the feed projector, the composer and the
//! use-case services that sit between the UI and the store adapters.

pub mod directory;
pub mod dto;
pub mod feed;
pub mod services;

pub use directory::ProfileDirectory;
pub use feed::{
    pending_acknowledgement, project, project_inverted, receipt_for_latest, DateSeparator,
    DisplayItem, LatestReceipt, MessageBody, MessageItem, ProjectionContext,
};
pub use services::{
    typing_indicator_text, AttachmentKind, AttachmentRequest, AttachmentState, Composer,
    ConversationRef, DirectoryWatch, Feed, FeedService, GroupService, InboxService, LiveFeed,
    MessageService, ProfileService, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult, SessionService, TypingPhase, TypingService, TypingTracker, TypingWatch,
};
