//! # chat-core
//!
//! Domain layer containing entities, value objects, collaborator ports and repository traits.
//! This crate has zero dependencies on infrastructure (realtime store, object storage, devices).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    CaptureSource, CapturedAsset, AssetData, ConversationKind, DevicePermission, GeoPosition,
    Group, Message, MessageContent, MessageDraft, MessageKind, MessagePatch, PermissionStatus,
    Profile, ProfilePatch, SeenReceipt, TypingState,
};
pub use error::DomainError;
pub use traits::{
    AuthProvider, DeviceCapabilities, GroupRepository, Listener, MessageRepository,
    ObjectStorage, ProfileRepository, RealtimeStore, RepoResult, StoredObject, Subscription,
    TypingRepository, UploadOptions,
};
pub use value_objects::{
    push_key_timestamp, ConversationId, GroupId, MessageId, ParticipantId, PushIdGenerator,
    StorePath, StorePathError,
};
