//! Domain entities - core business objects

mod device;
mod group;
mod message;
mod profile;
mod typing;

pub use device::{
    AssetData, CaptureSource, CapturedAsset, DevicePermission, GeoPosition, PermissionStatus,
};
pub use group::{ConversationKind, Group};
pub use message::{
    Message, MessageContent, MessageDraft, MessageKind, MessagePatch, SeenReceipt,
};
pub use profile::{Profile, ProfilePatch};
pub use typing::TypingState;
