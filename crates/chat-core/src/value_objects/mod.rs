//! Value objects - immutable types that represent domain concepts

mod ids;
mod push_id;
mod store_path;

pub use ids::{ConversationId, GroupId, MessageId, ParticipantId};
pub use push_id::{push_key_timestamp, PushIdGenerator};
pub use store_path::{StorePath, StorePathError};
