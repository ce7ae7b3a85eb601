//! Repository implementations
//!
//! Realtime store implementations of the repository traits defined in chat-core.
//! Each repository handles one slice of the store layout.

mod error;
mod group;
mod message;
mod profile;
mod typing;

pub use group::RealtimeGroupRepository;
pub use message::RealtimeMessageRepository;
pub use profile::RealtimeProfileRepository;
pub use typing::RealtimeTypingRepository;
