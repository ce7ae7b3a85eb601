//! Traits at the seams: external collaborators and repositories

mod ports;
mod repositories;
mod subscription;

pub use ports::{
    AuthProvider, DeviceCapabilities, ObjectStorage, RealtimeStore, StoredObject, UploadOptions,
};
pub use repositories::{
    GroupRepository, MessageRepository, ProfileRepository, RepoResult, TypingRepository,
};
pub use subscription::{Listener, Subscription};
