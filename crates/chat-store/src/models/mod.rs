//! Wire models - record shapes persisted in the realtime store
//!
//! Field names are the contract with every other client of the store and
//! stay camelCase.

mod group;
mod message;
mod profile;
mod typing;

pub use group::GroupModel;
pub use message::{MessageModel, SeenModel};
pub use profile::ProfileModel;
pub use typing::TypingModel;
