//! # chat-memory
//!
//! In-process implementations of the external collaborators.
//!
//! ## Features
//!
//! - **Realtime store**: JSON tree with field-level merges, push keys and
//!   snapshot subscriptions
//! - **Object storage**: bucketed blobs with public URLs
//! - **Auth provider**: a signed-in participant with state listeners
//!
//! Every collaborator can be told to fail its next writes, which is how the
//! error paths of the client core are exercised.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use chat_memory::{MemoryAuthProvider, MemoryObjectStorage, MemoryRealtimeStore};
//!
//! let store = Arc::new(MemoryRealtimeStore::new());
//! let storage = Arc::new(MemoryObjectStorage::new("http://localhost:54321"));
//! let auth = Arc::new(MemoryAuthProvider::signed_in("u1".into()));
//! ```

pub mod auth;
pub mod object_storage;
pub mod realtime;

pub use auth::MemoryAuthProvider;
pub use object_storage::{MemoryObjectStorage, StoredBlob};
pub use realtime::MemoryRealtimeStore;
