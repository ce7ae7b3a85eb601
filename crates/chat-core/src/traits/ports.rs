//! Ports - the external collaborators the client core depends on
//!
//! The realtime store, the authentication provider, the object storage and the
//! device are owned by third parties. The core only sees these narrow traits.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::entities::{CaptureSource, CapturedAsset, DevicePermission, GeoPosition, PermissionStatus};
use crate::value_objects::{ParticipantId, StorePath};

use super::repositories::RepoResult;
use super::subscription::{Listener, Subscription};

// ============================================================================
// Realtime keyed store
// ============================================================================

#[async_trait]
pub trait RealtimeStore: Send + Sync {
    /// Generate a fresh child key under `parent` without writing anything
    fn push_key(&self, parent: &StorePath) -> String;

    /// Replace the value at `path`; `Value::Null` removes it
    async fn set(&self, path: &StorePath, value: Value) -> RepoResult<()>;

    /// Merge `fields` into the node at `path`
    ///
    /// Keys may be multi-segment (`a/b`); only the named children change.
    async fn update(&self, path: &StorePath, fields: Map<String, Value>) -> RepoResult<()>;

    /// Read the current value at `path` (`Value::Null` when absent)
    async fn once(&self, path: &StorePath) -> RepoResult<Value>;

    /// Listen to the subtree at `path`
    ///
    /// The listener is called once immediately with the current value and again
    /// after every change under `path`. Releasing the handle detaches it.
    fn subscribe(&self, path: &StorePath, listener: Listener<Value>) -> RepoResult<Subscription>;
}

// ============================================================================
// Authentication provider
// ============================================================================

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Currently signed-in participant
    fn current_user(&self) -> Option<ParticipantId>;

    /// Listen to sign-in / sign-out transitions
    fn on_auth_state_changed(&self, listener: Listener<Option<ParticipantId>>) -> Subscription;

    /// End the current session
    async fn sign_out(&self) -> RepoResult<()>;
}

// ============================================================================
// Object storage
// ============================================================================

/// Upload options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOptions {
    pub content_type: Option<String>,
}

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// `bucket/path` of the stored object
    pub full_path: String,
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` at `path` inside `bucket`
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        options: UploadOptions,
    ) -> RepoResult<StoredObject>;

    /// Public URL of a stored object
    fn public_url(&self, full_path: &str) -> String;
}

// ============================================================================
// Device capabilities
// ============================================================================

#[async_trait]
pub trait DeviceCapabilities: Send + Sync {
    /// Prompt for an OS-level permission
    async fn request_permission(&self, permission: DevicePermission) -> PermissionStatus;

    /// Open a picker; `None` when the user cancels
    async fn capture(&self, source: CaptureSource) -> RepoResult<Option<CapturedAsset>>;

    /// Read a local URI returned by a picker
    async fn read_local(&self, uri: &str) -> RepoResult<Vec<u8>>;

    /// Current geolocation fix
    async fn current_position(&self) -> RepoResult<GeoPosition>;
}
