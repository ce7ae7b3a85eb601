//! Test fixtures and data generators
//!
//! Provides participants, groups, profiles and a scripted device for
//! integration tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use parking_lot::Mutex;

use chat_core::entities::{
    CaptureSource, CapturedAsset, DevicePermission, GeoPosition, PermissionStatus,
};
use chat_core::error::DomainError;
use chat_core::traits::{DeviceCapabilities, RepoResult};
use chat_core::value_objects::ParticipantId;
use chat_service::dto::{CreateGroupRequest, UpdateProfileRequest};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Participant id shorthand
pub fn pid(id: &str) -> ParticipantId {
    ParticipantId::from(id)
}

/// Profile with every required field set
pub fn profile_request(name: &str) -> UpdateProfileRequest {
    UpdateProfileRequest {
        name: name.to_string(),
        pseudo: name.to_lowercase(),
        telephone: format!("+216 {:08}", unique_suffix()),
    }
}

/// Group request with a unique name
pub fn group_request(members: &[&str]) -> CreateGroupRequest {
    CreateGroupRequest {
        name: format!("Group {}", unique_suffix()),
        members: members.iter().map(|id| pid(id)).collect(),
    }
}

/// Picker result carrying the image inline
pub fn inline_image(bytes: &[u8]) -> CapturedAsset {
    CapturedAsset::inline(STANDARD.encode(bytes)).with_mime_type("image/jpeg")
}

/// Device whose answers are scripted by the test
#[derive(Default)]
pub struct ScriptedDevice {
    denied: Mutex<HashSet<DevicePermission>>,
    captures: Mutex<VecDeque<Option<CapturedAsset>>>,
    files: Mutex<HashMap<String, Vec<u8>>>,
    position: Mutex<Option<GeoPosition>>,
}

impl ScriptedDevice {
    /// Answer every prompt for `permission` with a denial
    pub fn deny(&self, permission: DevicePermission) {
        self.denied.lock().insert(permission);
    }

    /// Queue the next picker result (`None` cancels)
    pub fn queue_capture(&self, asset: Option<CapturedAsset>) {
        self.captures.lock().push_back(asset);
    }

    /// Make a local URI readable
    pub fn add_file(&self, uri: &str, bytes: &[u8]) {
        self.files.lock().insert(uri.to_string(), bytes.to_vec());
    }

    pub fn set_position(&self, latitude: f64, longitude: f64) {
        *self.position.lock() = Some(GeoPosition {
            latitude,
            longitude,
        });
    }
}

#[async_trait]
impl DeviceCapabilities for ScriptedDevice {
    async fn request_permission(&self, permission: DevicePermission) -> PermissionStatus {
        if self.denied.lock().contains(&permission) {
            PermissionStatus::Denied
        } else {
            PermissionStatus::Granted
        }
    }

    async fn capture(&self, _source: CaptureSource) -> RepoResult<Option<CapturedAsset>> {
        Ok(self.captures.lock().pop_front().flatten())
    }

    async fn read_local(&self, uri: &str) -> RepoResult<Vec<u8>> {
        self.files
            .lock()
            .get(uri)
            .cloned()
            .ok_or_else(|| DomainError::InternalError(format!("no such file: {uri}")))
    }

    async fn current_position(&self) -> RepoResult<GeoPosition> {
        let position = *self.position.lock();
        position.ok_or_else(|| DomainError::InternalError("no position fix".to_string()))
    }
}
