//! Shared fixtures for service unit tests

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use chat_common::AppConfig;
use chat_core::entities::{
    CaptureSource, CapturedAsset, DevicePermission, GeoPosition, PermissionStatus,
};
use chat_core::error::DomainError;
use chat_core::traits::{DeviceCapabilities, RepoResult};
use chat_core::value_objects::ParticipantId;
use chat_memory::{MemoryAuthProvider, MemoryObjectStorage, MemoryRealtimeStore};

use super::context::{ServiceContext, ServiceContextBuilder};

/// Device whose answers are scripted by the test
#[derive(Default)]
pub(crate) struct ScriptedDevice {
    denied: Mutex<Vec<DevicePermission>>,
    prompts: Mutex<Vec<DevicePermission>>,
    captures: Mutex<VecDeque<Option<CapturedAsset>>>,
    files: Mutex<HashMap<String, Vec<u8>>>,
    position: Mutex<Option<GeoPosition>>,
}

impl ScriptedDevice {
    pub(crate) fn deny(&self, permission: DevicePermission) {
        self.denied.lock().push(permission);
    }

    pub(crate) fn queue_capture(&self, asset: Option<CapturedAsset>) {
        self.captures.lock().push_back(asset);
    }

    pub(crate) fn add_file(&self, uri: &str, bytes: &[u8]) {
        self.files.lock().insert(uri.to_string(), bytes.to_vec());
    }

    pub(crate) fn set_position(&self, latitude: f64, longitude: f64) {
        *self.position.lock() = Some(GeoPosition {
            latitude,
            longitude,
        });
    }

    pub(crate) fn prompts(&self) -> Vec<DevicePermission> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl DeviceCapabilities for ScriptedDevice {
    async fn request_permission(&self, permission: DevicePermission) -> PermissionStatus {
        self.prompts.lock().push(permission);
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

/// Context over in-memory collaborators plus handles to inspect them
pub(crate) struct Harness {
    pub ctx: ServiceContext,
    pub store: MemoryRealtimeStore,
    pub storage: MemoryObjectStorage,
    pub auth: MemoryAuthProvider,
    pub device: Arc<ScriptedDevice>,
}

pub(crate) fn harness(signed_in: Option<&str>) -> Harness {
    let config = AppConfig::default();
    let store = MemoryRealtimeStore::new();
    let storage = MemoryObjectStorage::from_config(&config.storage);
    let auth = match signed_in {
        Some(id) => MemoryAuthProvider::signed_in(ParticipantId::from(id)),
        None => MemoryAuthProvider::new(),
    };
    let device = Arc::new(ScriptedDevice::default());

    let ctx = ServiceContextBuilder::new()
        .store(Arc::new(store.clone()))
        .storage(Arc::new(storage.clone()))
        .auth(Arc::new(auth.clone()))
        .device(Arc::clone(&device) as Arc<dyn DeviceCapabilities>)
        .config(config)
        .build()
        .unwrap();

    Harness {
        ctx,
        store,
        storage,
        auth,
        device,
    }
}
