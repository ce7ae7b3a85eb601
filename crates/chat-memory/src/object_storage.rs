//! In-memory object storage

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{info, warn};

use chat_common::StorageConfig;
use chat_core::error::DomainError;
use chat_core::traits::{ObjectStorage, RepoResult, StoredObject, UploadOptions};

/// Route public objects are served under
const PUBLIC_OBJECT_ROUTE: &str = "storage/v1/object/public";

/// Stored object contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// In-memory bucketed object storage
#[derive(Clone)]
pub struct MemoryObjectStorage {
    base_url: String,
    objects: Arc<DashMap<String, StoredBlob>>,
    upload_failure: Arc<Mutex<Option<String>>>,
}

impl MemoryObjectStorage {
    /// Create an empty storage serving public URLs under `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            objects: Arc::new(DashMap::new()),
            upload_failure: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a storage matching the configured public URL
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.public_base_url)
    }

    /// Make every following upload fail with `reason` (`None` heals the storage)
    pub fn set_upload_failure(&self, reason: Option<&str>) {
        *self.upload_failure.lock() = reason.map(str::to_string);
    }

    /// Look up an object by `bucket/path`
    pub fn get(&self, full_path: &str) -> Option<StoredBlob> {
        self.objects.get(full_path).map(|entry| entry.value().clone())
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl ObjectStorage for MemoryObjectStorage {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        options: UploadOptions,
    ) -> RepoResult<StoredObject> {
        if let Some(reason) = self.upload_failure.lock().clone() {
            warn!(bucket, path, reason = %reason, "Rejecting upload");
            return Err(DomainError::Upload(reason));
        }
        if bucket.is_empty() || path.is_empty() {
            return Err(DomainError::Upload("bucket and path are required".to_string()));
        }

        let full_path = format!("{bucket}/{}", path.trim_start_matches('/'));
        info!(full_path = %full_path, size = bytes.len(), "Object stored");

        self.objects.insert(
            full_path.clone(),
            StoredBlob {
                bytes,
                content_type: options.content_type,
            },
        );

        Ok(StoredObject { full_path })
    }

    fn public_url(&self, full_path: &str) -> String {
        format!("{}/{PUBLIC_OBJECT_ROUTE}/{full_path}", self.base_url)
    }
}
