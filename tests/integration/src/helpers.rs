//! Test helpers for integration tests
//!
//! A [`TestBackend`] is one shared realtime store plus object storage.
//! Each [`TestClient`] is a signed-in participant with its own device and
//! service context on top of that backend.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};

use chat_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use chat_core::traits::DeviceCapabilities;
use chat_core::value_objects::ParticipantId;
use chat_memory::{MemoryAuthProvider, MemoryObjectStorage, MemoryRealtimeStore};
use chat_service::{Feed, MessageBody, ServiceContext, ServiceContextBuilder};

use crate::fixtures::ScriptedDevice;

/// How long [`wait_for`] polls before giving up
pub const WAIT_TIMEOUT: Duration = Duration::from_secs(2);

/// Shared collaborators of every client in a test
pub struct TestBackend {
    pub config: AppConfig,
    pub store: MemoryRealtimeStore,
    pub storage: MemoryObjectStorage,
}

impl TestBackend {
    /// Backend with the default configuration
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        init_test_tracing();
        let storage = MemoryObjectStorage::from_config(&config.storage);
        Self {
            config,
            store: MemoryRealtimeStore::new(),
            storage,
        }
    }

    /// Sign `participant` in on a fresh device
    pub fn client(&self, participant: &str) -> Result<TestClient> {
        let participant = ParticipantId::from(participant);
        let auth = MemoryAuthProvider::signed_in(participant.clone());
        let device = Arc::new(ScriptedDevice::default());

        let ctx = ServiceContextBuilder::new()
            .store(Arc::new(self.store.clone()))
            .storage(Arc::new(self.storage.clone()))
            .auth(Arc::new(auth.clone()))
            .device(Arc::clone(&device) as Arc<dyn DeviceCapabilities>)
            .config(self.config.clone())
            .build()?;

        Ok(TestClient {
            participant,
            ctx,
            auth,
            device,
        })
    }
}

impl Default for TestBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// One signed-in participant
pub struct TestClient {
    pub participant: ParticipantId,
    pub ctx: ServiceContext,
    pub auth: MemoryAuthProvider,
    pub device: Arc<ScriptedDevice>,
}

/// Install a test subscriber once; later calls are no-ops
pub fn init_test_tracing() {
    let _ = try_init_tracing_with_config(TracingConfig::development());
}

/// Yield to spawned tasks until `done` holds
pub async fn wait_for(mut done: impl FnMut() -> bool) -> Result<()> {
    let polled = tokio::time::timeout(WAIT_TIMEOUT, async {
        while !done() {
            tokio::task::yield_now().await;
        }
    })
    .await;

    if polled.is_err() {
        bail!("condition not reached within {WAIT_TIMEOUT:?}");
    }
    Ok(())
}

/// Text of every text message in a feed, in display order
pub fn texts(feed: &Feed) -> Vec<String> {
    feed.items
        .iter()
        .filter_map(|item| item.as_message())
        .filter_map(|item| match &item.body {
            MessageBody::Text { text } => Some(text.clone()),
            _ => None,
        })
        .collect()
}
