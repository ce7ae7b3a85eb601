//! Service context - dependency container for services
//!
//! Holds all repositories, collaborators, and configuration needed by services.

use std::sync::Arc;

use chat_common::AppConfig;
use chat_core::traits::{
    AuthProvider, DeviceCapabilities, GroupRepository, MessageRepository, ObjectStorage,
    ProfileRepository, RealtimeStore, TypingRepository,
};
use chat_core::value_objects::PushIdGenerator;
use chat_store::{
    RealtimeGroupRepository, RealtimeMessageRepository, RealtimeProfileRepository,
    RealtimeTypingRepository, StoreLayout,
};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// Cheap to clone; long-lived handles such as [`super::Composer`] and
/// [`super::LiveFeed`] keep their own copy.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    message_repo: Arc<dyn MessageRepository>,
    typing_repo: Arc<dyn TypingRepository>,
    group_repo: Arc<dyn GroupRepository>,
    profile_repo: Arc<dyn ProfileRepository>,

    // Collaborators
    storage: Arc<dyn ObjectStorage>,
    auth: Arc<dyn AuthProvider>,
    device: Arc<dyn DeviceCapabilities>,

    push_ids: Arc<PushIdGenerator>,
    config: Arc<AppConfig>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        message_repo: Arc<dyn MessageRepository>,
        typing_repo: Arc<dyn TypingRepository>,
        group_repo: Arc<dyn GroupRepository>,
        profile_repo: Arc<dyn ProfileRepository>,
        storage: Arc<dyn ObjectStorage>,
        auth: Arc<dyn AuthProvider>,
        device: Arc<dyn DeviceCapabilities>,
        push_ids: Arc<PushIdGenerator>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            message_repo,
            typing_repo,
            group_repo,
            profile_repo,
            storage,
            auth,
            device,
            push_ids,
            config,
        }
    }

    // === Repositories ===

    /// Get the message repository
    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    /// Get the typing repository
    pub fn typing_repo(&self) -> &dyn TypingRepository {
        self.typing_repo.as_ref()
    }

    /// Get the group repository
    pub fn group_repo(&self) -> &dyn GroupRepository {
        self.group_repo.as_ref()
    }

    /// Get the profile repository
    pub fn profile_repo(&self) -> &dyn ProfileRepository {
        self.profile_repo.as_ref()
    }

    // === Collaborators ===

    /// Get the object storage
    pub fn storage(&self) -> &dyn ObjectStorage {
        self.storage.as_ref()
    }

    /// Get the authentication provider
    pub fn auth(&self) -> &dyn AuthProvider {
        self.auth.as_ref()
    }

    /// Get the device capabilities
    pub fn device(&self) -> &dyn DeviceCapabilities {
        self.device.as_ref()
    }

    // === Keys ===

    /// Generate a time-ordered key for objects that live outside the store
    pub fn generate_key(&self) -> String {
        self.push_ids.generate()
    }

    // === Configuration ===

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("collaborators", &"...")
            .field("app", &self.config.app.name)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    store: Option<Arc<dyn RealtimeStore>>,
    message_repo: Option<Arc<dyn MessageRepository>>,
    typing_repo: Option<Arc<dyn TypingRepository>>,
    group_repo: Option<Arc<dyn GroupRepository>>,
    profile_repo: Option<Arc<dyn ProfileRepository>>,
    storage: Option<Arc<dyn ObjectStorage>>,
    auth: Option<Arc<dyn AuthProvider>>,
    device: Option<Arc<dyn DeviceCapabilities>>,
    push_ids: Option<Arc<PushIdGenerator>>,
    config: Option<AppConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Realtime store backing every repository that is not set explicitly
    pub fn store(mut self, store: Arc<dyn RealtimeStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn message_repo(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn typing_repo(mut self, repo: Arc<dyn TypingRepository>) -> Self {
        self.typing_repo = Some(repo);
        self
    }

    pub fn group_repo(mut self, repo: Arc<dyn GroupRepository>) -> Self {
        self.group_repo = Some(repo);
        self
    }

    pub fn profile_repo(mut self, repo: Arc<dyn ProfileRepository>) -> Self {
        self.profile_repo = Some(repo);
        self
    }

    pub fn storage(mut self, storage: Arc<dyn ObjectStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn auth(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn device(mut self, device: Arc<dyn DeviceCapabilities>) -> Self {
        self.device = Some(device);
        self
    }

    pub fn push_ids(mut self, generator: Arc<PushIdGenerator>) -> Self {
        self.push_ids = Some(generator);
        self
    }

    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let config = self.config.unwrap_or_default();
        let layout = StoreLayout::new(&config.store);
        let store = self.store;

        let message_repo: Arc<dyn MessageRepository> = match (self.message_repo, &store) {
            (Some(repo), _) => repo,
            (None, Some(store)) => Arc::new(RealtimeMessageRepository::new(
                Arc::clone(store),
                layout.clone(),
            )),
            (None, None) => return Err(ServiceError::validation("message_repo is required")),
        };
        let typing_repo: Arc<dyn TypingRepository> = match (self.typing_repo, &store) {
            (Some(repo), _) => repo,
            (None, Some(store)) => Arc::new(RealtimeTypingRepository::new(
                Arc::clone(store),
                layout.clone(),
            )),
            (None, None) => return Err(ServiceError::validation("typing_repo is required")),
        };
        let group_repo: Arc<dyn GroupRepository> = match (self.group_repo, &store) {
            (Some(repo), _) => repo,
            (None, Some(store)) => Arc::new(RealtimeGroupRepository::new(
                Arc::clone(store),
                layout.clone(),
            )),
            (None, None) => return Err(ServiceError::validation("group_repo is required")),
        };
        let profile_repo: Arc<dyn ProfileRepository> = match (self.profile_repo, &store) {
            (Some(repo), _) => repo,
            (None, Some(store)) => Arc::new(RealtimeProfileRepository::new(
                Arc::clone(store),
                layout,
            )),
            (None, None) => return Err(ServiceError::validation("profile_repo is required")),
        };

        Ok(ServiceContext::new(
            message_repo,
            typing_repo,
            group_repo,
            profile_repo,
            self.storage.ok_or_else(|| ServiceError::validation("storage is required"))?,
            self.auth.ok_or_else(|| ServiceError::validation("auth is required"))?,
            self.device.ok_or_else(|| ServiceError::validation("device is required"))?,
            self.push_ids.unwrap_or_default(),
            Arc::new(config),
        ))
    }
}
