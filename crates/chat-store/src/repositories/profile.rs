//! Realtime store implementation of ProfileRepository

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, instrument};

use chat_core::entities::{Profile, ProfilePatch};
use chat_core::traits::{Listener, ProfileRepository, RealtimeStore, RepoResult, Subscription};
use chat_core::value_objects::ParticipantId;

use crate::layout::StoreLayout;
use crate::mappers::{profile_from_record, profile_patch_fields, profiles_from_snapshot};
use crate::models::ProfileModel;

use super::error::invalid_record;

/// Realtime store implementation of ProfileRepository
#[derive(Clone)]
pub struct RealtimeProfileRepository {
    store: Arc<dyn RealtimeStore>,
    layout: StoreLayout,
}

impl RealtimeProfileRepository {
    /// Create a new RealtimeProfileRepository
    pub fn new(store: Arc<dyn RealtimeStore>, layout: StoreLayout) -> Self {
        Self { store, layout }
    }
}

#[async_trait]
impl ProfileRepository for RealtimeProfileRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &ParticipantId) -> RepoResult<Option<Profile>> {
        let path = self.layout.profile(id)?;
        let record = self.store.once(&path).await?;
        if record.is_null() {
            return Ok(None);
        }

        let model: ProfileModel =
            serde_json::from_value(record).map_err(|e| invalid_record(&path, e))?;
        Ok(Some(profile_from_record(id.clone(), model)))
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> RepoResult<Vec<Profile>> {
        let root = self.layout.profiles()?;
        let snapshot = self.store.once(&root).await?;
        Ok(profiles_from_snapshot(&snapshot, &self.layout))
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, id: &ParticipantId, patch: &ProfilePatch) -> RepoResult<()> {
        let path = self.layout.profile(id)?;
        self.store
            .update(&path, profile_patch_fields(id, patch))
            .await?;

        info!("Profile updated");
        Ok(())
    }

    fn subscribe(&self, on_change: Listener<Vec<Profile>>) -> RepoResult<Subscription> {
        let root = self.layout.profiles()?;
        let layout = self.layout.clone();
        let listener: Listener<Value> = Arc::new(move |snapshot: Value| {
            on_change(profiles_from_snapshot(&snapshot, &layout));
        });

        self.store.subscribe(&root, listener)
    }
}
