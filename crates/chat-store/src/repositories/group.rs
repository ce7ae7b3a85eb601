//! Realtime store implementation of GroupRepository

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, instrument};

use chat_core::entities::Group;
use chat_core::traits::{GroupRepository, Listener, RealtimeStore, RepoResult, Subscription};
use chat_core::value_objects::GroupId;

use crate::layout::StoreLayout;
use crate::mappers::{group_from_record, groups_from_snapshot};
use crate::models::GroupModel;

use super::error::{invalid_record, map_encode_error};

/// Realtime store implementation of GroupRepository
#[derive(Clone)]
pub struct RealtimeGroupRepository {
    store: Arc<dyn RealtimeStore>,
    layout: StoreLayout,
}

impl RealtimeGroupRepository {
    /// Create a new RealtimeGroupRepository
    pub fn new(store: Arc<dyn RealtimeStore>, layout: StoreLayout) -> Self {
        Self { store, layout }
    }
}

#[async_trait]
impl GroupRepository for RealtimeGroupRepository {
    fn next_id(&self) -> RepoResult<GroupId> {
        let root = self.layout.groups()?;
        Ok(GroupId::new(self.store.push_key(&root)))
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &GroupId) -> RepoResult<Option<Group>> {
        let path = self.layout.group(id)?;
        let record = self.store.once(&path).await?;
        if record.is_null() {
            return Ok(None);
        }

        let model: GroupModel =
            serde_json::from_value(record).map_err(|e| invalid_record(&path, e))?;
        Ok(Some(group_from_record(id.as_str(), model)))
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> RepoResult<Vec<Group>> {
        let root = self.layout.groups()?;
        let snapshot = self.store.once(&root).await?;
        Ok(groups_from_snapshot(&snapshot))
    }

    #[instrument(skip(self, group), fields(group_id = %group.id))]
    async fn create(&self, group: &Group) -> RepoResult<()> {
        let path = self.layout.group(&group.id)?;
        let record = serde_json::to_value(GroupModel::from(group)).map_err(map_encode_error)?;

        self.store.set(&path, record).await?;

        info!(members = group.members.len(), "Group created");
        Ok(())
    }

    fn subscribe(&self, on_change: Listener<Vec<Group>>) -> RepoResult<Subscription> {
        let root = self.layout.groups()?;
        let listener: Listener<Value> =
            Arc::new(move |snapshot: Value| on_change(groups_from_snapshot(&snapshot)));

        self.store.subscribe(&root, listener)
    }
}
