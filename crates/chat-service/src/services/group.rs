//! Group service
//!
//! Handles group creation and membership queries.

use tracing::{info, instrument};
use validator::Validate;

use chat_core::entities::Group;
use chat_core::value_objects::{GroupId, ParticipantId};

use crate::dto::CreateGroupRequest;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Group service
pub struct GroupService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> GroupService<'a> {
    /// Create a new GroupService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a group administered by `admin`
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_group(
        &self,
        admin: &ParticipantId,
        request: CreateGroupRequest,
    ) -> ServiceResult<Group> {
        request.validate()?;

        let id = self.ctx.group_repo().next_id()?;
        let group = Group::new(id, request.name.trim().to_string(), admin.clone(), request.members);

        self.ctx.group_repo().create(&group).await?;

        info!(group_id = %group.id, members = group.members.len(), "Group created");
        Ok(group)
    }

    /// Get a group by ID
    #[instrument(skip(self))]
    pub async fn find(&self, group_id: &GroupId) -> ServiceResult<Group> {
        self.ctx
            .group_repo()
            .find_by_id(group_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Group", group_id.to_string()))
    }

    /// Groups `participant` belongs to
    #[instrument(skip(self))]
    pub async fn groups_for_member(&self, participant: &ParticipantId) -> ServiceResult<Vec<Group>> {
        let groups = self.ctx.group_repo().find_all().await?;
        Ok(groups
            .into_iter()
            .filter(|group| group.is_member(participant))
            .collect())
    }

    /// Groups `participant` created
    #[instrument(skip(self))]
    pub async fn groups_administered(&self, participant: &ParticipantId) -> ServiceResult<Vec<Group>> {
        let groups = self.ctx.group_repo().find_all().await?;
        Ok(groups
            .into_iter()
            .filter(|group| group.is_admin(participant))
            .collect())
    }

    /// Filter groups by name, case-insensitively
    pub fn search<'g>(groups: &'g [Group], query: &str) -> Vec<&'g Group> {
        let query = query.trim();
        groups.iter().filter(|group| group.matches(query)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::services::testing::harness;

    fn request(name: &str, members: &[&str]) -> CreateGroupRequest {
        CreateGroupRequest {
            name: name.to_string(),
            members: members.iter().map(|id| ParticipantId::from(*id)).collect(),
        }
    }

    #[tokio::test]
    async fn test_create_group_includes_admin() {
        let h = harness(Some("u1"));
        let service = GroupService::new(&h.ctx);
        let admin = ParticipantId::from("u1");

        let group = service
            .create_group(&admin, request(" Weekend ", &["u2", "u3"]))
            .await
            .unwrap();

        assert_eq!(group.name, "Weekend");
        assert!(group.is_member(&admin));
        assert_eq!(group.members.len(), 3);
        assert_eq!(service.find(&group.id).await.unwrap(), group);
    }

    #[tokio::test]
    async fn test_create_group_validates_name() {
        let h = harness(Some("u1"));
        let result = GroupService::new(&h.ctx)
            .create_group(&ParticipantId::from("u1"), request("", &["u2"]))
            .await;

        assert!(matches!(result, Err(ServiceError::Validation(msg)) if msg.contains("1-100")));
        assert_eq!(h.store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_membership_queries() {
        let h = harness(Some("u1"));
        let service = GroupService::new(&h.ctx);
        let u1 = ParticipantId::from("u1");
        let u2 = ParticipantId::from("u2");

        service.create_group(&u1, request("Alpha", &["u2"])).await.unwrap();
        service.create_group(&u2, request("Beta", &[])).await.unwrap();

        assert_eq!(service.groups_for_member(&u1).await.unwrap().len(), 1);
        assert_eq!(service.groups_for_member(&u2).await.unwrap().len(), 2);
        assert_eq!(service.groups_administered(&u2).await.unwrap()[0].name, "Beta");

        let all = h.ctx.group_repo().find_all().await.unwrap();
        let found = GroupService::search(&all, "ALP");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Alpha");
    }

    #[tokio::test]
    async fn test_find_missing_group() {
        let h = harness(Some("u1"));
        let result = GroupService::new(&h.ctx).find(&GroupId::from("nope")).await;

        assert!(matches!(result, Err(ServiceError::NotFound { resource: "Group", .. })));
    }
}
