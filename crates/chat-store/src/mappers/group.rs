//! Group entity <-> model mapper

use serde_json::Value;

use chat_core::entities::Group;
use chat_core::value_objects::{GroupId, ParticipantId};

use crate::models::GroupModel;

use super::decode_children;

/// Decode a stored group; the record key is authoritative for the id
pub fn group_from_record(key: &str, model: GroupModel) -> Group {
    Group::new(
        GroupId::from(key),
        model.name,
        ParticipantId::new(model.admin),
        model.members.into_iter().map(ParticipantId::new),
    )
}

/// Decode the group table
pub fn groups_from_snapshot(snapshot: &Value) -> Vec<Group> {
    decode_children::<GroupModel>(snapshot, None)
        .into_iter()
        .map(|(key, model)| group_from_record(&key, model))
        .collect()
}

/// Prepare a group for writing
impl From<&Group> for GroupModel {
    fn from(group: &Group) -> Self {
        Self {
            id: Some(group.id.to_string()),
            name: group.name.clone(),
            admin: group.admin.to_string(),
            members: group.members.iter().map(ToString::to_string).collect(),
        }
    }
}
