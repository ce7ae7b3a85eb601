//! Entity to model mappers
//!
//! This module converts between domain entities (chat-core) and wire models.
//! - `*_from_record`: decode a stored record under its key
//! - `From<&Entity> for Model`: prepare entity data for a write
//! - `*_from_snapshot`: decode every child of a subscribed node, skipping
//!   records that do not parse

mod group;
mod message;
mod profile;
mod typing;

pub use group::{group_from_record, groups_from_snapshot};
pub use message::{message_from_record, messages_from_snapshot, seen_from_model};
pub use profile::{profile_from_record, profile_patch_fields, profiles_from_snapshot};
pub use typing::typing_state_from_value;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Decode the children of `snapshot`, skipping `reserved` and malformed records
pub(crate) fn decode_children<M: DeserializeOwned>(
    snapshot: &Value,
    reserved: Option<&str>,
) -> Vec<(String, M)> {
    let Value::Object(children) = snapshot else {
        return Vec::new();
    };

    children
        .iter()
        .filter(|(key, _)| Some(key.as_str()) != reserved)
        .filter_map(|(key, record)| match M::deserialize(record) {
            Ok(model) => Some((key.clone(), model)),
            Err(error) => {
                warn!(key = %key, error = %error, "Skipping malformed record");
                None
            }
        })
        .collect()
}
