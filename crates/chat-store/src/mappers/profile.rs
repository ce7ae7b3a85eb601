//! Profile entity <-> model mapper

use serde_json::{Map, Value};

use chat_core::entities::{Profile, ProfilePatch};
use chat_core::value_objects::ParticipantId;

use crate::layout::StoreLayout;
use crate::models::ProfileModel;

use super::decode_children;

/// Decode a stored profile of `participant`
pub fn profile_from_record(participant: ParticipantId, model: ProfileModel) -> Profile {
    Profile {
        id: participant,
        name: model.nom,
        pseudo: model.pseudo,
        telephone: model.telephone,
        avatar_url: model.profile_image,
        is_connected: model.is_connected.unwrap_or(false),
    }
}

/// Decode the profile table
///
/// The participant comes from the record's `id`, else from its key.
pub fn profiles_from_snapshot(snapshot: &Value, layout: &StoreLayout) -> Vec<Profile> {
    decode_children::<ProfileModel>(snapshot, None)
        .into_iter()
        .filter_map(|(key, model)| {
            let participant = model
                .id
                .as_deref()
                .filter(|id| !id.is_empty())
                .map(ParticipantId::from)
                .or_else(|| layout.participant_from_profile_key(&key))?;
            Some(profile_from_record(participant, model))
        })
        .collect()
}

/// Fields to merge into a profile record for `patch`
pub fn profile_patch_fields(participant: &ParticipantId, patch: &ProfilePatch) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("id".to_string(), Value::String(participant.to_string()));

    let strings = [
        ("nom", &patch.name),
        ("pseudo", &patch.pseudo),
        ("telephone", &patch.telephone),
        ("profileImage", &patch.avatar_url),
    ];
    for (field, value) in strings {
        if let Some(value) = value {
            fields.insert(field.to_string(), Value::String(value.clone()));
        }
    }
    if let Some(connected) = patch.is_connected {
        fields.insert("isConnected".to_string(), Value::Bool(connected));
    }

    fields
}
