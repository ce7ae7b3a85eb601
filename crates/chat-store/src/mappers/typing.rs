//! Typing slice mapper

use serde_json::Value;

use chat_core::entities::TypingState;
use chat_core::value_objects::ParticipantId;

use crate::models::TypingModel;

/// Decode the typing slice of a conversation
pub fn typing_state_from_value(value: &Value) -> TypingState {
    match TypingModel::from(value) {
        TypingModel::Flags(flags) => flags
            .into_iter()
            .map(|(participant, typing)| (ParticipantId::new(participant), typing))
            .collect(),
        TypingModel::Legacy(participant) => {
            std::iter::once((ParticipantId::new(participant), true)).collect()
        }
        TypingModel::Empty => TypingState::new(),
    }
}
