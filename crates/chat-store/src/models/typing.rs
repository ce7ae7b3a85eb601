//! Typing slice record

use std::collections::BTreeMap;

use serde_json::Value;

/// Value of the reserved `typing` child of a conversation
///
/// Current clients write one boolean per participant. An older client wrote a
/// single string holding the id of whoever was typing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypingModel {
    Flags(BTreeMap<String, bool>),
    Legacy(String),
    Empty,
}

impl From<&Value> for TypingModel {
    fn from(value: &Value) -> Self {
        match value {
            Value::Object(entries) => Self::Flags(
                entries
                    .iter()
                    .filter_map(|(participant, flag)| {
                        flag.as_bool().map(|flag| (participant.clone(), flag))
                    })
                    .collect(),
            ),
            Value::String(participant) if !participant.is_empty() => {
                Self::Legacy(participant.clone())
            }
            _ => Self::Empty,
        }
    }
}
