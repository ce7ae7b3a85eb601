//! Message record

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Extensions rendered inline as images when a record carries no `type`
const IMAGE_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "gif"];

/// Record stored under `TheDiscussions/{conversation}/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageModel {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub sender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    /// RFC 3339 client timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seen: Option<SeenModel>,
    #[serde(
        default,
        deserialize_with = "lenient_reactions",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub reactions: BTreeMap<String, String>,
}

impl MessageModel {
    /// Declared kind, or the kind older records imply through their fields
    pub fn effective_kind(&self) -> &str {
        if let Some(kind) = self.kind.as_deref() {
            return kind;
        }
        match self.file_url.as_deref() {
            Some(url) if has_image_extension(url) => "image",
            Some(_) => "file",
            None => "text",
        }
    }
}

/// Read receipt record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeenModel {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub time: Option<String>,
}

fn has_image_extension(url: &str) -> bool {
    url.rsplit_once('.').is_some_and(|(_, ext)| {
        IMAGE_EXTENSIONS
            .iter()
            .any(|candidate| ext.eq_ignore_ascii_case(candidate))
    })
}

// Some clients wrote `reactions: []` on fresh messages
fn lenient_reactions<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Object(entries) => entries
            .into_iter()
            .filter_map(|(participant, emoji)| match emoji {
                Value::String(emoji) => Some((participant, emoji)),
                _ => None,
            })
            .collect(),
        _ => BTreeMap::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> MessageModel {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_inferred_kind_from_file_url() {
        let image = parse(json!({"sender": "u1", "fileUrl": "https://cdn/x/photo.PNG"}));
        let file = parse(json!({"sender": "u1", "fileUrl": "https://cdn/x/report.pdf"}));
        let text = parse(json!({"sender": "u1", "text": "hi"}));

        assert_eq!(image.effective_kind(), "image");
        assert_eq!(file.effective_kind(), "file");
        assert_eq!(text.effective_kind(), "text");
    }

    #[test]
    fn test_declared_kind_wins() {
        let model = parse(json!({"sender": "u1", "type": "file", "fileUrl": "a.jpg"}));
        assert_eq!(model.effective_kind(), "file");
    }

    #[test]
    fn test_array_reactions_are_empty() {
        let model = parse(json!({"sender": "u1", "text": "hi", "reactions": []}));
        assert!(model.reactions.is_empty());
    }

    #[test]
    fn test_reactions_map() {
        let model = parse(json!({
            "sender": "u1",
            "text": "hi",
            "reactions": {"u2": "👍", "u3": 7}
        }));

        assert_eq!(model.reactions.len(), 1);
        assert_eq!(model.reactions.get("u2").map(String::as_str), Some("👍"));
    }

    #[test]
    fn test_missing_sender_is_rejected() {
        let result = serde_json::from_value::<MessageModel>(json!({"text": "orphan"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_skips_empty_fields() {
        let model = parse(json!({"sender": "u1", "type": "text", "text": "hi"}));
        let value = serde_json::to_value(&model).unwrap();

        assert_eq!(value, json!({"id": null, "type": "text", "text": "hi", "sender": "u1"}));
    }
}
