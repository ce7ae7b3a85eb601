//! Message entity <-> model mapper

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::Value;

use chat_core::entities::{Message, MessageContent, SeenReceipt};
use chat_core::value_objects::{ConversationId, MessageId, ParticipantId};

use crate::models::{MessageModel, SeenModel};

use super::decode_children;

/// Decode a stored message; the record key is authoritative for the id
pub fn message_from_record(
    conversation: &ConversationId,
    key: &str,
    model: MessageModel,
) -> Message {
    let kind = model.effective_kind().to_string();
    let content = content_from_model(&kind, model.text, model.file_url, model.file_name);

    Message {
        id: MessageId::from(key),
        conversation_id: conversation.clone(),
        sender: ParticipantId::new(model.sender),
        sender_name: model.sender_name,
        receiver: model.receiver.map(ParticipantId::new),
        content,
        sent_at: model.date.as_deref().and_then(parse_time),
        reactions: model
            .reactions
            .into_iter()
            .map(|(participant, emoji)| (ParticipantId::new(participant), emoji))
            .collect(),
        seen: model.seen.map(seen_from_model),
    }
}

/// Decode every message of a conversation partition in key order
pub fn messages_from_snapshot(
    conversation: &ConversationId,
    snapshot: &Value,
    typing_key: &str,
) -> Vec<Message> {
    let mut messages: Vec<Message> = decode_children::<MessageModel>(snapshot, Some(typing_key))
        .into_iter()
        .map(|(key, model)| message_from_record(conversation, &key, model))
        .collect();
    messages.sort_by(|a, b| a.id.cmp(&b.id));
    messages
}

/// Decode a read receipt; an unparsable time is dropped, the status kept
pub fn seen_from_model(model: SeenModel) -> SeenReceipt {
    SeenReceipt {
        status: model.status,
        time: model.time.as_deref().and_then(parse_time),
    }
}

fn parse_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|time| time.with_timezone(&Utc))
}

fn content_from_model(
    kind: &str,
    text: Option<String>,
    file_url: Option<String>,
    file_name: Option<String>,
) -> MessageContent {
    match kind {
        "text" => MessageContent::Text {
            text: text.unwrap_or_default(),
        },
        "image" | "file" => {
            let url = file_url.unwrap_or_default();
            let file_name = file_name.unwrap_or_else(|| name_from_url(&url));
            if kind == "image" {
                MessageContent::Image { url, file_name }
            } else {
                MessageContent::File { url, file_name }
            }
        }
        "location" => MessageContent::Location {
            url: text.or(file_url).unwrap_or_default(),
        },
        other => MessageContent::Unknown {
            kind: other.to_string(),
        },
    }
}

fn name_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path).to_string()
}

/// Prepare a message for writing
impl From<&Message> for MessageModel {
    fn from(message: &Message) -> Self {
        let (kind, text, file_url, file_name) = match &message.content {
            MessageContent::Text { text } => ("text".to_string(), Some(text.clone()), None, None),
            MessageContent::Image { url, file_name } => (
                "image".to_string(),
                None,
                Some(url.clone()),
                Some(file_name.clone()),
            ),
            MessageContent::File { url, file_name } => (
                "file".to_string(),
                None,
                Some(url.clone()),
                Some(file_name.clone()),
            ),
            MessageContent::Location { url } => {
                ("location".to_string(), Some(url.clone()), None, None)
            }
            MessageContent::Unknown { kind } => (kind.clone(), None, None, None),
        };

        Self {
            id: Some(message.id.to_string()),
            kind: Some(kind),
            text,
            file_url,
            file_name,
            sender: message.sender.to_string(),
            sender_name: message.sender_name.clone(),
            receiver: message.receiver.as_ref().map(ToString::to_string),
            date: message.sent_at.map(|time| time.to_rfc3339()),
            seen: message.seen.as_ref().map(SeenModel::from),
            reactions: message
                .reactions
                .iter()
                .map(|(participant, emoji)| (participant.to_string(), emoji.clone()))
                .collect::<BTreeMap<_, _>>(),
        }
    }
}

impl From<&SeenReceipt> for SeenModel {
    fn from(receipt: &SeenReceipt) -> Self {
        Self {
            status: receipt.status,
            time: receipt.time.map(|time| time.to_rfc3339()),
        }
    }
}
