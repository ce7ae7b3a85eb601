//! Message entity - one unit of communication in a conversation

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{ConversationId, MessageId, ParticipantId};

/// Message kinds that can be composed and rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Image,
    File,
    Location,
}

impl MessageKind {
    /// Wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::File => "file",
            Self::Location => "location",
        }
    }

    /// Parse a wire name
    pub fn parse(kind: &str) -> Result<Self, DomainError> {
        match kind {
            "text" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            "file" => Ok(Self::File),
            "location" => Ok(Self::Location),
            other => Err(DomainError::UnknownMessageKind(other.to_string())),
        }
    }

    /// Whether the kind references an uploaded object
    #[inline]
    pub fn is_attachment(&self) -> bool {
        matches!(self, Self::Image | Self::File)
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific message payload
#[derive(Debug, Clone, PartialEq)]
pub enum MessageContent {
    Text { text: String },
    Image { url: String, file_name: String },
    File { url: String, file_name: String },
    /// Map link built from device coordinates
    Location { url: String },
    /// Record whose kind this client does not know how to render
    Unknown { kind: String },
}

impl MessageContent {
    /// Text message content
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Location content pointing at `map_link_base?q=lat,lon`
    pub fn location(map_link_base: &str, latitude: f64, longitude: f64) -> Self {
        Self::Location {
            url: format!("{map_link_base}?q={latitude},{longitude}"),
        }
    }

    /// Kind of this content, `None` for unknown records
    pub fn kind(&self) -> Option<MessageKind> {
        match self {
            Self::Text { .. } => Some(MessageKind::Text),
            Self::Image { .. } => Some(MessageKind::Image),
            Self::File { .. } => Some(MessageKind::File),
            Self::Location { .. } => Some(MessageKind::Location),
            Self::Unknown { .. } => None,
        }
    }

    /// URL carried by the payload (attachment or map link)
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Image { url, .. } | Self::File { url, .. } | Self::Location { url } => Some(url),
            Self::Text { .. } | Self::Unknown { .. } => None,
        }
    }

    /// Coordinates encoded in a location link
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let Self::Location { url } = self else {
            return None;
        };

        let query = url.split_once("q=")?.1;
        let query = query.split('&').next()?;
        let (lat, lon) = query.split_once(',')?;
        Some((lat.trim().parse().ok()?, lon.trim().parse().ok()?))
    }

    /// One-line summary used in conversation lists
    pub fn preview(&self) -> String {
        match self {
            Self::Text { text } => text.clone(),
            Self::Image { .. } => "📷 Image".to_string(),
            Self::Location { .. } => "📍 Location".to_string(),
            Self::File { .. } => "📁 File".to_string(),
            Self::Unknown { .. } => "Unknown message type".to_string(),
        }
    }
}

/// Read receipt set by a receiving participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeenReceipt {
    pub status: bool,
    pub time: Option<DateTime<Utc>>,
}

impl SeenReceipt {
    /// Receipt of a message nobody has seen yet
    pub fn unseen() -> Self {
        Self {
            status: false,
            time: None,
        }
    }

    /// Receipt seen at `time`
    pub fn seen_at(time: DateTime<Utc>) -> Self {
        Self {
            status: true,
            time: Some(time),
        }
    }
}

/// Message entity
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender: ParticipantId,
    /// Display name captured at send time (group conversations)
    pub sender_name: Option<String>,
    /// Recipient (direct conversations)
    pub receiver: Option<ParticipantId>,
    pub content: MessageContent,
    /// Client-side timestamp; older records may lack one
    pub sent_at: Option<DateTime<Utc>>,
    /// At most one emoji per participant
    pub reactions: BTreeMap<ParticipantId, String>,
    pub seen: Option<SeenReceipt>,
}

impl Message {
    /// Materialize a draft under its assigned id
    pub fn from_draft(id: MessageId, conversation_id: ConversationId, draft: MessageDraft) -> Self {
        Self {
            id,
            conversation_id,
            sender: draft.sender,
            sender_name: draft.sender_name,
            receiver: draft.receiver,
            content: draft.content,
            sent_at: Some(draft.sent_at),
            reactions: BTreeMap::new(),
            seen: draft.seen,
        }
    }

    /// Check if the message was sent by `participant`
    #[inline]
    pub fn is_from(&self, participant: &ParticipantId) -> bool {
        &self.sender == participant
    }

    /// Check if a receiving participant has marked the message seen
    #[inline]
    pub fn is_seen(&self) -> bool {
        self.seen.is_some_and(|s| s.status)
    }

    /// Reaction of `participant`, if any
    pub fn reaction_of(&self, participant: &ParticipantId) -> Option<&str> {
        self.reactions.get(participant).map(String::as_str)
    }

    /// Chronological ordering key: send time (or `fallback` when missing), then id
    pub fn order_key(&self, fallback: DateTime<Utc>) -> (DateTime<Utc>, &MessageId) {
        (self.sent_at.unwrap_or(fallback), &self.id)
    }
}

/// Outbound message before the store assigns it an id
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDraft {
    /// Pre-reserved key, e.g. when an upload path was derived from it
    pub id: Option<MessageId>,
    pub sender: ParticipantId,
    pub sender_name: Option<String>,
    pub receiver: Option<ParticipantId>,
    pub content: MessageContent,
    pub sent_at: DateTime<Utc>,
    pub seen: Option<SeenReceipt>,
}

impl MessageDraft {
    /// New draft stamped with the current client time
    pub fn new(sender: ParticipantId, content: MessageContent) -> Self {
        Self {
            id: None,
            sender,
            sender_name: None,
            receiver: None,
            content,
            sent_at: Utc::now(),
            seen: None,
        }
    }

    /// Use a reserved id
    pub fn with_id(mut self, id: MessageId) -> Self {
        self.id = Some(id);
        self
    }

    /// Record the sender's display name
    pub fn with_sender_name(mut self, name: Option<String>) -> Self {
        self.sender_name = name;
        self
    }

    /// Record the recipient of a direct message
    pub fn with_receiver(mut self, receiver: ParticipantId) -> Self {
        self.receiver = Some(receiver);
        self
    }

    /// Start with an unseen receipt so recipients can acknowledge it
    pub fn track_seen(mut self) -> Self {
        self.seen = Some(SeenReceipt::unseen());
        self
    }
}

/// Field-level changes allowed on a stored message
#[derive(Debug, Clone, PartialEq)]
pub enum MessagePatch {
    /// Set (or replace) one participant's reaction
    Reaction {
        participant: ParticipantId,
        emoji: String,
    },
    /// Replace the read receipt
    Seen(SeenReceipt),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse() {
        assert_eq!(MessageKind::parse("image").unwrap(), MessageKind::Image);
        assert!(matches!(
            MessageKind::parse("sticker"),
            Err(DomainError::UnknownMessageKind(kind)) if kind == "sticker"
        ));
        assert!(MessageKind::File.is_attachment());
        assert!(!MessageKind::Location.is_attachment());
    }

    #[test]
    fn test_location_coordinates() {
        let content = MessageContent::location("https://www.google.com/maps", 36.8, 10.18);
        assert_eq!(
            content.url(),
            Some("https://www.google.com/maps?q=36.8,10.18")
        );
        assert_eq!(content.coordinates(), Some((36.8, 10.18)));
        assert_eq!(MessageContent::text("hi").coordinates(), None);
    }

    #[test]
    fn test_malformed_location_has_no_coordinates() {
        let content = MessageContent::Location {
            url: "https://maps.example/?q=north".to_string(),
        };
        assert_eq!(content.coordinates(), None);
    }

    #[test]
    fn test_preview_labels() {
        assert_eq!(MessageContent::text("hello").preview(), "hello");
        assert_eq!(
            MessageContent::Image {
                url: "u".to_string(),
                file_name: "a.jpg".to_string()
            }
            .preview(),
            "📷 Image"
        );
        assert_eq!(
            MessageContent::Unknown {
                kind: "poll".to_string()
            }
            .preview(),
            "Unknown message type"
        );
    }

    #[test]
    fn test_from_draft() {
        let draft = MessageDraft::new(ParticipantId::from("u1"), MessageContent::text("hello"))
            .with_receiver(ParticipantId::from("u2"))
            .track_seen();
        let sent_at = draft.sent_at;

        let message = Message::from_draft(
            MessageId::from("-Nx1"),
            ConversationId::from("u2u1"),
            draft,
        );

        assert_eq!(message.sent_at, Some(sent_at));
        assert!(message.reactions.is_empty());
        assert!(!message.is_seen());
        assert!(message.is_from(&ParticipantId::from("u1")));
        assert_eq!(message.receiver, Some(ParticipantId::from("u2")));
    }

    #[test]
    fn test_order_key_uses_fallback() {
        let fallback = Utc::now();
        let mut message = Message::from_draft(
            MessageId::from("-Nx2"),
            ConversationId::from("g1"),
            MessageDraft::new(ParticipantId::from("u1"), MessageContent::text("hi")),
        );
        message.sent_at = None;

        assert_eq!(message.order_key(fallback), (fallback, &MessageId::from("-Nx2")));
    }
}
