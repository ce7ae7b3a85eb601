//! Feed projector
//!
//! Turns an unordered message snapshot into the display list of a
//! conversation: chronological order, one separator per calendar day, and
//! per-message rendering data. Pure and deterministic.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

use chat_core::entities::{ConversationKind, Message, MessageContent, SeenReceipt};
use chat_core::value_objects::{MessageId, ParticipantId};

use crate::directory::ProfileDirectory;

/// Everything the projector needs besides the messages themselves
#[derive(Debug, Clone, Copy)]
pub struct ProjectionContext<'a> {
    pub viewer: &'a ParticipantId,
    pub kind: ConversationKind,
    /// Send time assumed for records without one (usually the subscription time)
    pub fallback_time: DateTime<Utc>,
    /// Offset calendar days are computed in
    pub offset: FixedOffset,
    pub directory: Option<&'a ProfileDirectory>,
}

impl<'a> ProjectionContext<'a> {
    pub fn new(viewer: &'a ParticipantId, kind: ConversationKind, fallback_time: DateTime<Utc>) -> Self {
        Self {
            viewer,
            kind,
            fallback_time,
            offset: Utc.fix(),
            directory: None,
        }
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_directory(mut self, directory: &'a ProfileDirectory) -> Self {
        self.directory = Some(directory);
        self
    }
}

/// One row of a rendered feed
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayItem {
    DateSeparator(DateSeparator),
    Message(MessageItem),
}

impl DisplayItem {
    pub fn as_message(&self) -> Option<&MessageItem> {
        match self {
            Self::Message(item) => Some(item),
            Self::DateSeparator(_) => None,
        }
    }

    pub fn as_separator(&self) -> Option<&DateSeparator> {
        match self {
            Self::DateSeparator(separator) => Some(separator),
            Self::Message(_) => None,
        }
    }
}

/// Marker opening a new calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateSeparator {
    pub date: NaiveDate,
}

impl DateSeparator {
    /// "Today", "Yesterday", or the full date ("May 3, 2024")
    pub fn label(&self, today: NaiveDate) -> String {
        if self.date == today {
            "Today".to_string()
        } else if today.pred_opt() == Some(self.date) {
            "Yesterday".to_string()
        } else {
            self.date.format("%B %-d, %Y").to_string()
        }
    }
}

/// Renderable payload, mirroring [`MessageContent`]
#[derive(Debug, Clone, PartialEq)]
pub enum MessageBody {
    Text { text: String },
    Image { url: String, file_name: String },
    File { url: String, file_name: String },
    Location { url: String, coordinates: Option<(f64, f64)> },
    /// Placeholder for records of a kind this client cannot render
    Unsupported { kind: String },
}

impl From<&MessageContent> for MessageBody {
    fn from(content: &MessageContent) -> Self {
        match content {
            MessageContent::Text { text } => Self::Text { text: text.clone() },
            MessageContent::Image { url, file_name } => Self::Image {
                url: url.clone(),
                file_name: file_name.clone(),
            },
            MessageContent::File { url, file_name } => Self::File {
                url: url.clone(),
                file_name: file_name.clone(),
            },
            MessageContent::Location { url } => Self::Location {
                url: url.clone(),
                coordinates: content.coordinates(),
            },
            MessageContent::Unknown { kind } => Self::Unsupported { kind: kind.clone() },
        }
    }
}

/// A message as rendered in the feed
#[derive(Debug, Clone, PartialEq)]
pub struct MessageItem {
    pub id: MessageId,
    pub sender: ParticipantId,
    /// Shown above group messages; `None` in direct conversations
    pub sender_name: Option<String>,
    pub is_mine: bool,
    pub body: MessageBody,
    /// Effective send time in the projection offset
    pub sent_at: DateTime<FixedOffset>,
    /// One emoji per reacting participant, in participant order
    pub reactions: Vec<String>,
    pub seen: Option<SeenReceipt>,
    /// Same sender as the previous message of the same day
    pub continues_run: bool,
}

impl MessageItem {
    /// Send time as `HH:MM`
    pub fn time_label(&self) -> String {
        self.sent_at.format("%H:%M").to_string()
    }
}

/// Project a message snapshot into chronological display items
pub fn project(messages: &[Message], ctx: &ProjectionContext<'_>) -> Vec<DisplayItem> {
    let mut ordered: Vec<&Message> = messages.iter().collect();
    ordered.sort_by(|a, b| {
        a.order_key(ctx.fallback_time)
            .cmp(&b.order_key(ctx.fallback_time))
    });

    let mut items = Vec::with_capacity(ordered.len() * 2);
    let mut previous: Option<(NaiveDate, &ParticipantId)> = None;

    for message in ordered {
        let sent_at = message
            .sent_at
            .unwrap_or(ctx.fallback_time)
            .with_timezone(&ctx.offset);
        let day = sent_at.date_naive();

        let same_day = previous.is_some_and(|(date, _)| date == day);
        if !same_day {
            items.push(DisplayItem::DateSeparator(DateSeparator { date: day }));
        }
        let continues_run = same_day && previous.is_some_and(|(_, sender)| sender == &message.sender);

        items.push(DisplayItem::Message(MessageItem {
            id: message.id.clone(),
            sender: message.sender.clone(),
            sender_name: sender_name(message, ctx),
            is_mine: message.is_from(ctx.viewer),
            body: MessageBody::from(&message.content),
            sent_at,
            reactions: message.reactions.values().cloned().collect(),
            seen: message.seen,
            continues_run,
        }));

        previous = Some((day, &message.sender));
    }

    items
}

/// Same as [`project`], newest first, for bottom-anchored lists
pub fn project_inverted(messages: &[Message], ctx: &ProjectionContext<'_>) -> Vec<DisplayItem> {
    let mut items = project(messages, ctx);
    items.reverse();
    items
}

fn sender_name(message: &Message, ctx: &ProjectionContext<'_>) -> Option<String> {
    if !ctx.kind.is_group() {
        return None;
    }

    ctx.directory
        .and_then(|directory| directory.known_name(&message.sender))
        .map(str::to_string)
        .or_else(|| message.sender_name.clone())
}
