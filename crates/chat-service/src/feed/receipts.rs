//! Read receipts
//!
//! Group conversations track whether the newest message has been seen.
//! Receivers acknowledge it, the sender sees the result under their own
//! last message.

use chrono::{DateTime, Utc};

use chat_core::entities::Message;
use chat_core::value_objects::ParticipantId;

/// Receipt shown under the viewer's own newest message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatestReceipt {
    Seen { at: Option<DateTime<Utc>> },
    NotSeen,
}

impl LatestReceipt {
    /// "Seen at 14:05" or "Not seen yet"
    pub fn label(&self) -> String {
        match self {
            Self::Seen { at: Some(at) } => format!("Seen at {}", at.format("%H:%M")),
            Self::Seen { at: None } => "Seen".to_string(),
            Self::NotSeen => "Not seen yet".to_string(),
        }
    }
}

/// Last row the projector would show for the same `fallback_time`
fn newest(messages: &[Message], fallback_time: DateTime<Utc>) -> Option<&Message> {
    messages
        .iter()
        .max_by(|a, b| a.order_key(fallback_time).cmp(&b.order_key(fallback_time)))
}

/// Newest message the viewer still has to acknowledge
///
/// Only the newest message of the conversation is considered; it needs an
/// acknowledgement when someone else sent it and it is not marked seen.
/// Undated records count as sent at `fallback_time`.
pub fn pending_acknowledgement<'a>(
    messages: &'a [Message],
    viewer: &ParticipantId,
    fallback_time: DateTime<Utc>,
) -> Option<&'a Message> {
    newest(messages, fallback_time).filter(|message| !message.is_from(viewer) && !message.is_seen())
}

/// Receipt of the newest message when the viewer sent it
pub fn receipt_for_latest(
    messages: &[Message],
    viewer: &ParticipantId,
    fallback_time: DateTime<Utc>,
) -> Option<LatestReceipt> {
    let latest = newest(messages, fallback_time).filter(|message| message.is_from(viewer))?;

    Some(match latest.seen {
        Some(receipt) if receipt.status => LatestReceipt::Seen { at: receipt.time },
        _ => LatestReceipt::NotSeen,
    })
}
