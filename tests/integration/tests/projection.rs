//! Feed projection properties over larger, shuffled snapshots
//!
//! Run with: cargo test -p integration-tests --test projection

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};

use chat_core::entities::{ConversationKind, Message, MessageContent, MessageDraft};
use chat_core::value_objects::{ConversationId, MessageId, ParticipantId};
use chat_service::{project, project_inverted, DisplayItem, ProjectionContext};
use integration_tests::pid;

fn message(index: u32, sent_at: DateTime<Utc>) -> Message {
    let sender = if index % 3 == 0 { pid("u2") } else { pid("u1") };
    let mut draft = MessageDraft::new(sender, MessageContent::text(format!("m{index}")));
    draft.sent_at = sent_at;
    Message::from_draft(
        MessageId::from(format!("-N{index:04}")),
        ConversationId::from("u2u1"),
        draft,
    )
}

/// Messages every 7 hours over about two weeks, in a scrambled order
fn scrambled_snapshot() -> Vec<Message> {
    let start = Utc.with_ymd_and_hms(2024, 5, 1, 6, 30, 0).unwrap();
    let mut messages: Vec<_> = (0..48u32)
        .map(|i| message(i, start + Duration::hours(7 * i64::from(i))))
        .collect();

    // Deterministic shuffle: interleave from both ends
    let mut scrambled = Vec::with_capacity(messages.len());
    while !messages.is_empty() {
        scrambled.push(messages.remove(0));
        if let Some(last) = messages.pop() {
            scrambled.push(last);
        }
    }
    scrambled
}

fn viewer_ctx(viewer: &ParticipantId) -> ProjectionContext<'_> {
    ProjectionContext::new(viewer, ConversationKind::Direct, Utc::now())
}

#[test]
fn test_sorted_with_one_separator_per_day() {
    let viewer = pid("u1");
    let snapshot = scrambled_snapshot();
    let items = project(&snapshot, &viewer_ctx(&viewer));

    let mut last_sent = None;
    let mut current_day = None;
    let mut separators = Vec::new();
    for item in &items {
        match item {
            DisplayItem::DateSeparator(separator) => {
                separators.push(separator.date);
                current_day = Some(separator.date);
            }
            DisplayItem::Message(message) => {
                assert_eq!(Some(message.sent_at.date_naive()), current_day);
                if let Some(previous) = last_sent {
                    assert!(message.sent_at > previous);
                }
                last_sent = Some(message.sent_at);
            }
        }
    }

    let mut distinct_days: Vec<_> = snapshot
        .iter()
        .filter_map(|message| message.sent_at)
        .map(|sent_at| sent_at.date_naive())
        .collect();
    distinct_days.sort();
    distinct_days.dedup();
    assert_eq!(separators, distinct_days);
    assert_eq!(items.len(), snapshot.len() + distinct_days.len());
}

#[test]
fn test_input_order_does_not_matter() {
    let viewer = pid("u1");
    let ctx = viewer_ctx(&viewer);
    let snapshot = scrambled_snapshot();
    let mut reversed = snapshot.clone();
    reversed.reverse();

    let first = project(&snapshot, &ctx);
    assert_eq!(first, project(&snapshot, &ctx));
    assert_eq!(first, project(&reversed, &ctx));

    let mut inverted = project_inverted(&reversed, &ctx);
    inverted.reverse();
    assert_eq!(inverted, first);
}

#[test]
fn test_offset_moves_day_boundaries() {
    let viewer = pid("u1");
    let late_evening = Utc.with_ymd_and_hms(2024, 5, 1, 22, 30, 0).unwrap();
    let snapshot = vec![message(1, late_evening), message(2, late_evening + Duration::hours(2))];

    let utc = project(&snapshot, &viewer_ctx(&viewer));
    let separators = utc.iter().filter(|item| item.as_separator().is_some()).count();
    assert_eq!(separators, 2);

    let plus_three = FixedOffset::east_opt(3 * 3600).unwrap();
    let shifted = project(&snapshot, &viewer_ctx(&viewer).with_offset(plus_three));
    let separators: Vec<_> = shifted.iter().filter_map(DisplayItem::as_separator).collect();
    assert_eq!(separators.len(), 1);
    assert_eq!(separators[0].date.to_string(), "2024-05-02");
}
