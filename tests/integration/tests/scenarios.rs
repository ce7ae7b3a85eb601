//! End-to-end scenarios
//!
//! Several participants share one in-memory backend, each through their own
//! service context, device and session.
//!
//! Run with: cargo test -p integration-tests --test scenarios

use chat_core::entities::{DevicePermission, MessageContent};
use chat_core::value_objects::ConversationId;
use chat_service::{
    typing_indicator_text, AttachmentRequest, AttachmentState, Composer, ConversationRef,
    FeedService, GroupService, InboxService, LatestReceipt, MessageService, ProfileService,
    ServiceError, SessionService, TypingService,
};
use integration_tests::{
    group_request, inline_image, pid, profile_request, texts, wait_for, TestBackend,
};

// ============================================================================
// Direct conversations
// ============================================================================

#[tokio::test]
async fn test_direct_hello_reaches_both_sides() {
    let backend = TestBackend::new();
    let alice = backend.client("u1").unwrap();
    let bob = backend.client("u2").unwrap();

    let to_bob = ConversationRef::direct(pid("u2"));
    let to_alice = ConversationRef::direct(pid("u1"));
    assert_eq!(to_bob.id(&alice.participant), to_alice.id(&bob.participant));
    assert_eq!(to_bob.id(&alice.participant).as_str(), "u2u1");

    let alice_feed = FeedService::new(&alice.ctx).open(&to_bob, &alice.participant).unwrap();
    let bob_feed = FeedService::new(&bob.ctx).open(&to_alice, &bob.participant).unwrap();

    let mut composer = Composer::new(alice.ctx.clone(), to_bob, alice.participant.clone());
    composer.send_text("hello").await.unwrap();

    for feed in [&alice_feed, &bob_feed] {
        let current = feed.current();
        assert_eq!(current.items.len(), 2);
        assert!(current.items[0].as_separator().is_some());
        assert_eq!(texts(&current), ["hello"]);
    }

    assert!(alice_feed.current().items[1].as_message().unwrap().is_mine);
    assert!(!bob_feed.current().items[1].as_message().unwrap().is_mine);
}

#[tokio::test]
async fn test_concurrent_reactions_merge() {
    let backend = TestBackend::new();
    let alice = backend.client("u1").unwrap();
    let bob = backend.client("u2").unwrap();
    let conversation = ConversationRef::direct(pid("u2"));
    let conversation_id = conversation.id(&alice.participant);

    let message = MessageService::new(&alice.ctx)
        .send(&conversation, &alice.participant, MessageContent::text("lunch?"), None)
        .await
        .unwrap();

    let alice_messages = MessageService::new(&alice.ctx);
    let bob_messages = MessageService::new(&bob.ctx);
    let (first, second) = tokio::join!(
        alice_messages.react(&conversation_id, &message.id, &alice.participant, "👍"),
        bob_messages.react(&conversation_id, &message.id, &bob.participant, "😋"),
    );
    first.unwrap();
    second.unwrap();

    let stored = alice.ctx.message_repo().latest(&conversation_id).await.unwrap().unwrap();
    assert_eq!(stored.reaction_of(&alice.participant), Some("👍"));
    assert_eq!(stored.reaction_of(&bob.participant), Some("😋"));

    bob_messages
        .react(&conversation_id, &message.id, &bob.participant, "❤️")
        .await
        .unwrap();

    let stored = alice.ctx.message_repo().latest(&conversation_id).await.unwrap().unwrap();
    assert_eq!(stored.reaction_of(&alice.participant), Some("👍"));
    assert_eq!(stored.reaction_of(&bob.participant), Some("❤️"));
    assert_eq!(stored.reactions.len(), 2);
}

#[tokio::test]
async fn test_typing_indicator_follows_input() {
    let backend = TestBackend::new();
    let alice = backend.client("u1").unwrap();
    let bob = backend.client("u2").unwrap();
    ProfileService::new(&alice.ctx)
        .save_profile(&alice.participant, profile_request("Amira"))
        .await
        .unwrap();

    let conversation = ConversationRef::direct(pid("u2"));
    let conversation_id = conversation.id(&alice.participant);
    let bob_watch = TypingService::new(&bob.ctx)
        .watch(&conversation_id, &bob.participant)
        .unwrap();
    let directory = ProfileService::new(&bob.ctx).directory().await.unwrap();

    let mut composer = Composer::new(alice.ctx.clone(), conversation, alice.participant.clone());
    composer.input_changed("h").await.unwrap();

    assert_eq!(
        typing_indicator_text(&bob_watch.current(), Some(&directory)).as_deref(),
        Some("Amira is typing...")
    );

    composer.input_changed("hi").await.unwrap();
    composer.send_text("hi").await.unwrap();

    assert!(bob_watch.current().is_empty());
    assert_eq!(typing_indicator_text(&bob_watch.current(), Some(&directory)), None);
}

// ============================================================================
// Attachments
// ============================================================================

#[tokio::test]
async fn test_failed_image_upload_appends_nothing() {
    let backend = TestBackend::new();
    let alice = backend.client("u1").unwrap();
    let conversation = ConversationRef::direct(pid("u2"));
    let conversation_id = conversation.id(&alice.participant);

    alice.device.queue_capture(Some(inline_image(&[0xFF, 0xD8, 0xFF])));
    backend.storage.set_upload_failure(Some("network down"));

    let mut composer = Composer::new(alice.ctx.clone(), conversation, alice.participant.clone());
    let state = composer.attachment_state();
    let result = composer.send_attachment(AttachmentRequest::library()).await;

    assert!(result.is_err());
    assert_eq!(*state.borrow(), AttachmentState::Idle);
    assert!(backend.storage.is_empty());
    let messages = alice.ctx.message_repo().find_all(&conversation_id).await.unwrap();
    assert!(messages.is_empty());
}

#[tokio::test]
async fn test_image_upload_visible_to_receiver() {
    let backend = TestBackend::new();
    let alice = backend.client("u1").unwrap();
    let bob = backend.client("u2").unwrap();
    let bob_feed = FeedService::new(&bob.ctx)
        .open(&ConversationRef::direct(pid("u1")), &bob.participant)
        .unwrap();

    alice.device.queue_capture(Some(inline_image(b"jpeg bytes")));
    let mut composer = Composer::new(
        alice.ctx.clone(),
        ConversationRef::direct(pid("u2")),
        alice.participant.clone(),
    );
    let message = composer
        .send_attachment(AttachmentRequest::camera())
        .await
        .unwrap()
        .unwrap();

    let url = message.content.url().unwrap().to_string();
    assert!(url.ends_with(&format!("profileImages/{}.jpg", message.id)));
    assert_eq!(bob_feed.current().message_count(), 1);
}

#[tokio::test]
async fn test_denied_location_sends_nothing() {
    let backend = TestBackend::new();
    let alice = backend.client("u1").unwrap();
    alice.device.deny(DevicePermission::Location);
    let conversation = ConversationRef::direct(pid("u2"));
    let conversation_id = conversation.id(&alice.participant);

    let mut composer = Composer::new(alice.ctx.clone(), conversation, alice.participant.clone());
    let err = composer.share_location().await.unwrap_err();

    assert!(err.is_permission_denied());
    assert!(err.notice().message.contains("location"));
    assert!(alice.ctx.message_repo().latest(&conversation_id).await.unwrap().is_none());
}

// ============================================================================
// Groups
// ============================================================================

#[tokio::test]
async fn test_group_read_receipt_round_trip() {
    let backend = TestBackend::new();
    let alice = backend.client("u1").unwrap();
    let bob = backend.client("u2").unwrap();

    let group = GroupService::new(&alice.ctx)
        .create_group(&alice.participant, group_request(&["u2"]))
        .await
        .unwrap();
    assert!(group.is_member(&alice.participant));
    let conversation = ConversationRef::group(group);

    let alice_feed = FeedService::new(&alice.ctx).open(&conversation, &alice.participant).unwrap();
    MessageService::new(&alice.ctx)
        .send(&conversation, &alice.participant, MessageContent::text("meeting at 5"), None)
        .await
        .unwrap();
    assert_eq!(alice_feed.current().receipt, Some(LatestReceipt::NotSeen));

    let bob_feed = FeedService::new(&bob.ctx).open(&conversation, &bob.participant).unwrap();
    wait_for(|| matches!(alice_feed.current().receipt, Some(LatestReceipt::Seen { .. })))
        .await
        .unwrap();

    assert_eq!(texts(&bob_feed.current()), ["meeting at 5"]);
}

#[tokio::test]
async fn test_group_membership_lists() {
    let backend = TestBackend::new();
    let alice = backend.client("u1").unwrap();
    let groups = GroupService::new(&alice.ctx);

    let mine = groups
        .create_group(&alice.participant, group_request(&["u2", "u3"]))
        .await
        .unwrap();
    groups
        .create_group(&pid("u3"), group_request(&["u1"]))
        .await
        .unwrap();
    groups
        .create_group(&pid("u4"), group_request(&["u5"]))
        .await
        .unwrap();

    assert_eq!(groups.groups_for_member(&alice.participant).await.unwrap().len(), 2);
    let administered = groups.groups_administered(&alice.participant).await.unwrap();
    assert_eq!(administered, [mine]);
}

// ============================================================================
// Inbox & session
// ============================================================================

#[tokio::test]
async fn test_inbox_preview_labels() {
    let backend = TestBackend::new();
    let alice = backend.client("u1").unwrap();
    let bob = backend.client("u2").unwrap();
    let carol = backend.client("u3").unwrap();
    for (client, name) in [(&alice, "Amira"), (&bob, "Bilal"), (&carol, "Chiraz")] {
        ProfileService::new(&client.ctx)
            .save_profile(&client.participant, profile_request(name))
            .await
            .unwrap();
    }

    alice.device.set_position(36.8, 10.18);
    let mut composer = Composer::new(
        alice.ctx.clone(),
        ConversationRef::direct(pid("u2")),
        alice.participant.clone(),
    );
    composer.share_location().await.unwrap();

    let previews = InboxService::new(&alice.ctx).previews(&alice.participant).await.unwrap();
    let rows: Vec<_> = previews
        .iter()
        .map(|row| (row.contact.display_name.as_str(), row.preview.as_str()))
        .collect();
    assert_eq!(rows, [("Bilal", "📍 Location"), ("Chiraz", "No messages yet")]);

    let bob_view = InboxService::new(&bob.ctx).previews(&bob.participant).await.unwrap();
    let from_alice = bob_view
        .iter()
        .find(|row| row.contact.id == alice.participant)
        .unwrap();
    assert_eq!(from_alice.conversation_id, ConversationId::direct(&pid("u1"), &pid("u2")));
    assert_eq!(from_alice.preview, "📍 Location");
}

#[tokio::test]
async fn test_sign_out_goes_offline() {
    let backend = TestBackend::new();
    let alice = backend.client("u1").unwrap();
    let bob = backend.client("u2").unwrap();
    let session = SessionService::new(&alice.ctx);

    session.go_online().await.unwrap();
    let directory = ProfileService::new(&bob.ctx).watch_directory().unwrap();
    assert!(directory.current().is_online(&alice.participant));

    session.sign_out().await.unwrap();

    assert!(!directory.current().is_online(&alice.participant));
    assert!(matches!(session.current_user(), Err(ServiceError::App(_))));
}
