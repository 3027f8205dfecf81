// Message Tests - Testing message decoding and conversation summaries

use crate::storage::{parse_timestamp, ConversationSummary, Message, UNKNOWN_USER};
use chrono::{TimeZone, Utc};

#[test]
fn test_message_from_backend_json() {
    let json = r#"{
        "id": 12,
        "sender_id": "3",
        "receiver_id": 4,
        "content": "Are you open to contract work?",
        "created_at": "2024-01-15 10:30:00",
        "sender_name": "Grace"
    }"#;

    let msg: Message = serde_json::from_str(json).expect("Failed to parse message");

    assert_eq!(msg.id, "12");
    assert_eq!(msg.sender_id, "3");
    assert_eq!(msg.receiver_id, "4");
    assert_eq!(msg.created_at, Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap());
    assert_eq!(msg.sender_name.as_deref(), Some("Grace"));
    assert!(msg.receiver_name.is_none());
}

#[test]
fn test_message_missing_ids_decode_as_empty() {
    let json = r#"{ "id": "9", "content": "orphan", "created_at": "2024-01-15T10:30:00Z", "receiver_id": null }"#;

    let msg: Message = serde_json::from_str(json).expect("Failed to parse message");

    assert!(msg.sender_id.is_empty());
    assert!(msg.receiver_id.is_empty());
    assert!(!msg.has_participants());
}

#[test]
fn test_message_bad_timestamp_is_rejected() {
    let json = r#"{ "id": "1", "sender_id": "a", "receiver_id": "b", "content": "x", "created_at": "yesterday" }"#;

    assert!(serde_json::from_str::<Message>(json).is_err());
}

#[test]
fn test_parse_timestamp_formats() {
    let expected = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();

    assert_eq!(parse_timestamp("2024-06-01 08:00:00"), Some(expected));
    assert_eq!(parse_timestamp("2024-06-01T08:00:00Z"), Some(expected));
    assert_eq!(parse_timestamp("2024-06-01T10:00:00+02:00"), Some(expected));
    assert_eq!(parse_timestamp("06/01/2024"), None);
}

#[test]
fn test_counterpart_helpers() {
    let msg = Message::new("1", "alice", "bob", "hi", Utc::now()).with_names("Alice", "Bob");

    assert_eq!(msg.counterpart_of("alice"), Some("bob"));
    assert_eq!(msg.counterpart_of("bob"), Some("alice"));
    assert_eq!(msg.counterpart_of("carol"), None);
    assert_eq!(msg.counterpart_name_of("alice"), Some("Bob"));
    assert_eq!(msg.counterpart_name_of("bob"), Some("Alice"));
    assert!(msg.is_own("alice"));
    assert!(!msg.is_own("bob"));
}

#[test]
fn test_summary_defaults_unknown_name() {
    let summary = ConversationSummary::new("7".into(), None, "hello".into(), Utc::now());

    assert_eq!(summary.counterpart_name, UNKNOWN_USER);
    assert!(summary.has_unknown_name());
}

#[test]
fn test_summary_preview_truncates_on_char_boundary() {
    let summary = ConversationSummary::new(
        "7".into(),
        Some("Zoë".into()),
        "héllo wörld, this is long".into(),
        Utc::now(),
    );

    assert_eq!(summary.preview(100), "héllo wörld, this is long");
    assert_eq!(summary.preview(10), "héllo w...");
}
