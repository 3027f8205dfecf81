//! Conversation derivation
//!
//! This module turns the flat message list returned by the API into the
//! per-counterpart summaries shown in the messages list, and extracts a
//! single thread for the conversation view.
//!
//! Both functions are pure: they take the local user's id explicitly and
//! recompute everything from the full message list on every call.

use crate::storage::{ConversationSummary, Message};
use std::collections::HashMap;

/// Fold a flat message list into one summary per counterpart
///
/// Messages that don't involve `local_user_id`, or that are missing a
/// sender or receiver id, are skipped. For each counterpart the summary
/// tracks the message with the greatest `created_at`; a later message
/// only replaces it when strictly newer, so among equal timestamps the
/// first one in input order wins.
///
/// The result lists counterparts in the order they were first seen. This
/// order carries no meaning; use [`sort_by_recency`] when the newest
/// conversation must come first.
///
/// # Example
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use itpro::messaging::derive_conversations;
/// use itpro::storage::Message;
///
/// let messages = vec![
///     Message::new("1", "alice", "bob", "hi", Utc.timestamp_opt(10, 0).unwrap()),
///     Message::new("2", "bob", "alice", "hey", Utc.timestamp_opt(20, 0).unwrap()),
/// ];
///
/// let conversations = derive_conversations(&messages, "alice");
/// assert_eq!(conversations.len(), 1);
/// assert_eq!(conversations[0].counterpart_id, "bob");
/// assert_eq!(conversations[0].last_message_content, "hey");
/// ```
pub fn derive_conversations(messages: &[Message], local_user_id: &str) -> Vec<ConversationSummary> {
    let mut summaries: Vec<ConversationSummary> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for message in messages {
        if !message.has_participants() {
            tracing::trace!("Skipping message {} with missing participant id", message.id);
            continue;
        }

        let Some(counterpart_id) = message.counterpart_of(local_user_id) else {
            tracing::trace!("Skipping message {} not involving local user", message.id);
            continue;
        };

        let name = message.counterpart_name_of(local_user_id);

        match index.get(counterpart_id).copied() {
            None => {
                index.insert(counterpart_id, summaries.len());
                summaries.push(ConversationSummary::new(
                    counterpart_id.to_string(),
                    name.map(str::to_string),
                    message.content.clone(),
                    message.created_at,
                ));
            }
            Some(slot) => {
                let summary = &mut summaries[slot];
                if message.created_at > summary.last_message_time {
                    summary.last_message_content = message.content.clone();
                    summary.last_message_time = message.created_at;
                }
                if summary.has_unknown_name() {
                    if let Some(name) = name {
                        summary.counterpart_name = name.to_string();
                    }
                }
            }
        }
    }

    summaries
}

/// Sort summaries newest first by `last_message_time`
///
/// The sort is stable, so conversations with equal times keep their
/// relative order.
pub fn sort_by_recency(conversations: &mut [ConversationSummary]) {
    conversations.sort_by(|a, b| b.last_message_time.cmp(&a.last_message_time));
}

/// All messages exchanged between `local_user_id` and `counterpart_id`
///
/// Both directions are included. The result is sorted oldest first by
/// `created_at`; messages with equal timestamps keep their input order.
pub fn conversation_messages<'a>(
    messages: &'a [Message],
    local_user_id: &str,
    counterpart_id: &str,
) -> Vec<&'a Message> {
    let mut thread: Vec<&Message> = messages
        .iter()
        .filter(|m| {
            (m.sender_id == local_user_id && m.receiver_id == counterpart_id)
                || (m.sender_id == counterpart_id && m.receiver_id == local_user_id)
        })
        .collect();

    thread.sort_by_key(|m| m.created_at);
    thread
}
