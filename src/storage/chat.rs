//! Conversation summaries shown in the messages list

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name shown for a counterpart whose display name never came back from the API
pub const UNKNOWN_USER: &str = "Unknown User";

/// Summary of the conversation with one counterpart
///
/// Derived from the message list on every refresh and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    /// The other participant's user ID
    pub counterpart_id: String,
    /// The other participant's display name
    pub counterpart_name: String,
    /// Content of the most recent message
    pub last_message_content: String,
    /// Time of the most recent message
    pub last_message_time: DateTime<Utc>,
}

impl ConversationSummary {
    /// Create a new conversation summary
    pub fn new(
        counterpart_id: String,
        counterpart_name: Option<String>,
        last_message_content: String,
        last_message_time: DateTime<Utc>,
    ) -> Self {
        Self {
            counterpart_id,
            counterpart_name: counterpart_name.unwrap_or_else(|| UNKNOWN_USER.to_string()),
            last_message_content,
            last_message_time,
        }
    }

    /// Whether the counterpart name is the placeholder
    pub fn has_unknown_name(&self) -> bool {
        self.counterpart_name == UNKNOWN_USER
    }

    /// Preview of the last message, cut to `max_chars` characters with an ellipsis
    pub fn preview(&self, max_chars: usize) -> String {
        let text = self.last_message_content.trim();
        if text.chars().count() <= max_chars {
            return text.to_string();
        }
        let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut.trim_end())
    }
}
