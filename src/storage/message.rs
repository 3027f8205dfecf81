//! Direct message records as returned by the messages endpoint

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Timestamp layout the backend uses for `created_at` columns
const BACKEND_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Represents a direct message between two users
///
/// Messages are immutable once fetched. A missing `sender_id` or
/// `receiver_id` decodes as an empty string, which the conversation
/// deriver treats as a malformed record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message ID
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Sender user ID
    #[serde(default, deserialize_with = "string_or_number")]
    pub sender_id: String,
    /// Receiver user ID
    #[serde(default, deserialize_with = "string_or_number")]
    pub receiver_id: String,
    /// Message text
    #[serde(default)]
    pub content: String,
    /// Creation time (UTC)
    #[serde(deserialize_with = "backend_timestamp")]
    pub created_at: DateTime<Utc>,
    /// Sender display name, when the API joins it in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    /// Receiver display name, when the API joins it in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_name: Option<String>,
}

impl Message {
    /// Create a new message without display names
    pub fn new(
        id: impl Into<String>,
        sender_id: impl Into<String>,
        receiver_id: impl Into<String>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            sender_id: sender_id.into(),
            receiver_id: receiver_id.into(),
            content: content.into(),
            created_at,
            sender_name: None,
            receiver_name: None,
        }
    }

    /// Attach sender and receiver display names
    pub fn with_names(mut self, sender_name: impl Into<String>, receiver_name: impl Into<String>) -> Self {
        self.sender_name = Some(sender_name.into());
        self.receiver_name = Some(receiver_name.into());
        self
    }

    /// Whether both participant ids are present
    pub fn has_participants(&self) -> bool {
        !self.sender_id.is_empty() && !self.receiver_id.is_empty()
    }

    /// Whether `user_id` sent or received this message
    pub fn involves(&self, user_id: &str) -> bool {
        self.sender_id == user_id || self.receiver_id == user_id
    }

    /// The other participant relative to `user_id`
    ///
    /// Returns `None` when `user_id` is not a participant.
    pub fn counterpart_of(&self, user_id: &str) -> Option<&str> {
        if self.sender_id == user_id {
            Some(&self.receiver_id)
        } else if self.receiver_id == user_id {
            Some(&self.sender_id)
        } else {
            None
        }
    }

    /// Display name of the other participant relative to `user_id`
    pub fn counterpart_name_of(&self, user_id: &str) -> Option<&str> {
        if self.sender_id == user_id {
            self.receiver_name.as_deref()
        } else {
            self.sender_name.as_deref()
        }
        .filter(|name| !name.is_empty())
    }

    /// Whether `user_id` authored this message
    pub fn is_own(&self, user_id: &str) -> bool {
        self.sender_id == user_id
    }
}

/// Parse a backend timestamp
///
/// Accepts RFC 3339 as well as the backend's `YYYY-MM-DD HH:MM:SS`
/// form, which carries no offset and is read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, BACKEND_TIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

fn backend_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
}

/// Ids come back as strings or integers depending on the endpoint
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(i64),
        Null,
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
        Raw::Null => String::new(),
    })
}
