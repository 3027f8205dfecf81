//! Local storage module
//!
//! This module holds the records the app keeps on the device or derives
//! from API data:
//! - `message` - Direct message records and timestamp parsing
//! - `chat` - Conversation summaries for the messages list
//! - `session` - Two-key session cache (auth token and user record)
//! - `settings` - Application settings and configuration

// Submodules
pub mod chat;
pub mod message;
pub mod session;
pub mod settings;

// Re-export commonly used types
pub use chat::{ConversationSummary, UNKNOWN_USER};
pub use message::{Message, parse_timestamp};
pub use session::{SessionStore, User};
pub use settings::Settings;
