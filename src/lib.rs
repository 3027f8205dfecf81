//! ITPro - client core for the IT Professionals networking app
//!
//! This library provides the logic that sits behind the app's screens:
//! conversation summaries derived from the message list, job-post and
//! subscription pricing, the REST API client and the local session cache.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod format;
pub mod messaging;
pub mod pricing;
pub mod storage;

#[cfg(test)]
mod tests;

/// Result type alias for ITPro operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for ITPro operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Pricing selection references a tier that is not in the catalogue
    #[error("Invalid pricing tier: {tier_id}")]
    InvalidTier {
        /// The tier id that could not be found
        tier_id: String,
    },

    /// Selection total does not fit in a `Price`
    #[error("Price overflow pricing tier: {tier_id}")]
    PriceOverflow {
        /// The selected tier id
        tier_id: String,
    },

    /// Local storage error (session cache, settings)
    #[error("Storage error: {0}")]
    Storage(String),

    /// The API answered with an error status or `success: false`
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message reported by the server, if any
        message: String,
    },

    /// The API rejected the stored credentials; the session was cleared
    #[error("Unauthorized: session expired or invalid")]
    Unauthorized,

    /// Client-side form validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Initialize the ITPro library with logging
///
/// Honors `RUST_LOG`, defaulting to `info`.
pub fn init() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
