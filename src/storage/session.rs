//! Local session cache: the auth token and the signed-in user record
//!
//! The cache holds exactly two keys, `user_token` and `user_data`,
//! persisted together as a JSON file.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::message::string_or_number;

/// The signed-in user's profile record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Area of expertise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expertise: Option<String>,
    /// Location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// LinkedIn profile URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    /// GitHub profile URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    /// Account creation time, as sent by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last profile update, as sent by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl User {
    /// Create a user record with only the required fields
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            expertise: None,
            location: None,
            linkedin: None,
            github: None,
            created_at: None,
            updated_at: None,
        }
    }
}

/// On-disk layout of the session file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionData {
    #[serde(default)]
    user_token: Option<String>,
    #[serde(default)]
    user_data: Option<User>,
}

/// File-backed session cache
///
/// Every mutation is written through to disk immediately.
///
/// # Example
/// ```rust,no_run
/// use itpro::storage::{SessionStore, User};
///
/// let mut session = SessionStore::open("data/session.json").expect("Failed to open session");
/// session
///     .store_auth_data("token-123", User::new("42", "Ada", "ada@example.com"))
///     .expect("Failed to store session");
/// assert!(session.is_logged_in());
/// ```
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
    data: SessionData,
}

impl SessionStore {
    /// Open the session file, starting empty if it doesn't exist
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Ok(Self {
                path,
                data: SessionData::default(),
            });
        }

        let json = std::fs::read_to_string(&path)
            .map_err(|e| Error::Storage(format!("Failed to read session file: {}", e)))?;

        let data = if json.trim().is_empty() {
            SessionData::default()
        } else {
            serde_json::from_str(&json)
                .map_err(|e| Error::Storage(format!("Failed to parse session file: {}", e)))?
        };

        Ok(Self { path, data })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store the token and user record after a successful login or registration
    pub fn store_auth_data(&mut self, token: impl Into<String>, user: User) -> Result<()> {
        tracing::info!("Storing session for user {}", user.id);
        self.data.user_token = Some(token.into());
        self.data.user_data = Some(user);
        self.save()
    }

    /// The stored auth token
    pub fn token(&self) -> Option<&str> {
        self.data.user_token.as_deref()
    }

    /// The stored user record
    pub fn user(&self) -> Option<&User> {
        self.data.user_data.as_ref()
    }

    /// Whether a token is stored
    pub fn is_logged_in(&self) -> bool {
        self.data.user_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Replace the stored user record, keeping the token
    pub fn update_user(&mut self, user: User) -> Result<()> {
        self.data.user_data = Some(user);
        self.save()
    }

    /// Remove both keys (logout)
    pub fn clear(&mut self) -> Result<()> {
        tracing::info!("Clearing session");
        self.data = SessionData::default();
        self.save()
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::Storage(format!("Failed to create session directory: {}", e))
                })?;
            }
        }

        let json = serde_json::to_string_pretty(&self.data)?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options
            .open(&self.path)
            .map_err(|e| Error::Storage(format!("Failed to open session file: {}", e)))?;

        // `mode` only applies on create; tighten a pre-existing file before the token lands in it
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))
                .map_err(|e| Error::Storage(format!("Failed to set session permissions: {}", e)))?;
        }

        file.write_all(json.as_bytes())
            .map_err(|e| Error::Storage(format!("Failed to write session file: {}", e)))?;

        Ok(())
    }
}
