//! Request bodies for the REST API, with the form checks the app runs
//! before submitting them

use crate::{Error, Result};
use serde::Serialize;

/// Minimum accepted password length at registration
pub const MIN_PASSWORD_LEN: usize = 6;

/// Registration form
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegisterRequest {
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
    /// Password confirmation; never sent to the server
    #[serde(skip)]
    pub confirm_password: String,
    /// Area of expertise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expertise: Option<String>,
    /// Location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// LinkedIn profile URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    /// GitHub profile URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
}

impl RegisterRequest {
    /// Check the form before it is submitted
    ///
    /// # Errors
    /// Returns [`Error::Validation`] naming the first failed check
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() || self.password.is_empty() {
            return Err(Error::Validation("Please fill in all required fields".into()));
        }
        if self.password != self.confirm_password {
            return Err(Error::Validation("Passwords do not match".into()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::Validation(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LEN
            )));
        }
        if !is_valid_email(&self.email) {
            return Err(Error::Validation("Please enter a valid email address".into()));
        }
        Ok(())
    }
}

/// `local@domain.tld` with no whitespace and exactly one `@`
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    // need a dot with something on both sides
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Login credentials
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
}

/// New feed post
#[derive(Debug, Clone, Serialize)]
pub struct NewPost {
    /// Post text
    pub content: String,
    /// Optional attached image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// New job listing
#[derive(Debug, Clone, Serialize)]
pub struct NewJob {
    /// Job title
    pub title: String,
    /// Description
    pub description: String,
    /// Hiring company
    pub company: String,
    /// Location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Salary range, free text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<String>,
    /// Employment type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
}

impl NewJob {
    /// Create a full-time job listing
    pub fn new(title: impl Into<String>, company: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            company: company.into(),
            location: None,
            salary_range: None,
            job_type: Some("Full-time".to_string()),
        }
    }

    /// Title, company and description are required
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() || self.company.trim().is_empty() || self.description.trim().is_empty() {
            return Err(Error::Validation("Please fill in all required fields".into()));
        }
        Ok(())
    }
}

/// New event
#[derive(Debug, Clone, Serialize)]
pub struct NewEvent {
    /// Event title
    pub title: String,
    /// Description
    pub description: String,
    /// Event date, as the backend expects it
    pub date: String,
    /// Location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Event type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
}

/// Answer to an incoming connection request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionResponse {
    /// Accept the request
    Accepted,
    /// Reject the request
    Rejected,
}

#[derive(Debug, Serialize)]
pub(crate) struct SendMessageRequest<'a> {
    pub receiver_id: &'a str,
    pub content: &'a str,
}
