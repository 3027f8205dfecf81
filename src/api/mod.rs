//! REST API module
//!
//! Thin async client over the backend's JSON endpoints. The backend wraps
//! every response in a `{ "success": bool, "message": ... }` envelope;
//! the client turns `success: false` and HTTP errors into [`crate::Error`].

mod client;
mod requests;

pub use client::ApiClient;
pub use requests::{
    is_valid_email, ConnectionResponse, LoginRequest, NewEvent, NewJob, NewPost, RegisterRequest, MIN_PASSWORD_LEN,
};
