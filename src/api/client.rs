//! HTTP client for the ITPro REST API

use crate::{
    storage::{Message, SessionStore, Settings, User},
    Error, Result,
};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::requests::{
    ConnectionResponse, LoginRequest, NewEvent, NewJob, NewPost, RegisterRequest, SendMessageRequest,
};

/// Client for the ITPro REST API
///
/// Attaches the stored bearer token to every request. A 401 response
/// clears the shared session and surfaces as [`Error::Unauthorized`].
///
/// # Example
/// ```rust,no_run
/// use itpro::api::ApiClient;
/// use itpro::messaging::derive_conversations;
/// use itpro::storage::{SessionStore, Settings};
///
/// # async fn example() -> itpro::Result<()> {
/// let settings = Settings::default();
/// let session = SessionStore::open(&settings.session_path)?;
/// let client = ApiClient::new(&settings, session)?;
///
/// let me = client.login("ada@example.com", "secret1").await?;
/// let messages = client.messages().await?;
/// for conversation in derive_conversations(&messages, &me.id) {
///     println!("{}: {}", conversation.counterpart_name, conversation.last_message_content);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<Mutex<SessionStore>>,
}

impl ApiClient {
    /// Create a client from settings and an opened session store
    pub fn new(settings: &Settings, session: SessionStore) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            session: Arc::new(Mutex::new(session)),
        })
    }

    /// Shared handle to the session store
    pub fn session(&self) -> Arc<Mutex<SessionStore>> {
        Arc::clone(&self.session)
    }

    /// Id of the signed-in user, if any
    pub async fn current_user_id(&self) -> Option<String> {
        self.session.lock().await.user().map(|u| u.id.clone())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);
        self.http.request(method, url)
    }

    /// Send a request and unwrap the `{ success, message, ... }` envelope
    async fn send(&self, req: RequestBuilder) -> Result<Value> {
        let token = self.session.lock().await.token().map(str::to_string);
        let req = match token {
            Some(token) => req.bearer_auth(token),
            None => req,
        };

        let resp = req.send().await?;
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!("API returned 401, clearing session");
            self.session.lock().await.clear()?;
            return Err(Error::Unauthorized);
        }

        let body: Value = if status.is_success() {
            resp.json().await?
        } else {
            // error bodies are not always JSON
            let text = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| envelope_message(&v))
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        };

        if body.get("success").and_then(Value::as_bool) == Some(false) {
            return Err(Error::Api {
                status: status.as_u16(),
                message: envelope_message(&body).unwrap_or_else(|| "Request failed".to_string()),
            });
        }

        Ok(body)
    }

    async fn get(&self, path: &str) -> Result<Value> {
        self.send(self.request(Method::GET, path)).await
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    // -- Authentication --

    /// Register a new account and store the returned session
    pub async fn register(&self, form: &RegisterRequest) -> Result<User> {
        form.validate()?;
        let body = self.post("/register_working.php", form).await?;
        self.store_auth_response(body).await
    }

    /// Log in and store the returned session
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let credentials = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let body = self.post("/login_working.php", &credentials).await?;
        self.store_auth_response(body).await
    }

    /// Forget the stored session
    pub async fn logout(&self) -> Result<()> {
        self.session.lock().await.clear()
    }

    async fn store_auth_response(&self, body: Value) -> Result<User> {
        let token = body
            .get("token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Api {
                status: 200,
                message: "Token missing from response".to_string(),
            })?
            .to_string();
        let user: User = serde_json::from_value(body.get("user").cloned().unwrap_or(Value::Null))?;

        info!("Signed in as {} ({})", user.name, user.id);
        self.session.lock().await.store_auth_data(token, user.clone())?;
        Ok(user)
    }

    // -- Users --

    /// All users
    pub async fn users(&self) -> Result<Value> {
        self.get("/users_working.php").await
    }

    /// A single user
    pub async fn user(&self, user_id: &str) -> Result<Value> {
        self.send(self.request(Method::GET, "/users_working.php").query(&[("id", user_id)]))
            .await
    }

    /// Update the signed-in user's profile and refresh the cached record
    pub async fn update_user(&self, user: &User) -> Result<Value> {
        let body = self.put("/users_working.php", user).await?;
        self.session.lock().await.update_user(user.clone())?;
        Ok(body)
    }

    // -- Posts --

    /// Feed posts
    pub async fn posts(&self) -> Result<Value> {
        self.get("/posts_working.php").await
    }

    /// Publish a post
    pub async fn create_post(&self, post: &NewPost) -> Result<Value> {
        self.post("/posts_working.php", post).await
    }

    /// Edit a post; `changes` is merged with the post id
    pub async fn update_post(&self, post_id: &str, changes: Value) -> Result<Value> {
        let mut body = match changes {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        body.insert("id".to_string(), Value::String(post_id.to_string()));
        self.put("/posts_working.php", &body).await
    }

    /// Delete a post
    pub async fn delete_post(&self, post_id: &str) -> Result<Value> {
        self.send(self.request(Method::DELETE, "/posts_working.php").query(&[("id", post_id)]))
            .await
    }

    // -- Connections --

    /// Connections and pending requests
    pub async fn connections(&self) -> Result<Value> {
        self.get("/connections_working.php").await
    }

    /// Ask another user to connect
    pub async fn send_connection_request(&self, target_user_id: &str) -> Result<Value> {
        self.post(
            "/connections_working.php",
            &serde_json::json!({ "target_user_id": target_user_id }),
        )
        .await
    }

    /// Accept or reject a pending connection
    pub async fn respond_to_connection(&self, connection_id: &str, status: ConnectionResponse) -> Result<Value> {
        self.put(
            "/connections_working.php",
            &serde_json::json!({ "id": connection_id, "status": status }),
        )
        .await
    }

    // -- Messages --

    /// Every direct message involving the signed-in user
    ///
    /// Records that fail to decode are dropped with a warning rather than
    /// failing the whole list.
    pub async fn messages(&self) -> Result<Vec<Message>> {
        let body = self.get("/messages_working.php").await?;
        let records = body
            .get("messages")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let total = records.len();
        let messages: Vec<Message> = records
            .into_iter()
            .filter_map(|record| match serde_json::from_value::<Message>(record) {
                Ok(message) => Some(message),
                Err(e) => {
                    warn!("Dropping malformed message record: {}", e);
                    None
                }
            })
            .collect();

        debug!("Fetched {} messages ({} dropped)", messages.len(), total - messages.len());
        Ok(messages)
    }

    /// Send a direct message; the content is trimmed and must not be empty
    pub async fn send_message(&self, receiver_id: &str, content: &str) -> Result<Value> {
        let content = content.trim();
        if content.is_empty() {
            return Err(Error::Validation("Please enter a message".into()));
        }
        self.post(
            "/messages_working.php",
            &SendMessageRequest { receiver_id, content },
        )
        .await
    }

    // -- Jobs --

    /// Job listings
    pub async fn jobs(&self) -> Result<Value> {
        self.get("/jobs_working.php").await
    }

    /// Create a job listing
    pub async fn create_job(&self, job: &NewJob) -> Result<Value> {
        job.validate()?;
        self.post("/jobs_working.php", job).await
    }

    /// Apply to a job
    pub async fn apply_to_job(&self, job_id: &str) -> Result<Value> {
        self.post(
            "/jobs_working.php",
            &serde_json::json!({ "job_id": job_id, "action": "apply" }),
        )
        .await
    }

    // -- Events --

    /// Upcoming events
    pub async fn events(&self) -> Result<Value> {
        self.get("/events_working.php").await
    }

    /// Create an event
    pub async fn create_event(&self, event: &NewEvent) -> Result<Value> {
        self.post("/events_working.php", event).await
    }

    /// Join an event
    pub async fn join_event(&self, event_id: &str) -> Result<Value> {
        self.post(
            "/events_working.php",
            &serde_json::json!({ "event_id": event_id, "action": "join" }),
        )
        .await
    }

    // -- Notifications --

    /// Notifications for the signed-in user
    pub async fn notifications(&self) -> Result<Value> {
        self.get("/notifications_working.php").await
    }

    /// Mark a notification as read
    pub async fn mark_notification_read(&self, notification_id: &str) -> Result<Value> {
        self.put(
            "/notifications_working.php",
            &serde_json::json!({ "id": notification_id, "is_read": true }),
        )
        .await
    }
}

fn envelope_message(body: &Value) -> Option<String> {
    body.get("message")
        .or_else(|| body.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
