//! The JSON-over-HTTP backend client.
//!
//! Every interaction with the PhotoFlex backend goes through this one
//! generic request helper plus thin typed wrappers per endpoint. The
//! backend owns all business logic, persistence, and authorization; this
//! client only transports JSON.

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::error;
use url::Url;

use crate::models::{
    Board, Comment, Like, NewBoard, NewComment, NewLike, NewPin, NewUser, Pin, PinId, User,
    UserId,
};

/// Timeout applied to every backend request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors surfaced by the backend client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The backend answered with a non-success status. `message` is the
    /// best human-readable explanation extractable from the error body.
    #[error("{message}")]
    Http { status: StatusCode, message: String },
    /// The request never completed (connection refused, timeout, ...).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The response body was not the JSON we expected.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    /// The configured base URL is not a valid URL.
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

/// Extracts the most useful error message from a non-success response body.
///
/// Preference order: a JSON `message` field, then a JSON `error` field,
/// then a generic hint for HTML error pages, then a short plain-text body
/// verbatim, and finally the bare status code.
fn extract_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
                if !msg.is_empty() {
                    return msg.to_string();
                }
            }
        }
    }
    if body.contains("<!DOCTYPE") || body.contains("<html") {
        return format!("Server Error: {} - Check backend logs", status.as_u16());
    }
    if !body.is_empty() && body.len() < 200 {
        return body.to_string();
    }
    format!("HTTP error! status: {}", status.as_u16())
}

/// A handle to the PhotoFlex backend. Cheap to clone.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
}

impl ApiClient {
    /// Creates a client for the backend at `base_url`
    /// (e.g. `http://localhost:8080/api`).
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        // A trailing slash makes Url::join discard the last path segment.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)?;
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The generic request helper all typed endpoints funnel through.
    ///
    /// Success bodies are read as text and deserialized, so that a `204`
    /// or an empty body can map to `T = Option<...>`-style defaults via
    /// [`Self::request_no_content`] instead of a decode failure here.
    async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let url = self.base_url.join(endpoint.trim_start_matches('/'))?;
        let mut builder = self.http.request(method, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = extract_error_message(status, &text);
            error!("Request to {endpoint} failed: {status} {message}");
            return Err(ApiError::Http { status, message });
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Like [`Self::request`], but for endpoints whose success response
    /// carries no body (`204 No Content` or an empty `200`).
    async fn request_no_content<B: Serialize>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<(), ApiError> {
        let url = self.base_url.join(endpoint.trim_start_matches('/'))?;
        let mut builder = self.http.request(method, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            let message = extract_error_message(status, &text);
            error!("Request to {endpoint} failed: {status} {message}");
            return Err(ApiError::Http { status, message });
        }
        Ok(())
    }

    /// Fetches the full user roster, ordered as the backend returns it.
    pub async fn fetch_users(&self) -> Result<Vec<User>, ApiError> {
        self.request(Method::GET, "users", None::<&()>).await
    }

    /// Creates a new user account (signup).
    pub async fn create_user(&self, new_user: &NewUser) -> Result<User, ApiError> {
        self.request(Method::POST, "users", Some(new_user)).await
    }

    /// Updates the given user's profile fields.
    pub async fn update_user(&self, user_id: UserId, user: &User) -> Result<User, ApiError> {
        self.request(Method::PUT, &format!("users/{user_id}"), Some(user)).await
    }

    pub async fn fetch_pins(&self) -> Result<Vec<Pin>, ApiError> {
        self.request(Method::GET, "pins", None::<&()>).await
    }

    pub async fn fetch_pin(&self, pin_id: PinId) -> Result<Pin, ApiError> {
        self.request(Method::GET, &format!("pins/{pin_id}"), None::<&()>).await
    }

    pub async fn fetch_pins_for_user(&self, user_id: UserId) -> Result<Vec<Pin>, ApiError> {
        self.request(Method::GET, &format!("pins/user/{user_id}"), None::<&()>).await
    }

    pub async fn fetch_pins_for_board(&self, board_id: u64) -> Result<Vec<Pin>, ApiError> {
        self.request(Method::GET, &format!("pins/board/{board_id}"), None::<&()>).await
    }

    pub async fn create_pin(&self, new_pin: &NewPin) -> Result<Pin, ApiError> {
        self.request(Method::POST, "pins", Some(new_pin)).await
    }

    pub async fn fetch_boards_for_user(&self, user_id: UserId) -> Result<Vec<Board>, ApiError> {
        self.request(Method::GET, &format!("boards/user/{user_id}"), None::<&()>).await
    }

    pub async fn create_board(&self, new_board: &NewBoard) -> Result<Board, ApiError> {
        self.request(Method::POST, "boards", Some(new_board)).await
    }

    /// Fetches all comments on a pin, oldest first.
    pub async fn fetch_comments_for_pin(&self, pin_id: PinId) -> Result<Vec<Comment>, ApiError> {
        self.request(Method::GET, &format!("comments/pin/{pin_id}"), None::<&()>).await
    }

    /// Posts a new comment on a pin.
    pub async fn create_comment(&self, new_comment: &NewComment) -> Result<Comment, ApiError> {
        self.request(Method::POST, "comments", Some(new_comment)).await
    }

    pub async fn like_pin(&self, new_like: &NewLike) -> Result<Like, ApiError> {
        self.request(Method::POST, "likes", Some(new_like)).await
    }

    pub async fn unlike_pin(&self, pin_id: PinId, user_id: UserId) -> Result<(), ApiError> {
        self.request_no_content(
            Method::DELETE,
            &format!("likes/pin/{pin_id}/user/{user_id}"),
            None::<&()>,
        )
        .await
    }

    pub async fn fetch_like_count(&self, pin_id: PinId) -> Result<u64, ApiError> {
        self.request(Method::GET, &format!("likes/pin/{pin_id}/count"), None::<&()>).await
    }
}
