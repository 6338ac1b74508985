use async_trait::async_trait;
use roster_types::{UserPayload, UserRecord};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{method} {path} returned {status}: {body}")]
    Status {
        method: String,
        path: String,
        status: u16,
        body: String,
    },
    #[error("Invalid response from {path}: {message}")]
    Decode { path: String, message: String },
    #[error("Cannot build request URL: {0}")]
    Url(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// The remote user-record service.
///
/// Mutation responses have no fixed shape, so they come back as raw JSON
/// (or a JSON string when the body isn't JSON).
#[async_trait]
pub trait UserApi: Send + Sync {
    async fn list_users(&self) -> Result<Vec<UserRecord>, ApiError>;

    async fn add_user(&self, user: &UserPayload) -> Result<Value, ApiError>;

    async fn update_user(&self, id: &str, user: &UserPayload) -> Result<Value, ApiError>;

    async fn delete_user(&self, id: &str) -> Result<Value, ApiError>;
}
