use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use roster_types::{ListUsersResult, UserPayload, UserRecord};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::api::{ApiError, UserApi};

/// `UserApi` over JSON/HTTP against a single base URL.
pub struct HttpUserApi {
    client: Client,
    base_url: Url,
}

impl HttpUserApi {
    pub fn new(base_url: Url) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, None)
    }

    pub fn with_timeout(base_url: Url, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Url(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        segments: &[&str],
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<Vec<u8>, ApiError> {
        let url = self.endpoint(segments)?;
        let path = url.path().to_string();
        let method_name = method.as_str().to_string();
        debug!("{} {}", method_name, url);

        let response = build(self.client.request(method, url)).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(ApiError::Status {
                method: method_name,
                path,
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        Ok(body.to_vec())
    }
}

fn parse_mutation_response(body: &[u8]) -> Value {
    if body.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

#[async_trait]
impl UserApi for HttpUserApi {
    async fn list_users(&self) -> Result<Vec<UserRecord>, ApiError> {
        let body = self.send(Method::GET, &["users"], |r| r).await?;
        let result: ListUsersResult =
            serde_json::from_slice(&body).map_err(|e| ApiError::Decode {
                path: "/users".to_string(),
                message: e.to_string(),
            })?;
        Ok(result.users)
    }

    async fn add_user(&self, user: &UserPayload) -> Result<Value, ApiError> {
        let body = self
            .send(Method::POST, &["user", "add"], |r| r.json(user))
            .await?;
        Ok(parse_mutation_response(&body))
    }

    async fn update_user(&self, id: &str, user: &UserPayload) -> Result<Value, ApiError> {
        let body = self
            .send(Method::PUT, &["user", "update", id], |r| r.json(user))
            .await?;
        Ok(parse_mutation_response(&body))
    }

    async fn delete_user(&self, id: &str) -> Result<Value, ApiError> {
        let body = self
            .send(Method::DELETE, &["user", "delete", id], |r| r)
            .await?;
        Ok(parse_mutation_response(&body))
    }
}
