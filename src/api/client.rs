use async_trait::async_trait;
use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ListParams, User, UserDraft};
use crate::config::ApiConfig;

/// Remote users resource.
///
/// Each call is a single request/response round trip. There is no retry:
/// the first failure is returned to the caller as is.
#[async_trait]
pub trait UsersApi: Send + Sync {
    /// One page of users, filtered and sorted server-side where supported.
    async fn list_users(&self, params: &ListParams) -> Result<Vec<User>, ApiError>;

    /// Every user, unpaged.
    async fn list_all_users(&self) -> Result<Vec<User>, ApiError>;

    async fn get_user(&self, id: u64) -> Result<User, ApiError>;

    /// Create a user and return it with the server-assigned id.
    async fn create_user(&self, draft: &UserDraft) -> Result<User, ApiError>;

    async fn update_user(&self, id: u64, draft: &UserDraft) -> Result<(), ApiError>;

    async fn delete_user(&self, id: u64) -> Result<(), ApiError>;
}

/// Minimal shape of a create acknowledgement.
#[derive(Deserialize)]
struct Created {
    id: u64,
}

/// reqwest-backed client for the json-server style users API.
pub struct HttpUsersClient {
    client: Client,
    base_url: String,
}

impl HttpUsersClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder().connect_timeout(config.connect_timeout());
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ApiError::Client)?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        // Fail early on a base URL that can never work.
        Url::parse(&base_url).map_err(|e| ApiError::InvalidUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse(&raw).map_err(|e| ApiError::InvalidUrl {
            url: raw,
            reason: e.to_string(),
        })
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        operation: &'static str,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<Response, ApiError> {
        tracing::debug!(operation, method = %method, url = %url, "Sending request");

        let mut builder = self.client.request(method, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|source| {
            tracing::warn!(operation, error = %source, "Request failed");
            ApiError::Network { operation, source }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .ok()
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string());
            tracing::warn!(operation, status = status.as_u16(), "Upstream returned error status");
            return Err(ApiError::HttpStatus {
                operation,
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(
        operation: &'static str,
        response: Response,
    ) -> Result<T, ApiError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|source| ApiError::Network { operation, source })?;
        serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode { operation, source })
    }
}

#[async_trait]
impl UsersApi for HttpUsersClient {
    async fn list_users(&self, params: &ListParams) -> Result<Vec<User>, ApiError> {
        let mut url = self.url("/users")?;
        {
            let mut query = url.query_pairs_mut();
            for (name, value) in params.query_pairs() {
                query.append_pair(name, &value);
            }
        }
        let response = self
            .send::<()>("list_users", Method::GET, url, None)
            .await?;
        Self::decode("list_users", response).await
    }

    async fn list_all_users(&self) -> Result<Vec<User>, ApiError> {
        let url = self.url("/users")?;
        let response = self
            .send::<()>("list_all_users", Method::GET, url, None)
            .await?;
        Self::decode("list_all_users", response).await
    }

    async fn get_user(&self, id: u64) -> Result<User, ApiError> {
        let url = self.url(&format!("/users/{id}"))?;
        let response = self.send::<()>("get_user", Method::GET, url, None).await?;
        Self::decode("get_user", response).await
    }

    async fn create_user(&self, draft: &UserDraft) -> Result<User, ApiError> {
        let url = self.url("/users")?;
        let response = self
            .send("create_user", Method::POST, url, Some(draft))
            .await?;
        let created: Created = Self::decode("create_user", response).await?;
        Ok(User::from_draft(created.id, draft))
    }

    async fn update_user(&self, id: u64, draft: &UserDraft) -> Result<(), ApiError> {
        let url = self.url(&format!("/users/{id}"))?;
        self.send("update_user", Method::PUT, url, Some(draft))
            .await?;
        Ok(())
    }

    async fn delete_user(&self, id: u64) -> Result<(), ApiError> {
        let url = self.url(&format!("/users/{id}"))?;
        self.send::<()>("delete_user", Method::DELETE, url, None)
            .await?;
        Ok(())
    }
}
