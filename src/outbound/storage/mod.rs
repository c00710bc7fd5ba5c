//! Reqwest-backed object storage adapter.
//!
//! Talks to an S3-compatible gateway that signs time-limited URLs and accepts
//! object deletions. The backend stores only object keys; the gateway owns
//! credentials and signing.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{ObjectStore, ObjectStoreError};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct PresignRequestDto<'a> {
    bucket: &'a str,
    key: &'a str,
    method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_type: Option<&'a str>,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct PresignResponseDto {
    url: String,
}

/// Object store adapter backed by a signing gateway.
pub struct GatewayObjectStore {
    client: Client,
    endpoint: Url,
    bucket: String,
    bearer_token: Option<String>,
}

impl GatewayObjectStore {
    /// Build an adapter for the given gateway endpoint and bucket.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, bucket: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(DEFAULT_REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint,
            bucket: bucket.into(),
            bearer_token: None,
        })
    }

    /// Attach a bearer token sent on every gateway request.
    pub fn with_bearer_token(mut self, token: Option<String>) -> Self {
        self.bearer_token = token.filter(|value| !value.is_empty());
        self
    }

    fn gateway_url(&self, path: &str) -> Result<Url, ObjectStoreError> {
        self.endpoint
            .join(path)
            .map_err(|err| ObjectStoreError::transport(err.to_string()))
    }

    fn authorise(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.bearer_token.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn presign(
        &self,
        key: &str,
        method: &str,
        content_type: Option<&str>,
        ttl: Duration,
    ) -> Result<String, ObjectStoreError> {
        let url = self.gateway_url("presign")?;
        let body = PresignRequestDto {
            bucket: self.bucket.as_str(),
            key,
            method,
            content_type,
            expires_in: ttl.as_secs(),
        };

        let response = self
            .authorise(self.client.post(url))
            .json(&body)
            .send()
            .await
            .map_err(|err| ObjectStoreError::transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ObjectStoreError::rejected(format!(
                "gateway answered {status}"
            )));
        }

        let dto: PresignResponseDto = response
            .json()
            .await
            .map_err(|err| ObjectStoreError::transport(err.to_string()))?;
        Ok(dto.url)
    }
}

#[async_trait]
impl ObjectStore for GatewayObjectStore {
    async fn issue_upload_url(
        &self,
        key: &str,
        content_type: &str,
        ttl: Duration,
    ) -> Result<String, ObjectStoreError> {
        self.presign(key, "put", Some(content_type), ttl).await
    }

    async fn issue_download_url(
        &self,
        key: &str,
        ttl: Duration,
    ) -> Result<String, ObjectStoreError> {
        self.presign(key, "get", None, ttl).await
    }

    async fn delete_object(&self, key: &str) -> Result<(), ObjectStoreError> {
        let path = format!(
            "{}/{}",
            self.bucket.trim_end_matches('/'),
            key.trim_start_matches('/')
        );
        let url = self.gateway_url(&path)?;

        let response = self
            .authorise(self.client.delete(url))
            .send()
            .await
            .map_err(|err| ObjectStoreError::transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ObjectStoreError::rejected(format!(
                "gateway answered {status}"
            )));
        }
        Ok(())
    }
}
