//! Reqwest-backed identity verification adapter.
//!
//! This adapter owns transport details only: it POSTs the bearer credential
//! to the identity provider's verification endpoint and decodes the verified
//! identity. The domain never sees HTTP.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::domain::UserId;
use crate::domain::ports::{Identity, IdentityError, IdentityVerifier};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Verified-identity payload returned by the provider.
#[derive(Debug, Deserialize)]
struct VerifiedIdentityDto {
    user_id: String,
    phone_number: String,
}

/// Identity verifier calling an external token-verification endpoint.
pub struct HttpIdentityVerifier {
    client: Client,
    endpoint: Url,
}

impl HttpIdentityVerifier {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(DEFAULT_REQUEST_TIMEOUT).build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl IdentityVerifier for HttpIdentityVerifier {
    async fn verify(&self, bearer_token: &str) -> Result<Identity, IdentityError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(bearer_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| IdentityError::unavailable(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(IdentityError::rejected(format!(
                "provider answered {status}"
            )));
        }
        if !status.is_success() {
            return Err(IdentityError::unavailable(format!(
                "provider answered {status}"
            )));
        }

        let dto: VerifiedIdentityDto = response
            .json()
            .await
            .map_err(|err| IdentityError::unavailable(err.to_string()))?;
        let user_id =
            UserId::new(dto.user_id).map_err(|err| IdentityError::rejected(err.to_string()))?;

        Ok(Identity {
            user_id,
            phone_number: dto.phone_number,
        })
    }
}
