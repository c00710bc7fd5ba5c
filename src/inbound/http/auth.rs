//! Bearer credential extraction and verification.
//!
//! Handlers receive a [`BearerToken`] extracted from the `Authorization`
//! header and exchange it for a verified [`Identity`] through the identity
//! port. No session state is kept; every request re-derives the caller.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header};
use futures_util::future::{Ready, ready};

use crate::domain::Error;
use crate::domain::ports::Identity;

use super::state::HttpState;

/// Raw bearer credential taken from the `Authorization` header.
#[derive(Debug, Clone)]
pub struct BearerToken(String);

impl BearerToken {
    /// Borrow the raw credential.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

fn extract_bearer(req: &HttpRequest) -> Result<BearerToken, Error> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("Token is missing."))?;
    let raw = header_value
        .to_str()
        .map_err(|_| Error::unauthorized("Token is missing."))?;
    let token = raw
        .strip_prefix("Bearer ")
        .ok_or_else(|| Error::unauthorized("Token is missing."))?;
    if token.is_empty() {
        return Err(Error::unauthorized("Token is missing."));
    }
    Ok(BearerToken(token.to_owned()))
}

impl FromRequest for BearerToken {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_bearer(req))
    }
}

/// Verify the credential against the identity provider.
pub async fn authenticate(state: &HttpState, token: &BearerToken) -> Result<Identity, Error> {
    state
        .identity
        .verify(token.as_str())
        .await
        .map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    #[rstest]
    fn extracts_bearer_credentials() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer test_token"))
            .to_http_request();
        let token = extract_bearer(&req).expect("token extracted");
        assert_eq!(token.as_str(), "test_token");
    }

    #[rstest]
    fn missing_header_is_unauthorized() {
        let req = TestRequest::default().to_http_request();
        let error = extract_bearer(&req).expect_err("missing header rejected");
        assert_eq!(error.message(), "Token is missing.");
    }

    #[rstest]
    #[case("test_token")]
    #[case("Basic dXNlcjpwYXNz")]
    #[case("Bearer ")]
    fn malformed_headers_are_unauthorized(#[case] value: &str) {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, value))
            .to_http_request();
        assert!(extract_bearer(&req).is_err());
    }
}
