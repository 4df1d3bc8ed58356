//! Middleware that only lets requests with the configured API key through.

use std::fmt::Debug;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use sha2::{Digest, Sha512};

use crate::web_response::WebResponse;

/// The request header that must carry the API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// A SHA-512 digest of the API key.
///
/// Only the digest is kept in memory so the key itself never ends up in logs
/// or debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKeyDigest(Vec<u8>);

impl ApiKeyDigest {
    /// Hash `api_key`.
    pub fn new(api_key: &str) -> Self {
        Self::from_bytes(api_key.as_bytes())
    }

    fn from_bytes(api_key: &[u8]) -> Self {
        Self(Sha512::digest(api_key).to_vec())
    }

    /// Whether `candidate` hashes to this digest.
    pub fn matches(&self, candidate: &[u8]) -> bool {
        Self::from_bytes(candidate) == *self
    }
}

impl Debug for ApiKeyDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKeyDigest(********)")
    }
}

/// The state needed for the API key middleware.
#[derive(Debug, Clone)]
pub struct ApiKeyState {
    /// The digest of the expected API key.
    pub api_key: ApiKeyDigest,
}

/// Middleware function that checks the `X-API-Key` header.
///
/// The request is executed normally if the header matches the configured key,
/// otherwise a 401 response is returned and the request goes no further.
pub async fn api_key_guard(
    State(state): State<ApiKeyState>,
    request: Request,
    next: Next,
) -> Response {
    let is_authorized = request
        .headers()
        .get(API_KEY_HEADER)
        .is_some_and(|value| state.api_key.matches(value.as_bytes()));

    if !is_authorized {
        tracing::warn!(
            "Rejected {} {}: missing or invalid API key",
            request.method(),
            request.uri()
        );
        return WebResponse::empty(StatusCode::UNAUTHORIZED).into_response();
    }

    next.run(request).await
}
