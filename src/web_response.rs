//! The JSON envelope shared by every API response.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// The body of every response, e.g. `{"code": 200, "status": "OK", "data": {...}}`.
///
/// `data` is omitted from the JSON when there is nothing to return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebResponse<T> {
    /// The HTTP status code, repeated in the body.
    pub code: u16,
    /// The upper case reason phrase for `code`, e.g. "NOT FOUND".
    pub status: String,
    /// The payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> WebResponse<T> {
    /// A 200 OK response carrying `data`.
    pub fn ok(data: T) -> Self {
        Self::with_data(StatusCode::OK, data)
    }

    /// A response with the given status carrying `data`.
    pub fn with_data(status_code: StatusCode, data: T) -> Self {
        Self {
            code: status_code.as_u16(),
            status: status_text(status_code),
            data: Some(data),
        }
    }
}

impl WebResponse<()> {
    /// A response with the given status and no data.
    pub fn empty(status_code: StatusCode) -> Self {
        Self {
            code: status_code.as_u16(),
            status: status_text(status_code),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for WebResponse<T> {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status_code, Json(self)).into_response()
    }
}

fn status_text(status_code: StatusCode) -> String {
    status_code
        .canonical_reason()
        .unwrap_or("UNKNOWN")
        .to_uppercase()
}
