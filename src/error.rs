//! Defines the app level error type and its conversion to JSON error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{category::ValidationError, web_response::WebResponse};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request violated one of the declared field constraints.
    ///
    /// Validation happens before any database access, so no transaction has
    /// been opened when this error is returned.
    #[error("validation failed: {0}")]
    Validation(ValidationError),

    /// The request body could not be decoded as the expected JSON shape.
    #[error("could not parse the request body: {0}")]
    InvalidRequestBody(String),

    /// The requested resource was not found.
    ///
    /// The ID was well formed but did not match any row. Only the service
    /// layer raises this error, after an explicit existence check.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    ///
    /// The inner error should only be logged for debugging on the server.
    /// Clients receive a general internal server error instead.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        Error::SqlError(value)
    }
}

impl From<ValidationError> for Error {
    fn from(value: ValidationError) -> Self {
        Error::Validation(value)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation(validation_error) => {
                WebResponse::with_data(StatusCode::BAD_REQUEST, validation_error).into_response()
            }
            Error::InvalidRequestBody(message) => {
                WebResponse::with_data(StatusCode::BAD_REQUEST, message).into_response()
            }
            Error::NotFound => {
                WebResponse::with_data(StatusCode::NOT_FOUND, Error::NotFound.to_string())
                    .into_response()
            }
            // Storage details are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                WebResponse::with_data(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred, check the server logs for more details.",
                )
                .into_response()
            }
        }
    }
}
