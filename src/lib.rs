//! A JSON REST API for managing categories.
//!
//! Every write runs inside a single database transaction that is committed
//! when the operation succeeds and rolled back when it fails. Failures are
//! returned as typed [Error]s and rendered as a JSON envelope with a 400, 404
//! or 500 status code.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod api_key;
mod app_state;
mod category;
mod db;
mod endpoints;
mod error;
mod logging;
mod routing;
mod unit_of_work;
mod web_response;

pub use api_key::{API_KEY_HEADER, ApiKeyDigest};
pub use app_state::AppState;
pub use category::{
    Category, CategoryCreateRequest, CategoryId, CategoryName, CategoryRepository,
    CategoryResponse, CategoryService, CategoryUpdateRequest, DEFAULT_MAX_NAME_LENGTH, Rule,
    SQLiteCategoryRepository, ValidationError, ValidationPolicy,
};
pub use db::{DEFAULT_BUSY_TIMEOUT, initialize as initialize_db, open as open_db};
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use unit_of_work::in_transaction;
pub use web_response::WebResponse;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
