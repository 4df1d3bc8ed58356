//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{
    api_key::{ApiKeyDigest, ApiKeyState},
    category::{SQLiteCategoryRepository, SQLiteCategoryService, ValidationPolicy},
    db::initialize,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The digest of the API key that clients must send in `X-API-Key`.
    pub api_key: ApiKeyDigest,

    /// The category use cases, sharing the database connection.
    pub category_service: SQLiteCategoryService,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        api_key: &str,
        validation_policy: ValidationPolicy,
    ) -> Result<Self, rusqlite::Error> {
        initialize(&db_connection)?;

        Ok(Self {
            api_key: ApiKeyDigest::new(api_key),
            category_service: SQLiteCategoryService::new(
                SQLiteCategoryRepository,
                Arc::new(Mutex::new(db_connection)),
                validation_policy,
            ),
        })
    }
}

impl FromRef<AppState> for SQLiteCategoryService {
    fn from_ref(state: &AppState) -> Self {
        state.category_service.clone()
    }
}

impl FromRef<AppState> for ApiKeyState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api_key: state.api_key.clone(),
        }
    }
}
