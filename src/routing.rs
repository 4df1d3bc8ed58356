//! Application router configuration.

use std::time::Duration;

use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::timeout::TimeoutLayer;

use crate::{
    AppState,
    api_key::api_key_guard,
    category::{
        create_category_endpoint, delete_category_endpoint, get_category_endpoint,
        list_categories_endpoint, update_category_endpoint,
    },
    endpoints,
    logging::logging_middleware,
    web_response::WebResponse,
};

/// Return a router with all the app's routes.
///
/// Requests pass through the layers in this order: request logging, the
/// request timeout, the API key check and then the route handler. The API key
/// check rejects a request before it reaches any handler, including the
/// fallbacks.
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route(
            endpoints::CATEGORIES,
            get(list_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            get(get_category_endpoint)
                .put(update_category_endpoint)
                .delete(delete_category_endpoint),
        )
        .fallback(get_404_not_found)
        .method_not_allowed_fallback(get_405_method_not_allowed)
        .layer(middleware::from_fn_with_state(state.clone(), api_key_guard))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    WebResponse::with_data(StatusCode::NOT_FOUND, "no route matches the request").into_response()
}

async fn get_405_method_not_allowed() -> Response {
    WebResponse::empty(StatusCode::METHOD_NOT_ALLOWED).into_response()
}
