//! HTTP handlers for the category API.
//!
//! Each handler decodes the request, calls exactly one [CategoryService]
//! method and wraps the result in a [WebResponse].

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};

use crate::{
    Error,
    category::{
        CategoryCreateRequest, CategoryId, CategoryResponse, CategoryService,
        CategoryUpdateBody, CategoryUpdateRequest, SQLiteCategoryRepository, ValidationError,
    },
    web_response::WebResponse,
};

/// The category service backed by SQLite, as held in the app state.
pub type SQLiteCategoryService = CategoryService<SQLiteCategoryRepository>;

/// Handle `POST /api/categories`.
pub async fn create_category_endpoint(
    State(service): State<SQLiteCategoryService>,
    body: Result<Json<CategoryCreateRequest>, JsonRejection>,
) -> Result<WebResponse<CategoryResponse>, Error> {
    let Json(request) = body.map_err(json_rejection_to_error)?;

    service.create(request).map(WebResponse::ok)
}

/// Handle `GET /api/categories`.
pub async fn list_categories_endpoint(
    State(service): State<SQLiteCategoryService>,
) -> Result<WebResponse<Vec<CategoryResponse>>, Error> {
    service.find_all().map(WebResponse::ok)
}

/// Handle `GET /api/categories/{category_id}`.
pub async fn get_category_endpoint(
    State(service): State<SQLiteCategoryService>,
    category_id: Result<Path<CategoryId>, PathRejection>,
) -> Result<WebResponse<CategoryResponse>, Error> {
    let category_id = parse_category_id(category_id)?;

    service.find_by_id(category_id).map(WebResponse::ok)
}

/// Handle `PUT /api/categories/{category_id}`.
pub async fn update_category_endpoint(
    State(service): State<SQLiteCategoryService>,
    category_id: Result<Path<CategoryId>, PathRejection>,
    body: Result<Json<CategoryUpdateBody>, JsonRejection>,
) -> Result<WebResponse<CategoryResponse>, Error> {
    let id = parse_category_id(category_id)?;
    let Json(CategoryUpdateBody { name }) = body.map_err(json_rejection_to_error)?;

    service
        .update(CategoryUpdateRequest { id, name })
        .map(WebResponse::ok)
}

/// Handle `DELETE /api/categories/{category_id}`.
pub async fn delete_category_endpoint(
    State(service): State<SQLiteCategoryService>,
    category_id: Result<Path<CategoryId>, PathRejection>,
) -> Result<WebResponse<()>, Error> {
    let category_id = parse_category_id(category_id)?;

    service.delete(category_id)?;

    Ok(WebResponse::empty(StatusCode::OK))
}

fn parse_category_id(
    category_id: Result<Path<CategoryId>, PathRejection>,
) -> Result<CategoryId, Error> {
    match category_id {
        Ok(Path(category_id)) => Ok(category_id),
        Err(rejection) => {
            tracing::debug!("could not parse category ID: {rejection}");
            Err(Error::Validation(ValidationError::malformed_id()))
        }
    }
}

fn json_rejection_to_error(rejection: JsonRejection) -> Error {
    Error::InvalidRequestBody(rejection.body_text())
}
