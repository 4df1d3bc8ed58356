//! Category management: validation, storage and the JSON API.

mod db;
mod domain;
mod endpoints;
mod service;
mod validation;

pub use db::{CategoryRepository, SQLiteCategoryRepository, create_category_table};
pub use domain::{
    Category, CategoryCreateRequest, CategoryId, CategoryName, CategoryResponse,
    CategoryUpdateBody, CategoryUpdateRequest,
};
pub use endpoints::{
    SQLiteCategoryService, create_category_endpoint, delete_category_endpoint,
    get_category_endpoint, list_categories_endpoint, update_category_endpoint,
};
pub use service::CategoryService;
pub use validation::{DEFAULT_MAX_NAME_LENGTH, Rule, ValidationError, ValidationPolicy};
