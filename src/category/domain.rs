//! Core category domain types and the request/response shapes of the API.

use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize};

use crate::category::validation::{Rule, ValidationError};

/// Database identifier for a category.
pub type CategoryId = i64;

/// A validated, trimmed, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name that is at most `max_length` characters long
    /// after trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns a [ValidationError] for the `name` field with [Rule::Required]
    /// if `name` is empty or only whitespace, or [Rule::MaxLength] if it is
    /// too long.
    pub fn new(name: &str, max_length: usize) -> Result<Self, ValidationError> {
        let name = name.trim();

        if name.is_empty() {
            return Err(ValidationError {
                field: "name",
                rule: Rule::Required,
            });
        }

        if name.chars().count() > max_length {
            return Err(ValidationError {
                field: "name",
                rule: Rule::MaxLength(max_length),
            });
        }

        Ok(Self(name.to_string()))
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A category as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category {
    /// Assigned by the database on insert and never changed afterwards.
    pub id: CategoryId,
    /// The validated name.
    pub name: CategoryName,
}

/// JSON body for creating a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCreateRequest {
    /// The unvalidated name. Missing or `null` decodes as an empty string.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
}

/// Input for updating a category. `id` comes from the URL path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryUpdateRequest {
    /// The ID of the category to rename.
    pub id: CategoryId,
    /// The unvalidated new name.
    pub name: String,
}

/// JSON body for updating a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryUpdateBody {
    /// The unvalidated new name. Missing or `null` decodes as an empty string.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
}

/// A category as returned to API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResponse {
    /// The category's ID.
    pub id: CategoryId,
    /// The category's name.
    pub name: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name.to_string(),
        }
    }
}

/// Decode `null` as an empty string so the validation policy reports it.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
