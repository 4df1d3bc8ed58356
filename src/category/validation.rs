//! Field constraints checked before a request reaches the database.

use std::fmt::Display;

use serde::{Serialize, Serializer, ser::SerializeStruct};

use crate::category::{CategoryCreateRequest, CategoryId, CategoryName, CategoryUpdateRequest};

/// The default maximum number of characters in a category name.
pub const DEFAULT_MAX_NAME_LENGTH: usize = 200;

/// A constraint that a request field must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// The field must be present and non-empty.
    Required,
    /// The field must have at most this many characters.
    MaxLength(usize),
    /// The field must be an integer.
    Integer,
    /// The field must be an integer greater than zero.
    Positive,
}

impl Rule {
    fn tag(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::MaxLength(_) => "max_length",
            Rule::Integer => "integer",
            Rule::Positive => "positive",
        }
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::Required => write!(f, "is required"),
            Rule::MaxLength(max) => write!(f, "must be at most {max} characters long"),
            Rule::Integer => write!(f, "must be an integer"),
            Rule::Positive => write!(f, "must be a positive integer"),
        }
    }
}

/// The first constraint a request violated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} {rule}")]
pub struct ValidationError {
    /// The name of the offending field, as it appears in the request.
    pub field: &'static str,
    /// The rule the field broke.
    pub rule: Rule,
}

impl ValidationError {
    /// The error for an ID path segment that is not an integer.
    pub fn malformed_id() -> Self {
        Self {
            field: "id",
            rule: Rule::Integer,
        }
    }
}

impl Serialize for ValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationError", 3)?;
        state.serialize_field("field", self.field)?;
        state.serialize_field("rule", self.rule.tag())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// The constraints on category requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// The maximum number of characters in a category name.
    pub max_name_length: usize,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
        }
    }
}

impl ValidationPolicy {
    /// Check a create request and return the validated name.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate_create(
        &self,
        request: &CategoryCreateRequest,
    ) -> Result<CategoryName, ValidationError> {
        CategoryName::new(&request.name, self.max_name_length)
    }

    /// Check an update request and return the validated ID and name.
    ///
    /// The ID is checked before the name.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate_update(
        &self,
        request: &CategoryUpdateRequest,
    ) -> Result<(CategoryId, CategoryName), ValidationError> {
        if request.id <= 0 {
            return Err(ValidationError {
                field: "id",
                rule: Rule::Positive,
            });
        }

        let name = CategoryName::new(&request.name, self.max_name_length)?;

        Ok((request.id, name))
    }
}
