//! Validation error model.

use thiserror::Error;

/// Result type used by intent validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// A required input field of a product intent.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Price,
    Image,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Price => "price",
            Field::Image => "image",
        }
    }
}

impl core::fmt::Display for Field {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejection of a user intent before it becomes an action.
///
/// Validation failures are always recoverable: the intent simply does not
/// proceed and state is left untouched.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// A required field was absent or blank.
    #[error("missing required field: {0}")]
    MissingField(Field),

    /// The price was negative or not a finite number.
    #[error("invalid price: {0}")]
    InvalidPrice(f64),

    /// The catalog already holds `capacity` products.
    #[error("catalog is full (capacity {capacity})")]
    CatalogFull { capacity: usize },
}

impl ValidationError {
    pub fn missing(field: Field) -> Self {
        Self::MissingField(field)
    }

    pub fn catalog_full(capacity: usize) -> Self {
        Self::CatalogFull { capacity }
    }

    /// Message suitable for showing to the end user.
    pub fn user_message(&self) -> &'static str {
        match self {
            ValidationError::MissingField(_) => "Please fill out all fields",
            ValidationError::InvalidPrice(_) => "Please enter a valid price",
            ValidationError::CatalogFull { .. } => {
                "You have reached the maximum number of products"
            }
        }
    }
}
