//! Schema validation error types.
//!
//! Raised when a flow input or output does not match the shape declared by its
//! schema. The error always names the offending field using its JSON path
//! (camelCase, dot-separated for nested objects, `[n]` for array items).

/// Specific schema validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum SchemaErrorKind {
    /// A required field is absent or null
    #[display("is required")]
    MissingField,
    /// The field holds a value of the wrong primitive type
    #[display("expected {}, found {}", expected, found)]
    WrongType {
        /// Expected JSON type or shape
        expected: String,
        /// JSON type actually found
        found: String,
    },
    /// The value is not a member of a closed enumeration
    #[display("value '{}' is not one of [{}]", value, allowed)]
    UnknownVariant {
        /// Value that was supplied
        value: String,
        /// Comma-separated list of allowed members
        allowed: String,
    },
    /// A required text field is empty or whitespace
    #[display("must not be empty")]
    Empty,
    /// Any other rule violation
    #[display("is invalid: {}", _0)]
    Invalid(String),
}

/// Schema validation error naming the offending field.
///
/// # Examples
///
/// ```
/// use estudio_error::{SchemaErrorKind, SchemaValidationError};
///
/// let err = SchemaValidationError::new("mainMessage", SchemaErrorKind::Empty);
/// assert_eq!(err.field, "mainMessage");
/// assert!(format!("{}", err).contains("must not be empty"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Schema Validation Error: field '{}' {} at line {} in {}", field, kind, line, file)]
pub struct SchemaValidationError {
    /// JSON path of the offending field
    pub field: String,
    /// What went wrong
    pub kind: SchemaErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl SchemaValidationError {
    /// Create a new schema validation error with automatic location tracking.
    #[track_caller]
    pub fn new(field: impl Into<String>, kind: SchemaErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            field: field.into(),
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
