//! Top-level error wrapper types.

use crate::{
    BuilderError, ConfigError, ErrorCategory, FlowError, FlowErrorKind, GeminiError, JsonError,
    MediaError, SchemaValidationError, StorageError, TemplateError,
};

/// Every error the Estúdio crates can produce.
///
/// # Examples
///
/// ```
/// use estudio_error::{EstudioError, StorageError, StorageErrorKind};
///
/// let storage_err = StorageError::new(StorageErrorKind::NotFound("luna".to_string()));
/// let err: EstudioError = storage_err.into();
/// assert!(format!("{}", err).contains("luna"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum EstudioErrorKind {
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
    /// Flow input or output failed schema validation
    #[from(SchemaValidationError)]
    Schema(SchemaValidationError),
    /// Inline media reference could not be parsed
    #[from(MediaError)]
    Media(MediaError),
    /// Prompt template could not be rendered
    #[from(TemplateError)]
    Template(TemplateError),
    /// Remote model error
    #[from(GeminiError)]
    Gemini(GeminiError),
    /// Flow executor error
    #[from(FlowError)]
    Flow(FlowError),
    /// Gallery storage error
    #[from(StorageError)]
    Storage(StorageError),
}

impl EstudioErrorKind {
    /// Map this error onto its user-facing category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            EstudioErrorKind::Schema(_) | EstudioErrorKind::Media(_) => ErrorCategory::Validation,
            EstudioErrorKind::Gemini(_) => ErrorCategory::Remote,
            EstudioErrorKind::Storage(_) => ErrorCategory::Storage,
            EstudioErrorKind::Config(_) => ErrorCategory::Config,
            EstudioErrorKind::Json(_)
            | EstudioErrorKind::Builder(_)
            | EstudioErrorKind::Template(_) => ErrorCategory::Internal,
            EstudioErrorKind::Flow(err) => match err.kind {
                FlowErrorKind::Cancelled | FlowErrorKind::TimedOut { .. } => {
                    ErrorCategory::Cancelled
                }
                FlowErrorKind::NoJson { .. } | FlowErrorKind::InvalidOutput { .. } => {
                    ErrorCategory::Remote
                }
                FlowErrorKind::TaskPanicked(_) => ErrorCategory::Internal,
            },
        }
    }
}

/// Estúdio error with kind discrimination.
///
/// # Examples
///
/// ```
/// use estudio_error::{ConfigError, ErrorCategory, EstudioResult};
///
/// fn might_fail() -> EstudioResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert_eq!(err.category(), ErrorCategory::Config);
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Estúdio Error: {}", _0)]
pub struct EstudioError(Box<EstudioErrorKind>);

impl EstudioError {
    /// Create a new error from a kind.
    pub fn new(kind: EstudioErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &EstudioErrorKind {
        &self.0
    }

    /// Get the user-facing category.
    pub fn category(&self) -> ErrorCategory {
        self.0.category()
    }

    /// The schema failure behind this error, if any.
    pub fn as_schema(&self) -> Option<&SchemaValidationError> {
        match self.kind() {
            EstudioErrorKind::Schema(err) => Some(err),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to EstudioErrorKind
impl<T> From<T> for EstudioError
where
    T: Into<EstudioErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Estúdio operations.
///
/// # Examples
///
/// ```
/// use estudio_error::{EstudioResult, StorageError, StorageErrorKind};
///
/// fn load_bucket() -> EstudioResult<String> {
///     Err(StorageError::new(StorageErrorKind::NotFound("estudio-characters".to_string())))?
/// }
/// ```
pub type EstudioResult<T> = std::result::Result<T, EstudioError>;
