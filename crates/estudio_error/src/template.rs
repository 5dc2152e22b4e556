//! Prompt template error types.
//!
//! Template failures are internal invariant violations: they only happen when a
//! template references a field that validation should have guaranteed, or when
//! the template text itself is malformed.

/// Prompt template failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum TemplateErrorKind {
    /// Placeholder refers to a field that is absent from the input
    #[display("Placeholder '{}' has no value", _0)]
    MissingField(String),
    /// Media placeholder refers to a value that is not a data URI or URL
    #[display("Field '{}' is not a media reference", _0)]
    NotMedia(String),
    /// `{{#if}}` / `{{/if}}` tags do not balance
    #[display("Unbalanced section: {}", _0)]
    UnbalancedSection(String),
    /// Template text could not be parsed
    #[display("Malformed template: {}", _0)]
    Malformed(String),
}

/// Prompt template error with location tracking.
///
/// # Examples
///
/// ```
/// use estudio_error::{TemplateError, TemplateErrorKind};
///
/// let err = TemplateError::new(TemplateErrorKind::MissingField("productName".into()));
/// assert!(format!("{}", err).contains("productName"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Template Error: {} at line {} in {}", kind, line, file)]
pub struct TemplateError {
    /// The kind of error that occurred
    pub kind: TemplateErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl TemplateError {
    /// Create a new template error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: TemplateErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
