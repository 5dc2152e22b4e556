//! Gallery storage error types.

/// Kinds of storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to create storage directory
    #[display("Failed to create storage directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write file
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Failed to read file
    #[display("Failed to read file: {}", _0)]
    FileRead(String),
    /// Failed to remove file
    #[display("Failed to remove file: {}", _0)]
    FileRemove(String),
    /// Bucket contents are not the expected JSON shape
    #[display("Bucket '{}' is malformed: {}", key, message)]
    MalformedBucket {
        /// Bucket key
        key: String,
        /// Parser message
        message: String,
    },
    /// Entity could not be serialized
    #[display("Serialization failed: {}", _0)]
    Serialization(String),
    /// Entity not found in its collection
    #[display("Entity not found: {}", _0)]
    NotFound(String),
    /// Export could not be produced
    #[display("Export failed: {}", _0)]
    Export(String),
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use estudio_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::NotFound("abc".to_string()));
/// assert!(format!("{}", err).contains("not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
