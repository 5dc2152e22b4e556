//! Inline media (data URI) error types.

/// Reasons a `data:<mime>;base64,<data>` reference can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum MediaErrorKind {
    /// Missing `data:` scheme prefix
    #[display("missing 'data:' prefix")]
    MissingScheme,
    /// Missing `;base64,` marker
    #[display("missing ';base64,' marker")]
    NotBase64,
    /// MIME type is empty or has no `/`
    #[display("invalid MIME type '{}'", _0)]
    InvalidMime(String),
    /// No payload after the marker
    #[display("empty payload")]
    EmptyPayload,
    /// Payload is not valid base64
    #[display("payload is not valid base64: {}", _0)]
    Decode(String),
}

/// Media reference error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Media Error: {} at line {} in {}", kind, line, file)]
pub struct MediaError {
    /// The kind of error that occurred
    pub kind: MediaErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl MediaError {
    /// Create a new media error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: MediaErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
