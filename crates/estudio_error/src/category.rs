//! Coarse error categories used for user-facing handling.

/// How a failure should be surfaced to the person using the app.
///
/// Categories drive notification wording and severity. None of them are
/// retried automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ErrorCategory {
    /// Input did not satisfy a schema; fix the form and resubmit
    #[display("validation")]
    Validation,
    /// Network, HTTP, empty, blocked or malformed model response
    #[display("remote")]
    Remote,
    /// Local gallery read or write failed
    #[display("storage")]
    Storage,
    /// Invariant violation inside the app
    #[display("internal")]
    Internal,
    /// Cancelled by the caller or timed out
    #[display("cancelled")]
    Cancelled,
    /// Configuration could not be loaded
    #[display("config")]
    Config,
}
