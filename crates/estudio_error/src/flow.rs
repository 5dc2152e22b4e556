//! Flow execution error types.

/// Failures raised by the flow executor itself, as opposed to the schema,
/// template or remote layers it delegates to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum FlowErrorKind {
    /// The task was cancelled before it finished
    #[display("Flow was cancelled")]
    Cancelled,
    /// The task exceeded its configured timeout
    #[display("Flow timed out after {}s", secs)]
    TimedOut {
        /// Timeout that elapsed, in seconds
        secs: u64,
    },
    /// No JSON value could be located in the model text
    #[display("Flow '{}' got no JSON in a {} character response", flow, length)]
    NoJson {
        /// Flow name
        flow: String,
        /// Length of the model text
        length: usize,
    },
    /// The model output did not match the output schema
    #[display("Flow '{}' produced invalid output: {}", flow, message)]
    InvalidOutput {
        /// Flow name
        flow: String,
        /// Underlying validation message
        message: String,
    },
    /// The spawned task panicked or was aborted
    #[display("Flow task failed: {}", _0)]
    TaskPanicked(String),
}

/// Flow error with location tracking.
///
/// # Examples
///
/// ```
/// use estudio_error::{FlowError, FlowErrorKind};
///
/// let err = FlowError::new(FlowErrorKind::TimedOut { secs: 30 });
/// assert!(format!("{}", err).contains("30s"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Flow Error: {} at line {} in {}", kind, line, file)]
pub struct FlowError {
    /// The kind of error that occurred
    pub kind: FlowErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl FlowError {
    /// Create a new flow error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: FlowErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
