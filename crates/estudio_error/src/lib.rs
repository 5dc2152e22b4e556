//! Error types for the Estúdio content-creation toolkit.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! Every domain error converts into [`EstudioError`], whose
//! [`category`](EstudioError::category) decides how a failure is shown to the user.
//!
//! # Examples
//!
//! ```
//! use estudio_error::{ErrorCategory, EstudioResult, SchemaErrorKind, SchemaValidationError};
//!
//! fn check_title(title: &str) -> EstudioResult<()> {
//!     if title.trim().is_empty() {
//!         Err(SchemaValidationError::new("videoTitle", SchemaErrorKind::Empty))?
//!     }
//!     Ok(())
//! }
//!
//! let err = check_title("  ").unwrap_err();
//! assert_eq!(err.category(), ErrorCategory::Validation);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod category;
mod config;
mod error;
mod flow;
mod gemini;
mod json;
mod media;
mod schema;
mod storage;
mod template;

pub use builder::{BuilderError, BuilderErrorKind};
pub use category::ErrorCategory;
pub use config::ConfigError;
pub use error::{EstudioError, EstudioErrorKind, EstudioResult};
pub use flow::{FlowError, FlowErrorKind};
pub use gemini::{GeminiError, GeminiErrorKind};
pub use json::JsonError;
pub use media::{MediaError, MediaErrorKind};
pub use schema::{SchemaErrorKind, SchemaValidationError};
pub use storage::{StorageError, StorageErrorKind};
pub use template::{TemplateError, TemplateErrorKind};
