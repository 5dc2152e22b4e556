//! Trait definitions for remote model drivers.
//!
//! [`EstudioDriver`] is the single seam between flows and the hosted model.
//! Production code plugs in the Gemini client; tests plug in a scripted mock.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::{EstudioDriver, Metadata};
pub use types::{FinishReason, ModelMetadata};
