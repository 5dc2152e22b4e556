//! Test support for the Estúdio workspace.
//!
//! [`MockDriver`] stands in for the remote model: it replays scripted
//! responses, counts calls and keeps every request for inspection.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
mod mock;

pub use mock::{MockBehavior, MockDriver, MockResponse, prompt_text};
