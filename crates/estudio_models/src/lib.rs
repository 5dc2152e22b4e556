//! Remote model integrations for Estúdio.
//!
//! Currently a single provider: Google Gemini over its REST API.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod gemini;

pub use gemini::GeminiClient;
