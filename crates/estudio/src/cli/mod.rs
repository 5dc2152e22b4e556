//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the estudio binary.

mod commands;
mod handlers;
mod media;

pub use commands::{Cli, Commands};
pub use handlers::run;
