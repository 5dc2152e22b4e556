//! Estúdio: an AI content studio for Brazilian-Portuguese video creators.
//!
//! Estúdio wraps Google Gemini behind typed flows that turn photos, ideas
//! and recordings into digital influencer characters, video scenes,
//! commercial scripts, A/B thumbnails, transcripts and SEO metadata.
//! Results are kept in a local gallery.
//!
//! # Architecture
//!
//! - `estudio_error`: error kinds with caller locations and categories
//! - `estudio_core`: request/response types and gallery entities
//! - `estudio_interface`: the [`EstudioDriver`] trait
//! - `estudio_models`: [`GeminiClient`], the REST driver
//! - `estudio_flows`: schemas, prompt templates, the flow executor and
//!   every concrete flow
//! - `estudio_gallery`: the local gallery store
//! - `estudio_app`: feature controllers, configuration and activation
//!
//! This crate re-exports everything for convenience and ships the `estudio`
//! command-line tool.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use estudio::{EstudioApp, EstudioConfig, FeatureContext, Gallery};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EstudioConfig::load()?;
//!     let driver = Arc::new(config.gemini_client()?);
//!     let gallery = Gallery::open(config.data_dir())?;
//!     let app = EstudioApp::new(FeatureContext::new(config.executor(driver), gallery));
//!
//!     for item in app.gallery().list(estudio::GalleryCategory::Characters)? {
//!         println!("{} {}", item.id(), item.title());
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use estudio_app::*;
pub use estudio_core::*;
pub use estudio_error::*;
pub use estudio_flows::*;
pub use estudio_gallery::*;
pub use estudio_interface::*;
pub use estudio_models::GeminiClient;
