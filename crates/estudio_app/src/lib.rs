//! Feature controllers, configuration and activation for Estúdio.
//!
//! Each feature of the app has a controller that owns its form state and
//! runs flows as observable, cancellable tasks:
//!
//! - [`CharacterBuilder`]: characters from a photo or an idea, field
//!   refinement, negative prompt and portrait
//! - [`SceneBuilder`]: scene drafts, dialogue, product identification and
//!   the final video prompt
//! - [`PropagandaGenerator`]: campaign suggestion, narration and script
//! - [`ThumbnailGenerator`]: A/B thumbnail packs and headlines
//! - [`Transcriber`]: transcripts and SEO metadata
//! - [`GalleryBrowser`]: listing, deletion, export and "open in editor"
//!
//! Failures never escape as panics. Every failed action publishes a
//! [`Notification`] and returns the error, and the form keeps its previous
//! contents.
//!
//! # Example
//!
//! ```
//! use estudio_app::{CharacterBuilder, FeatureContext};
//! use estudio_flows::{CharacterFromIdeaInput, FlowExecutor};
//! use estudio_gallery::Gallery;
//! use estudio_testing::{MockDriver, fixtures};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let driver = Arc::new(MockDriver::json(fixtures::character_profile_json()));
//! let context = FeatureContext::new(FlowExecutor::new(driver), Gallery::in_memory());
//! let builder = CharacterBuilder::new(context.clone());
//!
//! let input = CharacterFromIdeaInput {
//!     niche: "Moda".to_string(),
//!     idea: None,
//!     gender: None,
//!     age_range: None,
//! };
//! let character = builder.from_idea(input).await?;
//! assert_eq!(character.profile.name, "Luna");
//!
//! builder.save()?;
//! assert_eq!(context.gallery().characters().list()?.len(), 1);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod activation;
mod app;
mod config;
mod context;
mod controllers;
mod editor;
mod notifications;
mod runner;

pub use activation::{ACTIVATION_KEY, ActivationGate, LICENSE_KEYS, normalize_key};
pub use app::EstudioApp;
pub use config::{EstudioConfig, ModelConfig, StorageConfig, TaskConfig};
pub use context::FeatureContext;
pub use controllers::{
    CharacterBuilder, CharacterForm, GalleryBrowser, GalleryItem, PropagandaForm,
    PropagandaGenerator, SceneBuilder, SceneForm, ThumbnailForm, ThumbnailGenerator, Transcriber,
    TranscriberForm,
};
pub use editor::{EditorChannel, EditorRequest, EditorTarget, spawn_editor_listener};
pub use notifications::{
    Notification, NotificationCenter, NotificationLevel, REMOTE_MESSAGE, VALIDATION_MESSAGE,
};
pub use runner::{FeatureRunner, FeatureStatus};
