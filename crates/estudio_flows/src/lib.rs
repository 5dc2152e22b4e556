//! Typed AI flows for Estúdio.
//!
//! This crate provides:
//! - [`FlowSchema`]: derived JSON schemas plus validation of flow inputs and outputs
//! - [`PromptTemplate`]: the placeholder, conditional-section and media template engine
//! - [`FlowExecutor`]: validate, render, call the model once, validate again
//! - [`FlowTask`]: spawned invocations with observable phases and cancellation
//! - [`CompositeFlow`]: multi-step flows such as the thumbnail pack
//! - Seventeen concrete flows for characters, scenes, products, commercials,
//!   thumbnails, transcription and SEO
//!
//! # Example
//!
//! ```
//! use estudio_core::{CommercialDuration, ToneOfVoice};
//! use estudio_flows::{CommercialNarrationFlow, CommercialNarrationInput, FlowExecutor};
//! use estudio_testing::MockDriver;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let driver = MockDriver::json(json!({"narration": "Comece o dia com Serra Azul."}));
//! let executor = FlowExecutor::new(Arc::new(driver));
//! let narration = executor
//!     .run(
//!         &CommercialNarrationFlow,
//!         CommercialNarrationInput {
//!             product_name: "Café Serra Azul".to_string(),
//!             main_message: "O sabor da manhã mineira".to_string(),
//!             target_audience: "Adultos que amam café especial".to_string(),
//!             tone: ToneOfVoice::Inspiring,
//!             duration: CommercialDuration::Medium,
//!         },
//!     )
//!     .await?;
//! assert_eq!(narration.narration, "Comece o dia com Serra Azul.");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod composite;
mod executor;
mod extraction;
mod flows;
mod schema;
mod task;
mod template;

pub use composite::{
    CompositeFlow, SeoFromMediaFlow, SeoFromMediaInput, SeoPack, ThumbnailPack, ThumbnailPackFlow,
    ThumbnailPackInput,
};
pub use executor::{
    DEFAULT_IMAGE_MODEL, DEFAULT_PREAMBLE, DEFAULT_TEXT_MODEL, Flow, FlowConfig, FlowExecutor,
    FlowOverride, FlowPhase, ModelRole, decode_image, decode_json, output_schema,
};
pub use extraction::{extract_json, parse_json};
pub use flows::*;
pub use schema::FlowSchema;
pub use task::FlowTask;
pub use template::PromptTemplate;
