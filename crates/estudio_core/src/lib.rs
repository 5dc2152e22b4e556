//! Core data types for the Estúdio content-creation toolkit.
//!
//! Two families of types live here: the model I/O vocabulary (prompt parts,
//! messages, requests and responses) and the domain entities that flows
//! produce and the gallery stores.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod entities;
mod input;
mod media;
mod message;
mod output;
mod request;
mod role;
pub mod validation;

pub use entities::{
    Character, CharacterField, CharacterProfile, CommercialDuration, CommercialScript, EntityId,
    Gender, Platform, Product, Propaganda, Scene, SceneDraft, SceneDuration, StoredProduct, Theme,
    ThumbnailStyle, ThumbnailVariant, ToneOfVoice, VideoFormat,
};
pub use input::Input;
pub use media::{DataUri, MediaFamily, MediaSource};
pub use message::{Message, MessageBuilder};
pub use output::Output;
pub use request::{GenerateRequest, GenerateRequestBuilder, GenerateResponse, ResponseFormat, SafetyPolicy};
pub use role::Role;
