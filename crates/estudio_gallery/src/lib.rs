//! Local gallery store for Estúdio.
//!
//! Characters, scenes and products live in their own JSON-array buckets;
//! commercials live in the `estudio-app-state` aggregate next to user
//! settings. All access goes through an injected [`KeyValueStore`].
//!
//! # Example
//!
//! ```
//! use estudio_core::{Character, CharacterProfile};
//! use estudio_gallery::Gallery;
//! # use estudio_core::Gender;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let gallery = Gallery::in_memory();
//! # let profile = CharacterProfile {
//! #     name: "Luna".into(), niche: "Moda".into(), personality: "Alegre".into(),
//! #     physical_appearance: "Ruiva".into(), clothing_style: "Streetwear".into(),
//! #     biography: "Baiana".into(), unique_traits: "Lenço amarelo".into(),
//! #     accent: "Baiano".into(), age: "26 anos".into(), gender: Gender::Female,
//! # };
//! let luna = Character::new(profile, 42);
//!
//! let characters = gallery.characters().save(luna.clone())?;
//! assert_eq!(characters.len(), 1);
//!
//! let characters = gallery.characters().delete(&luna.id)?;
//! assert!(characters.is_empty());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod app_state;
mod entity;
mod export;
mod gallery;
mod notifier;
mod repository;
mod store;

pub use app_state::AppState;
pub use entity::{
    APP_STATE_KEY, BucketLocation, CHARACTERS_KEY, GalleryCategory, GalleryEntity, PRODUCTS_KEY,
    SCENES_KEY,
};
pub use export::{ExportFormat, characters_to_csv, format_as_csv, to_json, write_export};
pub use gallery::Gallery;
pub use notifier::{GalleryChange, GalleryEvent, GalleryNotifier, GallerySubscription};
pub use repository::GalleryRepository;
pub use store::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
