//! Domain entities stored in the gallery and exchanged with flows.

mod character;
mod enums;
mod id;
mod product;
mod propaganda;
mod scene;

pub use character::{Character, CharacterProfile};
pub use enums::{
    CharacterField, CommercialDuration, Gender, Platform, SceneDuration, Theme, ThumbnailStyle,
    ThumbnailVariant, ToneOfVoice, VideoFormat,
};
pub use id::EntityId;
pub use product::{Product, StoredProduct};
pub use propaganda::{CommercialScript, Propaganda};
pub use scene::{Scene, SceneDraft};
