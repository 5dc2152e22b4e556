//! Gallery categories and the entities stored in them.

use estudio_core::{Character, EntityId, Propaganda, Scene, StoredProduct};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Store key of the characters collection.
pub const CHARACTERS_KEY: &str = "estudio-characters";
/// Store key of the scenes collection.
pub const SCENES_KEY: &str = "estudio-scenes";
/// Store key of the products collection.
pub const PRODUCTS_KEY: &str = "estudio-products";
/// Store key of the app-state aggregate (commercials and settings).
pub const APP_STATE_KEY: &str = "estudio-app-state";

/// A gallery collection.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum GalleryCategory {
    /// Digital influencer characters
    #[strum(to_string = "personagens", serialize = "characters")]
    Characters,
    /// Video scenes
    #[strum(to_string = "cenas", serialize = "scenes")]
    Scenes,
    /// Products
    #[strum(to_string = "produtos", serialize = "products")]
    Products,
    /// Commercials
    #[strum(to_string = "propagandas", serialize = "commercials")]
    Propagandas,
}

/// Where a collection lives in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketLocation {
    /// The whole value under `key` is a JSON array.
    Array(&'static str),
    /// The array is `field` of the JSON object under `key`.
    Field {
        /// Store key of the aggregate
        key: &'static str,
        /// Field holding the array
        field: &'static str,
    },
}

impl BucketLocation {
    /// Store key holding this collection.
    pub fn key(&self) -> &'static str {
        match self {
            BucketLocation::Array(key) => key,
            BucketLocation::Field { key, .. } => key,
        }
    }
}

impl GalleryCategory {
    /// Where this category is persisted.
    pub fn location(self) -> BucketLocation {
        match self {
            GalleryCategory::Characters => BucketLocation::Array(CHARACTERS_KEY),
            GalleryCategory::Scenes => BucketLocation::Array(SCENES_KEY),
            GalleryCategory::Products => BucketLocation::Array(PRODUCTS_KEY),
            GalleryCategory::Propagandas => BucketLocation::Field {
                key: APP_STATE_KEY,
                field: "propagandas",
            },
        }
    }
}

/// An entity that can be stored in the gallery.
pub trait GalleryEntity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection this entity belongs to.
    const CATEGORY: GalleryCategory;

    /// Gallery identifier.
    fn id(&self) -> &EntityId;

    /// Short label for listings.
    fn title(&self) -> &str;
}

impl GalleryEntity for Character {
    const CATEGORY: GalleryCategory = GalleryCategory::Characters;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.profile.name
    }
}

impl GalleryEntity for Scene {
    const CATEGORY: GalleryCategory = GalleryCategory::Scenes;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.draft.main_action
    }
}

impl GalleryEntity for StoredProduct {
    const CATEGORY: GalleryCategory = GalleryCategory::Products;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.product.name
    }
}

impl GalleryEntity for Propaganda {
    const CATEGORY: GalleryCategory = GalleryCategory::Propagandas;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.product_name
    }
}
