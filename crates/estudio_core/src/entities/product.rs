//! Products advertised in scenes and commercials.

use crate::EntityId;
use crate::validation::non_blank;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A product, either embedded in a scene or stored on its own.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
    Validate,
    derive_setters::Setters,
)]
#[serde(rename_all = "camelCase")]
#[setters(prefix = "with_", into)]
pub struct Product {
    /// Nome do produto
    #[validate(custom(function = "non_blank"))]
    pub name: String,
    /// Marca
    pub brand: String,
    /// Descrição curta com os principais atributos visuais
    #[validate(custom(function = "non_blank"))]
    pub description: String,
}

/// A product saved to the gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredProduct {
    /// Gallery identifier
    pub id: EntityId,
    /// Product fields
    #[serde(flatten)]
    pub product: Product,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl StoredProduct {
    /// Wrap a product into a new gallery entity.
    pub fn new(product: Product) -> Self {
        Self {
            id: EntityId::new(),
            product,
            created_at: Utc::now(),
        }
    }
}
