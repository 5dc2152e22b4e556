//! Output shared by the image flows.

use estudio_core::validation::data_uri;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// An image produced by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    /// Imagem gerada como data URI
    #[validate(custom(function = "data_uri"))]
    pub image_data_uri: String,
    /// Texto que o modelo devolveu junto com a imagem
    #[serde(default)]
    pub caption: Option<String>,
}
