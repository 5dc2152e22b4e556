//! Product recognition from a photo.

use crate::executor::{Flow, FlowConfig};
use estudio_core::Product;
use estudio_core::validation::data_uri;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Input of [`ProductFromImageFlow`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductFromImageInput {
    /// Foto do produto como data URI
    #[validate(custom(function = "data_uri"))]
    pub photo_data_uri: String,
    /// Marca, se o usuário já souber
    #[serde(default)]
    pub brand_hint: Option<String>,
}

/// Identifies a product and describes it for use in scenes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductFromImageFlow;

const PRODUCT_FROM_IMAGE: &str = "Identifique o produto desta foto.
{{media photoDataUri}}
Informe o nome, a marca (deixe vazio se não for possível identificar) e uma descrição \
curta com cores, materiais, formato e embalagem, útil para recriar o produto em vídeo.\
{{#if brandHint}} A marca informada pelo usuário é {{brandHint}}.{{/if}}";

impl Flow for ProductFromImageFlow {
    type Input = ProductFromImageInput;
    type Output = Product;

    fn name(&self) -> &'static str {
        "product_from_image"
    }

    fn template(&self) -> &'static str {
        PRODUCT_FROM_IMAGE
    }

    fn config(&self) -> FlowConfig {
        FlowConfig::json().with_temperature(0.3).relaxed()
    }
}
