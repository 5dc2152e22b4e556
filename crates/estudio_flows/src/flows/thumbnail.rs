//! Thumbnail flows: reference image, A/B variants and headlines.

use super::GeneratedImage;
use crate::executor::{Flow, FlowConfig};
use estudio_core::validation::{data_uri, non_blank};
use estudio_core::{ThumbnailStyle, ThumbnailVariant};
use estudio_error::{EstudioResult, JsonError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// Input of [`ThumbnailReferenceFlow`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailReferenceInput {
    /// Título do vídeo
    #[validate(custom(function = "non_blank"))]
    pub video_title: String,
    /// Descrição do vídeo
    #[serde(default)]
    pub description: Option<String>,
    /// Estilo visual
    pub style: ThumbnailStyle,
    /// Foto do criador como data URI
    #[serde(default)]
    #[validate(custom(function = "data_uri"))]
    pub character_photo_data_uri: Option<String>,
}

/// Generates the reference thumbnail that variants are derived from.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThumbnailReferenceFlow;

const THUMBNAIL_REFERENCE: &str = "Crie uma thumbnail 16:9 para YouTube no estilo {{style}} \
para o vídeo \"{{videoTitle}}\".\
{{#if description}} Sobre o vídeo: {{description}}.{{/if}}\
{{#if characterPhotoDataUri}} Use a pessoa desta foto como protagonista, preservando o rosto:
{{media characterPhotoDataUri}}{{/if}}
Composição limpa, cores vibrantes e espaço para um título curto.";

impl Flow for ThumbnailReferenceFlow {
    type Input = ThumbnailReferenceInput;
    type Output = GeneratedImage;

    fn name(&self) -> &'static str {
        "thumbnail_reference"
    }

    fn template(&self) -> &'static str {
        THUMBNAIL_REFERENCE
    }

    fn config(&self) -> FlowConfig {
        FlowConfig::image().relaxed()
    }
}

/// Input of [`ThumbnailVariantFlow`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailVariantInput {
    /// Thumbnail de referência como data URI
    #[validate(custom(function = "data_uri"))]
    pub reference_image_data_uri: String,
    /// Título do vídeo
    #[validate(custom(function = "non_blank"))]
    pub video_title: String,
    /// Variante a gerar
    pub variant: ThumbnailVariant,
    /// Texto sobreposto
    #[serde(default)]
    pub overlay_text: Option<String>,
}

/// Re-renders a reference thumbnail in one of the A/B directions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThumbnailVariantFlow;

const THUMBNAIL_VARIANT: &str = "A partir desta thumbnail de referência:
{{media referenceImageDataUri}}
Crie a variante {{variant}} para o vídeo \"{{videoTitle}}\": {{variantDirection}}.\
{{#if overlayText}} Texto na imagem: \"{{overlayText}}\".{{/if}} \
Mantenha a mesma pessoa e a mesma identidade visual.";

impl Flow for ThumbnailVariantFlow {
    type Input = ThumbnailVariantInput;
    type Output = GeneratedImage;

    fn name(&self) -> &'static str {
        "thumbnail_variant"
    }

    fn template(&self) -> &'static str {
        THUMBNAIL_VARIANT
    }

    fn config(&self) -> FlowConfig {
        FlowConfig::image().relaxed()
    }

    fn prompt_context(&self, input: &Self::Input) -> EstudioResult<Value> {
        let mut context = serde_json::to_value(input).map_err(|e| JsonError::new(e.to_string()))?;
        if let Some(map) = context.as_object_mut() {
            map.insert(
                "variantDirection".to_string(),
                Value::from(input.variant.direction()),
            );
        }
        Ok(context)
    }
}

/// Input of [`ThumbnailHeadlinesFlow`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailHeadlinesInput {
    /// Título do vídeo
    #[validate(custom(function = "non_blank"))]
    pub video_title: String,
    /// Nicho do canal
    #[serde(default)]
    pub niche: Option<String>,
}

/// Short texts to overlay on a thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailHeadlines {
    /// De três a cinco textos curtos (até 5 palavras cada)
    #[validate(length(min = 1))]
    pub headlines: Vec<String>,
}

/// Suggests overlay headlines for a video.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThumbnailHeadlinesFlow;

const THUMBNAIL_HEADLINES: &str = "Sugira de três a cinco textos curtos e chamativos para a \
thumbnail do vídeo \"{{videoTitle}}\".\
{{#if niche}} O canal é de {{niche}}.{{/if}} \
Cada texto deve ter no máximo cinco palavras.";

impl Flow for ThumbnailHeadlinesFlow {
    type Input = ThumbnailHeadlinesInput;
    type Output = ThumbnailHeadlines;

    fn name(&self) -> &'static str {
        "thumbnail_headlines"
    }

    fn template(&self) -> &'static str {
        THUMBNAIL_HEADLINES
    }

    fn config(&self) -> FlowConfig {
        FlowConfig::json().with_temperature(1.0)
    }
}
