//! Transcription and SEO flows.

use crate::executor::{Flow, FlowConfig};
use estudio_core::Platform;
use estudio_core::validation::{media_reference, non_blank};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Input of [`TranscribeMediaFlow`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeMediaInput {
    /// Áudio ou vídeo como data URI ou URL
    #[validate(custom(function = "media_reference"))]
    pub media_data_uri: String,
    /// Idioma falado, se conhecido
    #[serde(default)]
    pub language: Option<String>,
}

/// A transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    /// Transcrição completa
    #[validate(custom(function = "non_blank"))]
    pub transcript: String,
    /// Idioma detectado
    #[validate(custom(function = "non_blank"))]
    pub language: String,
}

/// Transcribes audio or video.
#[derive(Debug, Clone, Copy, Default)]
pub struct TranscribeMediaFlow;

const TRANSCRIBE_MEDIA: &str = "Transcreva integralmente a fala desta mídia.
{{media mediaDataUri}}
{{#if language}}O idioma falado é {{language}}. {{/if}}\
Preserve a pontuação natural, separe falantes diferentes em parágrafos e informe o \
idioma detectado.";

impl Flow for TranscribeMediaFlow {
    type Input = TranscribeMediaInput;
    type Output = Transcript;

    fn name(&self) -> &'static str {
        "transcribe_media"
    }

    fn template(&self) -> &'static str {
        TRANSCRIBE_MEDIA
    }

    fn config(&self) -> FlowConfig {
        FlowConfig::json().with_temperature(0.0)
    }
}

/// Input of [`SeoMetadataFlow`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SeoMetadataInput {
    /// Assunto do vídeo
    #[validate(custom(function = "non_blank"))]
    pub video_topic: String,
    /// Plataforma de publicação
    pub platform: Platform,
    /// Transcrição do vídeo
    #[serde(default)]
    pub transcript: Option<String>,
    /// Nicho do canal
    #[serde(default)]
    pub niche: Option<String>,
}

/// Publishing metadata for a video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SeoMetadata {
    /// Título otimizado para busca
    #[validate(custom(function = "non_blank"))]
    pub title: String,
    /// Descrição do vídeo
    #[validate(custom(function = "non_blank"))]
    pub description: String,
    /// Palavras-chave
    pub tags: Vec<String>,
    /// Hashtags, cada uma começando com #
    pub hashtags: Vec<String>,
}

/// Writes title, description, tags and hashtags for a platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeoMetadataFlow;

const SEO_METADATA: &str = "Crie os metadados de publicação de um vídeo sobre {{videoTopic}} \
para {{platform}}.\
{{#if niche}} Nicho do canal: {{niche}}.{{/if}}\
{{#if transcript}}
Transcrição do vídeo:
{{transcript}}
{{/if}} \
Escreva um título chamativo e otimizado para busca, uma descrição com chamada para ação, \
de 10 a 15 tags e de 3 a 5 hashtags relevantes para o público brasileiro.";

impl Flow for SeoMetadataFlow {
    type Input = SeoMetadataInput;
    type Output = SeoMetadata;

    fn name(&self) -> &'static str {
        "seo_metadata"
    }

    fn template(&self) -> &'static str {
        SEO_METADATA
    }
}
