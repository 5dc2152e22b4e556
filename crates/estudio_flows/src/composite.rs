//! Composite flows: fixed sequences of flow invocations.
//!
//! Later steps are fed from earlier outputs. The first failing step fails the
//! whole composite and no later step is invoked.

use crate::executor::{FlowExecutor, FlowPhase};
use crate::flows::{
    GeneratedImage, SeoMetadata, SeoMetadataFlow, SeoMetadataInput, ThumbnailReferenceFlow,
    ThumbnailReferenceInput, ThumbnailVariantFlow, ThumbnailVariantInput, TranscribeMediaFlow,
    TranscribeMediaInput, Transcript,
};
use crate::schema::FlowSchema;
use async_trait::async_trait;
use estudio_core::validation::{data_uri, media_reference, non_blank};
use estudio_core::{Platform, ThumbnailStyle, ThumbnailVariant};
use estudio_error::{EstudioError, EstudioResult};
use estudio_interface::EstudioDriver;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, instrument};
use validator::Validate;

/// A multi-step flow.
#[async_trait]
pub trait CompositeFlow: Send + Sync {
    /// Validated input
    type Input: FlowSchema;
    /// Combined result
    type Output: Send;

    /// Stable composite name.
    fn name(&self) -> &'static str;

    /// Run every step. Phases are published to `observer` for the composite
    /// as a whole: it is in flight until the last step finishes.
    async fn run<D: EstudioDriver + 'static>(
        &self,
        executor: &FlowExecutor<D>,
        input: Self::Input,
        observer: Option<&watch::Sender<FlowPhase>>,
    ) -> EstudioResult<Self::Output>;
}

fn publish(observer: Option<&watch::Sender<FlowPhase>>, phase: FlowPhase) {
    if let Some(observer) = observer {
        observer.send_replace(phase);
    }
}

fn finish<T>(
    observer: Option<&watch::Sender<FlowPhase>>,
    result: EstudioResult<T>,
) -> EstudioResult<T> {
    match &result {
        Ok(_) => publish(observer, FlowPhase::Succeeded),
        Err(e) => publish(observer, FlowPhase::Failed(e.category())),
    }
    result
}

/// Input of [`ThumbnailPackFlow`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailPackInput {
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
    /// Texto sobreposto às variantes
    #[serde(default)]
    pub overlay_text: Option<String>,
}

/// A reference thumbnail and its two A/B variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailPack {
    /// Reference image
    pub reference: GeneratedImage,
    /// Text-forward variant
    pub variant_a: GeneratedImage,
    /// Face-forward variant
    pub variant_b: GeneratedImage,
}

/// Reference thumbnail, then variants A and B generated concurrently.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThumbnailPackFlow;

#[async_trait]
impl CompositeFlow for ThumbnailPackFlow {
    type Input = ThumbnailPackInput;
    type Output = ThumbnailPack;

    fn name(&self) -> &'static str {
        "thumbnail_pack"
    }

    #[instrument(skip_all, fields(flow = "thumbnail_pack"))]
    async fn run<D: EstudioDriver + 'static>(
        &self,
        executor: &FlowExecutor<D>,
        input: ThumbnailPackInput,
        observer: Option<&watch::Sender<FlowPhase>>,
    ) -> EstudioResult<ThumbnailPack> {
        publish(observer, FlowPhase::Validating);
        let result = async {
            input.check()?;
            publish(observer, FlowPhase::AwaitingModel);

            let reference = executor
                .run(
                    &ThumbnailReferenceFlow,
                    ThumbnailReferenceInput {
                        video_title: input.video_title.clone(),
                        description: input.description.clone(),
                        style: input.style,
                        character_photo_data_uri: input.character_photo_data_uri.clone(),
                    },
                )
                .await?;
            debug!("Reference thumbnail ready, generating variants");

            let variant = |variant: ThumbnailVariant| ThumbnailVariantInput {
                reference_image_data_uri: reference.image_data_uri.clone(),
                video_title: input.video_title.clone(),
                variant,
                overlay_text: input.overlay_text.clone(),
            };
            let (variant_a, variant_b) = tokio::try_join!(
                executor.run(&ThumbnailVariantFlow, variant(ThumbnailVariant::A)),
                executor.run(&ThumbnailVariantFlow, variant(ThumbnailVariant::B)),
            )?;

            Ok::<_, EstudioError>(ThumbnailPack {
                reference,
                variant_a,
                variant_b,
            })
        }
        .await;
        finish(observer, result)
    }
}

/// Input of [`SeoFromMediaFlow`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SeoFromMediaInput {
    /// Áudio ou vídeo como data URI ou URL
    #[validate(custom(function = "media_reference"))]
    pub media_data_uri: String,
    /// Idioma falado
    #[serde(default)]
    pub language: Option<String>,
    /// Assunto do vídeo
    #[validate(custom(function = "non_blank"))]
    pub video_topic: String,
    /// Plataforma de publicação
    pub platform: Platform,
    /// Nicho do canal
    #[serde(default)]
    pub niche: Option<String>,
}

/// Transcript plus the metadata written from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoPack {
    /// Transcription step output
    pub transcript: Transcript,
    /// Metadata step output
    pub seo: SeoMetadata,
}

/// Transcribe media, then write SEO metadata from the transcript.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeoFromMediaFlow;

#[async_trait]
impl CompositeFlow for SeoFromMediaFlow {
    type Input = SeoFromMediaInput;
    type Output = SeoPack;

    fn name(&self) -> &'static str {
        "seo_from_media"
    }

    #[instrument(skip_all, fields(flow = "seo_from_media"))]
    async fn run<D: EstudioDriver + 'static>(
        &self,
        executor: &FlowExecutor<D>,
        input: SeoFromMediaInput,
        observer: Option<&watch::Sender<FlowPhase>>,
    ) -> EstudioResult<SeoPack> {
        publish(observer, FlowPhase::Validating);
        let result = async {
            input.check()?;
            publish(observer, FlowPhase::AwaitingModel);

            let transcript = executor
                .run(
                    &TranscribeMediaFlow,
                    TranscribeMediaInput {
                        media_data_uri: input.media_data_uri.clone(),
                        language: input.language.clone(),
                    },
                )
                .await?;

            let seo = executor
                .run(
                    &SeoMetadataFlow,
                    SeoMetadataInput {
                        video_topic: input.video_topic.clone(),
                        platform: input.platform,
                        transcript: Some(transcript.transcript.clone()),
                        niche: input.niche.clone(),
                    },
                )
                .await?;

            Ok::<_, EstudioError>(SeoPack { transcript, seo })
        }
        .await;
        finish(observer, result)
    }
}
