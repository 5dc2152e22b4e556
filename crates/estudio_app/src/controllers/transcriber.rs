//! Transcription and SEO metadata.

use super::lock;
use crate::context::FeatureContext;
use crate::runner::{FeatureRunner, FeatureStatus};
use estudio_error::EstudioResult;
use estudio_flows::{
    SeoFromMediaFlow, SeoFromMediaInput, SeoMetadata, SeoMetadataFlow, SeoMetadataInput,
    SeoPack, TranscribeMediaFlow, TranscribeMediaInput, Transcript,
};
use estudio_interface::EstudioDriver;
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument};

/// Last transcript and metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranscriberForm {
    /// Last transcript
    pub transcript: Option<Transcript>,
    /// Last SEO metadata
    pub seo: Option<SeoMetadata>,
}

/// Transcribes media and writes publishing metadata.
#[derive(Debug)]
pub struct Transcriber<D: EstudioDriver> {
    context: FeatureContext<D>,
    runner: FeatureRunner,
    form: Arc<Mutex<TranscriberForm>>,
}

impl<D: EstudioDriver> Clone for Transcriber<D> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
            runner: self.runner.clone(),
            form: Arc::clone(&self.form),
        }
    }
}

impl<D: EstudioDriver + 'static> Transcriber<D> {
    /// Create a transcriber with an empty form.
    pub fn new(context: FeatureContext<D>) -> Self {
        let runner = context.runner("transcriber");
        Self {
            context,
            runner,
            form: Arc::new(Mutex::new(TranscriberForm::default())),
        }
    }

    /// Snapshot of the form.
    pub fn form(&self) -> TranscriberForm {
        lock(&self.form).clone()
    }

    /// Current status.
    pub fn status(&self) -> FeatureStatus {
        self.runner.status()
    }

    /// The runner tracking this feature's tasks.
    pub fn runner(&self) -> &FeatureRunner {
        &self.runner
    }

    /// Cancel running generations.
    pub fn cancel_all(&self) {
        self.runner.cancel_all();
    }

    /// Transcribe an audio or video data URI.
    #[instrument(skip_all)]
    pub async fn transcribe(&self, input: TranscribeMediaInput) -> EstudioResult<Transcript> {
        let transcript = self
            .runner
            .run_flow(self.context.executor(), TranscribeMediaFlow, input)
            .await?;
        debug!(chars = transcript.transcript.chars().count(), "Transcript ready");
        let mut form = lock(&self.form);
        form.transcript = Some(transcript.clone());
        form.seo = None;
        Ok(transcript)
    }

    /// Write title, description, tags and hashtags.
    ///
    /// Without an explicit transcript the last one in the form is used.
    #[instrument(skip_all)]
    pub async fn seo(&self, mut input: SeoMetadataInput) -> EstudioResult<SeoMetadata> {
        if input.transcript.is_none() {
            input.transcript = lock(&self.form)
                .transcript
                .as_ref()
                .map(|t| t.transcript.clone());
        }
        let seo = self
            .runner
            .run_flow(self.context.executor(), SeoMetadataFlow, input)
            .await?;
        lock(&self.form).seo = Some(seo.clone());
        Ok(seo)
    }

    /// Transcribe, then write metadata from the transcript.
    #[instrument(skip_all)]
    pub async fn transcribe_and_seo(&self, input: SeoFromMediaInput) -> EstudioResult<SeoPack> {
        let pack = self
            .runner
            .run_composite(self.context.executor(), SeoFromMediaFlow, input)
            .await?;
        let mut form = lock(&self.form);
        form.transcript = Some(pack.transcript.clone());
        form.seo = Some(pack.seo.clone());
        Ok(pack)
    }
}
