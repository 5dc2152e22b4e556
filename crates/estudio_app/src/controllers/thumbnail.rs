//! Thumbnail generator.

use super::lock;
use crate::context::FeatureContext;
use crate::runner::{FeatureRunner, FeatureStatus};
use estudio_error::EstudioResult;
use estudio_flows::{
    ThumbnailHeadlinesFlow, ThumbnailHeadlinesInput, ThumbnailPack, ThumbnailPackFlow,
    ThumbnailPackInput,
};
use estudio_interface::EstudioDriver;
use std::sync::{Arc, Mutex};
use tracing::{info, instrument};

/// Last generated thumbnails and headlines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThumbnailForm {
    /// Reference plus variants A and B
    pub pack: Option<ThumbnailPack>,
    /// Overlay headline suggestions
    pub headlines: Vec<String>,
}

/// Generates A/B thumbnail packs.
#[derive(Debug)]
pub struct ThumbnailGenerator<D: EstudioDriver> {
    context: FeatureContext<D>,
    runner: FeatureRunner,
    form: Arc<Mutex<ThumbnailForm>>,
}

impl<D: EstudioDriver> Clone for ThumbnailGenerator<D> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
            runner: self.runner.clone(),
            form: Arc::clone(&self.form),
        }
    }
}

impl<D: EstudioDriver + 'static> ThumbnailGenerator<D> {
    /// Create a generator with an empty form.
    pub fn new(context: FeatureContext<D>) -> Self {
        let runner = context.runner("thumbnail_generator");
        Self {
            context,
            runner,
            form: Arc::new(Mutex::new(ThumbnailForm::default())),
        }
    }

    /// Snapshot of the form.
    pub fn form(&self) -> ThumbnailForm {
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

    /// Generate the reference thumbnail and both variants.
    ///
    /// Either variant failing fails the whole pack; the previous pack stays
    /// in the form.
    #[instrument(skip_all)]
    pub async fn pack(&self, input: ThumbnailPackInput) -> EstudioResult<ThumbnailPack> {
        let pack = self
            .runner
            .run_composite(self.context.executor(), ThumbnailPackFlow, input)
            .await?;
        lock(&self.form).pack = Some(pack.clone());
        info!("Thumbnail pack ready");
        self.runner
            .success("Thumbnails prontas", "As variantes A e B foram geradas.");
        Ok(pack)
    }

    /// Suggest overlay headlines.
    #[instrument(skip_all)]
    pub async fn headlines(&self, input: ThumbnailHeadlinesInput) -> EstudioResult<Vec<String>> {
        let output = self
            .runner
            .run_flow(self.context.executor(), ThumbnailHeadlinesFlow, input)
            .await?;
        lock(&self.form).headlines = output.headlines.clone();
        Ok(output.headlines)
    }
}
