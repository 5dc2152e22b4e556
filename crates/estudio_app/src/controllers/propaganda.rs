//! Propaganda (commercial) generator.
//!
//! A commercial is assembled in steps: the draft holds the product, the
//! campaign suggestion fills audience, message and tone, then narration and
//! script are generated from it. Nothing is stored until [`save`] is called.
//!
//! [`save`]: PropagandaGenerator::save

use super::{apply_if_current, lock, missing};
use crate::context::FeatureContext;
use crate::editor::{EditorRequest, EditorTarget};
use crate::runner::{FeatureRunner, FeatureStatus};
use estudio_core::{CommercialDuration, CommercialScript, Propaganda, ToneOfVoice};
use estudio_error::EstudioResult;
use estudio_flows::{
    CampaignSuggestion, CampaignSuggestionFlow, CampaignSuggestionInput, CommercialNarrationFlow,
    CommercialNarrationInput, CommercialScriptFlow, CommercialScriptInput,
};
use estudio_interface::EstudioDriver;
use std::sync::{Arc, Mutex};
use tracing::{info, instrument};

const FEATURE: &str = "propaganda_generator";

/// Commercial currently being assembled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropagandaForm {
    /// Working commercial
    pub propaganda: Option<Propaganda>,
}

/// Generates commercial copy step by step.
#[derive(Debug)]
pub struct PropagandaGenerator<D: EstudioDriver> {
    context: FeatureContext<D>,
    runner: FeatureRunner,
    form: Arc<Mutex<PropagandaForm>>,
}

impl<D: EstudioDriver> Clone for PropagandaGenerator<D> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
            runner: self.runner.clone(),
            form: Arc::clone(&self.form),
        }
    }
}

impl<D: EstudioDriver + 'static> PropagandaGenerator<D> {
    /// Create a generator with an empty form.
    pub fn new(context: FeatureContext<D>) -> Self {
        let runner = context.runner(FEATURE);
        Self {
            context,
            runner,
            form: Arc::new(Mutex::new(PropagandaForm::default())),
        }
    }

    /// Snapshot of the form.
    pub fn form(&self) -> PropagandaForm {
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

    /// Start a new commercial for a product.
    pub fn start(
        &self,
        product_name: impl Into<String>,
        product_description: impl Into<String>,
        tone: ToneOfVoice,
        duration: CommercialDuration,
    ) -> Propaganda {
        let propaganda = Propaganda::new(product_name, product_description, tone, duration);
        lock(&self.form).propaganda = Some(propaganda.clone());
        propaganda
    }

    /// Apply a local edit to the working commercial.
    pub fn edit<F: FnOnce(&mut Propaganda)>(&self, edit: F) -> EstudioResult<Propaganda> {
        let mut form = lock(&self.form);
        let propaganda = form.propaganda.as_mut().ok_or_else(|| missing("productName"))?;
        edit(propaganda);
        Ok(propaganda.clone())
    }

    fn draft_or_report(&self) -> EstudioResult<Propaganda> {
        self.runner.report(
            lock(&self.form)
                .propaganda
                .clone()
                .ok_or_else(|| missing("productName")),
        )
    }

    fn update<F: FnOnce(&mut Propaganda)>(&self, draft: Propaganda, update: F) -> Propaganda {
        let mut form = lock(&self.form);
        apply_if_current(FEATURE, &mut form.propaganda, draft, update)
    }

    /// Suggest audience, message and tone for the product.
    #[instrument(skip_all)]
    pub async fn suggest_campaign(&self) -> EstudioResult<CampaignSuggestion> {
        let draft = self.draft_or_report()?;
        let target_audience = Some(draft.target_audience.clone()).filter(|a| !a.trim().is_empty());
        let input = CampaignSuggestionInput {
            product_name: draft.product_name.clone(),
            product_description: draft.product_description.clone(),
            target_audience,
        };
        let suggestion = self
            .runner
            .run_flow(self.context.executor(), CampaignSuggestionFlow, input)
            .await?;

        let applied = suggestion.clone();
        self.update(draft, move |p| {
            p.target_audience = applied.target_audience;
            p.main_message = applied.main_message;
            p.tone = applied.tone;
        });
        Ok(suggestion)
    }

    /// Write the voice-over narration.
    #[instrument(skip_all)]
    pub async fn narration(&self) -> EstudioResult<String> {
        let draft = self.draft_or_report()?;
        let input = CommercialNarrationInput {
            product_name: draft.product_name.clone(),
            main_message: draft.main_message.clone(),
            target_audience: draft.target_audience.clone(),
            tone: draft.tone,
            duration: draft.duration,
        };
        let output = self
            .runner
            .run_flow(self.context.executor(), CommercialNarrationFlow, input)
            .await?;

        let narration = output.narration.clone();
        self.update(draft, move |p| p.narration = narration);
        Ok(output.narration)
    }

    /// Write the full commercial script.
    #[instrument(skip_all)]
    pub async fn script(&self) -> EstudioResult<CommercialScript> {
        let draft = self.draft_or_report()?;
        let narration = Some(draft.narration.clone()).filter(|n| !n.trim().is_empty());
        let input = CommercialScriptInput {
            product_name: draft.product_name.clone(),
            product_description: draft.product_description.clone(),
            target_audience: draft.target_audience.clone(),
            main_message: draft.main_message.clone(),
            tone: draft.tone,
            duration: draft.duration,
            narration,
            reference_image_data_uri: draft.reference_image.clone(),
        };
        let script = self
            .runner
            .run_flow(self.context.executor(), CommercialScriptFlow, input)
            .await?;

        let stored = script.clone();
        self.update(draft, move |p| p.script = Some(stored));
        info!(title = %script.title, "Commercial script ready");
        Ok(script)
    }

    /// Persist the working commercial.
    #[instrument(skip_all)]
    pub fn save(&self) -> EstudioResult<Vec<Propaganda>> {
        let propaganda = self.draft_or_report()?;
        let name = propaganda.product_name.clone();
        let saved = self
            .runner
            .report(self.context.gallery().propagandas().save(propaganda))?;
        self.runner.success(
            "Propaganda salva",
            format!("O comercial de {} foi salvo na galeria.", name),
        );
        Ok(saved)
    }

    /// Put a stored commercial into the form.
    pub fn load(&self, propaganda: Propaganda) {
        lock(&self.form).propaganda = Some(propaganda);
    }

    /// Empty the form.
    pub fn clear(&self) {
        *lock(&self.form) = PropagandaForm::default();
    }
}

impl<D: EstudioDriver + 'static> EditorTarget for PropagandaGenerator<D> {
    fn editor_name(&self) -> &'static str {
        FEATURE
    }

    fn apply(&self, request: &EditorRequest) -> bool {
        match request {
            EditorRequest::LoadPropaganda(propaganda) => {
                self.load(propaganda.clone());
                true
            }
            _ => false,
        }
    }
}
