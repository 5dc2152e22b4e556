//! Scene builder.

use super::{apply_if_current, lock, missing};
use crate::context::FeatureContext;
use crate::editor::{EditorRequest, EditorTarget};
use crate::runner::{FeatureRunner, FeatureStatus};
use estudio_core::{
    Character, EntityId, Product, Scene, SceneDuration, StoredProduct, ToneOfVoice, VideoFormat,
};
use estudio_error::{EstudioResult, StorageError, StorageErrorKind};
use estudio_flows::{
    ProductFromImageFlow, ProductFromImageInput, SceneDialogueFlow, SceneDialogueInput,
    SceneFromIdeaFlow, SceneFromIdeaInput, VideoPromptFlow, VideoPromptInput,
};
use estudio_interface::EstudioDriver;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument};

const FEATURE: &str = "scene_builder";

/// Scene currently being edited, with the character and product joined to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneForm {
    /// Working scene
    pub scene: Option<Scene>,
    /// Character appearing in the scene
    pub character: Option<Character>,
    /// Product identified for the scene
    pub product: Option<Product>,
}

/// Drafts scenes and builds video prompts.
#[derive(Debug)]
pub struct SceneBuilder<D: EstudioDriver> {
    context: FeatureContext<D>,
    runner: FeatureRunner,
    form: Arc<Mutex<SceneForm>>,
}

impl<D: EstudioDriver> Clone for SceneBuilder<D> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
            runner: self.runner.clone(),
            form: Arc::clone(&self.form),
        }
    }
}

impl<D: EstudioDriver + 'static> SceneBuilder<D> {
    /// Create a builder with an empty form.
    pub fn new(context: FeatureContext<D>) -> Self {
        let runner = context.runner(FEATURE);
        Self {
            context,
            runner,
            form: Arc::new(Mutex::new(SceneForm::default())),
        }
    }

    /// Snapshot of the form.
    pub fn form(&self) -> SceneForm {
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

    fn scene_or_report(&self) -> EstudioResult<Scene> {
        self.runner
            .report(lock(&self.form).scene.clone().ok_or_else(|| missing("scene")))
    }

    fn character_or_report(&self) -> EstudioResult<Character> {
        self.runner
            .report(lock(&self.form).character.clone().ok_or_else(|| missing("character")))
    }

    /// Pick the scene's character from the gallery.
    #[instrument(skip_all, fields(id = %id))]
    pub fn select_character(&self, id: &EntityId) -> EstudioResult<Character> {
        let found = self.context.gallery().characters().get(id).and_then(|found| {
            found.ok_or_else(|| StorageError::new(StorageErrorKind::NotFound(id.to_string())).into())
        });
        let character = self.runner.report(found)?;
        let mut form = lock(&self.form);
        if let Some(scene) = form.scene.as_mut() {
            scene.character_id = Some(character.id.clone());
        }
        form.character = Some(character.clone());
        debug!(name = %character.profile.name, "Scene character selected");
        Ok(character)
    }

    /// Draft a scene from a one-line idea.
    ///
    /// The selected character, if any, is written into the prompt and linked
    /// to the new scene. An identified product is carried over.
    #[instrument(skip(self, idea))]
    pub async fn from_idea(
        &self,
        idea: impl Into<String>,
        video_format: VideoFormat,
        duration: Option<SceneDuration>,
    ) -> EstudioResult<Scene> {
        let (character, product) = {
            let form = lock(&self.form);
            (form.character.clone(), form.product.clone())
        };
        let input = SceneFromIdeaInput {
            idea: idea.into(),
            character: character.as_ref().map(|c| c.profile.clone()),
            video_format,
            duration,
        };
        let draft = self
            .runner
            .run_flow(self.context.executor(), SceneFromIdeaFlow, input)
            .await?;

        let mut scene = Scene::new(draft, duration.unwrap_or_default(), video_format);
        scene.character_id = character.map(|c| c.id);
        scene.product = product;
        lock(&self.form).scene = Some(scene.clone());
        info!(action = %scene.draft.main_action, "Scene drafted");
        Ok(scene)
    }

    /// Write the character's line for the working scene.
    #[instrument(skip(self))]
    pub async fn dialogue(&self, tone: Option<ToneOfVoice>) -> EstudioResult<Scene> {
        let scene = self.scene_or_report()?;
        let character = self.character_or_report()?;
        let input = SceneDialogueInput {
            setting: scene.draft.setting.clone(),
            main_action: scene.draft.main_action.clone(),
            character: character.profile,
            tone,
        };
        let output = self
            .runner
            .run_flow(self.context.executor(), SceneDialogueFlow, input)
            .await?;

        let mut form = lock(&self.form);
        Ok(apply_if_current(FEATURE, &mut form.scene, scene, |scene| {
            scene.draft.dialogue = output.dialogue;
        }))
    }

    /// Identify a product from a photo and attach it to the scene.
    #[instrument(skip_all)]
    pub async fn identify_product(&self, input: ProductFromImageInput) -> EstudioResult<Product> {
        let product = self
            .runner
            .run_flow(self.context.executor(), ProductFromImageFlow, input)
            .await?;
        let mut form = lock(&self.form);
        if let Some(scene) = form.scene.as_mut() {
            scene.product = Some(product.clone());
        }
        form.product = Some(product.clone());
        info!(product = %product.name, "Product identified");
        Ok(product)
    }

    /// Toggle subtitles and on-screen text for the working scene.
    pub fn set_text_display(&self, show_subtitles: bool, show_on_screen_text: bool) {
        if let Some(scene) = lock(&self.form).scene.as_mut() {
            scene.show_subtitles = show_subtitles;
            scene.show_on_screen_text = show_on_screen_text;
        }
    }

    /// Build the final video prompt from the scene, character and product.
    #[instrument(skip_all)]
    pub async fn video_prompt(&self) -> EstudioResult<String> {
        let scene = self.scene_or_report()?;
        let character = self.character_or_report()?;
        let input = VideoPromptInput {
            character: character.profile.clone(),
            scene: scene.draft.clone(),
            product: scene.product.clone(),
            seed: character.seed,
            negative_prompt: character.negative_prompt.clone(),
            video_format: scene.video_format,
            duration: scene.duration,
            show_subtitles: scene.show_subtitles,
            show_on_screen_text: scene.show_on_screen_text,
        };
        let output = self
            .runner
            .run_flow(self.context.executor(), VideoPromptFlow, input)
            .await?;

        let prompt = output.prompt.clone();
        let mut form = lock(&self.form);
        apply_if_current(FEATURE, &mut form.scene, scene, |scene| {
            scene.video_prompt = Some(prompt);
        });
        Ok(output.prompt)
    }

    /// Persist the working scene.
    #[instrument(skip_all)]
    pub fn save(&self) -> EstudioResult<Vec<Scene>> {
        let scene = self.scene_or_report()?;
        let saved = self.runner.report(self.context.gallery().scenes().save(scene))?;
        self.runner.success("Cena salva", "A cena foi salva na galeria.");
        Ok(saved)
    }

    /// Persist the identified product as a standalone gallery entry.
    #[instrument(skip_all)]
    pub fn save_product(&self) -> EstudioResult<StoredProduct> {
        let product = self
            .runner
            .report(lock(&self.form).product.clone().ok_or_else(|| missing("product")))?;
        let stored = StoredProduct::new(product);
        self.runner
            .report(self.context.gallery().products().save(stored.clone()))?;
        self.runner.success(
            "Produto salvo",
            format!("{} foi salvo na galeria.", stored.product.name),
        );
        Ok(stored)
    }

    /// Put a stored scene into the form, joining its character from the
    /// gallery when it is still there.
    ///
    /// An unreadable characters collection is reported and the scene is
    /// loaded without its character.
    pub fn load(&self, scene: Scene) {
        let character = match scene.character_id.as_ref() {
            Some(id) => {
                let found = self.runner.report(self.context.gallery().characters().get(id));
                match found {
                    Ok(Some(character)) => Some(character),
                    Ok(None) => {
                        debug!(%id, "Scene character no longer in the gallery");
                        None
                    }
                    Err(_) => None,
                }
            }
            None => None,
        };
        let mut form = lock(&self.form);
        form.product = scene.product.clone();
        form.character = character;
        form.scene = Some(scene);
    }

    /// Put a stored product into the form.
    pub fn load_product(&self, product: StoredProduct) {
        let mut form = lock(&self.form);
        if let Some(scene) = form.scene.as_mut() {
            scene.product = Some(product.product.clone());
        }
        form.product = Some(product.product);
    }

    /// Empty the form.
    pub fn clear(&self) {
        *lock(&self.form) = SceneForm::default();
    }
}

impl<D: EstudioDriver + 'static> EditorTarget for SceneBuilder<D> {
    fn editor_name(&self) -> &'static str {
        FEATURE
    }

    fn apply(&self, request: &EditorRequest) -> bool {
        match request {
            EditorRequest::LoadScene(scene) => {
                self.load(scene.clone());
                true
            }
            EditorRequest::LoadProduct(product) => {
                self.load_product(product.clone());
                true
            }
            _ => false,
        }
    }
}
