//! All controllers wired to one context.

use crate::activation::ActivationGate;
use crate::context::FeatureContext;
use crate::controllers::{
    CharacterBuilder, GalleryBrowser, PropagandaGenerator, SceneBuilder, ThumbnailGenerator,
    Transcriber,
};
use crate::editor::spawn_editor_listener;
use estudio_interface::EstudioDriver;
use tokio::task::JoinHandle;
use tracing::debug;

/// The application: every feature controller plus the activation gate.
#[derive(Debug, derive_getters::Getters)]
pub struct EstudioApp<D: EstudioDriver> {
    context: FeatureContext<D>,
    activation: ActivationGate,
    characters: CharacterBuilder<D>,
    scenes: SceneBuilder<D>,
    propagandas: PropagandaGenerator<D>,
    thumbnails: ThumbnailGenerator<D>,
    transcriber: Transcriber<D>,
    gallery: GalleryBrowser,
}

impl<D: EstudioDriver + 'static> EstudioApp<D> {
    /// Build every controller over `context`.
    pub fn new(context: FeatureContext<D>) -> Self {
        let activation = ActivationGate::new(context.gallery().store().clone());
        let gallery = GalleryBrowser::new(
            context.gallery().clone(),
            context.editor().clone(),
            context.notifications().clone(),
        );
        Self {
            activation,
            characters: CharacterBuilder::new(context.clone()),
            scenes: SceneBuilder::new(context.clone()),
            propagandas: PropagandaGenerator::new(context.clone()),
            thumbnails: ThumbnailGenerator::new(context.clone()),
            transcriber: Transcriber::new(context.clone()),
            gallery,
            context,
        }
    }

    /// Subscribe the editors to "open in editor" requests.
    ///
    /// Must be called from within a tokio runtime. Abort the handles to
    /// unmount the editors.
    pub fn mount_editors(&self) -> Vec<JoinHandle<()>> {
        debug!("Mounting editors");
        vec![
            spawn_editor_listener(self.context.editor(), self.characters.clone()),
            spawn_editor_listener(self.context.editor(), self.scenes.clone()),
            spawn_editor_listener(self.context.editor(), self.propagandas.clone()),
        ]
    }

    /// Cancel everything in flight.
    pub fn cancel_all(&self) {
        self.characters.cancel_all();
        self.scenes.cancel_all();
        self.propagandas.cancel_all();
        self.thumbnails.cancel_all();
        self.transcriber.cancel_all();
    }
}
