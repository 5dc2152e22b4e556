//! Character builder.

use super::{apply_if_current, lock, missing};
use crate::context::FeatureContext;
use crate::editor::{EditorRequest, EditorTarget};
use crate::runner::{FeatureRunner, FeatureStatus};
use estudio_core::{Character, CharacterField, CharacterProfile};
use estudio_error::EstudioResult;
use estudio_flows::{
    CharacterFromIdeaFlow, CharacterFromIdeaInput, CharacterFromImageFlow,
    CharacterFromImageInput, CharacterInput, CharacterNegativePromptFlow, CharacterPortraitFlow,
    CharacterPortraitInput, GeneratedImage, RefineCharacterFieldFlow, RefineCharacterFieldInput,
};
use estudio_interface::EstudioDriver;
use std::sync::{Arc, Mutex};
use tracing::{info, instrument};

const FEATURE: &str = "character_builder";

/// Character currently being edited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacterForm {
    /// Working character
    pub character: Option<Character>,
    /// Last generated portrait
    pub portrait: Option<GeneratedImage>,
}

/// Fresh visual consistency seed.
fn new_seed() -> u32 {
    rand::random()
}

fn field_mut(profile: &mut CharacterProfile, field: CharacterField) -> &mut String {
    match field {
        CharacterField::Name => &mut profile.name,
        CharacterField::Niche => &mut profile.niche,
        CharacterField::Personality => &mut profile.personality,
        CharacterField::PhysicalAppearance => &mut profile.physical_appearance,
        CharacterField::ClothingStyle => &mut profile.clothing_style,
        CharacterField::Biography => &mut profile.biography,
        CharacterField::UniqueTraits => &mut profile.unique_traits,
        CharacterField::Accent => &mut profile.accent,
    }
}

/// Creates, refines and saves characters.
#[derive(Debug)]
pub struct CharacterBuilder<D: EstudioDriver> {
    context: FeatureContext<D>,
    runner: FeatureRunner,
    form: Arc<Mutex<CharacterForm>>,
}

impl<D: EstudioDriver> Clone for CharacterBuilder<D> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
            runner: self.runner.clone(),
            form: Arc::clone(&self.form),
        }
    }
}

impl<D: EstudioDriver + 'static> CharacterBuilder<D> {
    /// Create a builder with an empty form.
    pub fn new(context: FeatureContext<D>) -> Self {
        let runner = context.runner(FEATURE);
        Self {
            context,
            runner,
            form: Arc::new(Mutex::new(CharacterForm::default())),
        }
    }

    /// Snapshot of the form.
    pub fn form(&self) -> CharacterForm {
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

    fn replace_character(&self, profile: CharacterProfile) -> Character {
        let character = Character::new(profile, new_seed());
        let mut form = lock(&self.form);
        form.character = Some(character.clone());
        form.portrait = None;
        character
    }

    fn current(&self) -> EstudioResult<Character> {
        lock(&self.form).character.clone().ok_or_else(|| missing("character"))
    }

    fn current_or_report(&self) -> EstudioResult<Character> {
        self.runner.report(self.current())
    }

    /// Generate a character from a photo.
    #[instrument(skip_all)]
    pub async fn from_image(&self, input: CharacterFromImageInput) -> EstudioResult<Character> {
        let profile = self
            .runner
            .run_flow(self.context.executor(), CharacterFromImageFlow, input)
            .await?;
        let character = self.replace_character(profile);
        info!(name = %character.profile.name, "Character generated from photo");
        self.runner
            .success("Personagem criado", format!("{} está pronto.", character.profile.name));
        Ok(character)
    }

    /// Generate a character from a niche and an idea.
    #[instrument(skip_all)]
    pub async fn from_idea(&self, input: CharacterFromIdeaInput) -> EstudioResult<Character> {
        let profile = self
            .runner
            .run_flow(self.context.executor(), CharacterFromIdeaFlow, input)
            .await?;
        let character = self.replace_character(profile);
        info!(name = %character.profile.name, "Character generated from idea");
        self.runner
            .success("Personagem criado", format!("{} está pronto.", character.profile.name));
        Ok(character)
    }

    /// Rewrite one field of the working character.
    #[instrument(skip(self, instruction))]
    pub async fn refine_field(
        &self,
        field: CharacterField,
        instruction: Option<String>,
    ) -> EstudioResult<Character> {
        let current = self.current_or_report()?;
        let input = RefineCharacterFieldInput {
            character: current.profile.clone(),
            field,
            instruction,
        };
        let refined = self
            .runner
            .run_flow(self.context.executor(), RefineCharacterFieldFlow, input)
            .await?;

        let mut form = lock(&self.form);
        Ok(apply_if_current(FEATURE, &mut form.character, current, |character| {
            *field_mut(&mut character.profile, field) = refined.value;
        }))
    }

    /// Generate the negative prompt for the working character.
    #[instrument(skip_all)]
    pub async fn negative_prompt(&self) -> EstudioResult<String> {
        let current = self.current_or_report()?;
        let input = CharacterInput {
            character: current.profile.clone(),
        };
        let output = self
            .runner
            .run_flow(self.context.executor(), CharacterNegativePromptFlow, input)
            .await?;

        let negative_prompt = output.negative_prompt.clone();
        let mut form = lock(&self.form);
        apply_if_current(FEATURE, &mut form.character, current, |character| {
            character.negative_prompt = Some(negative_prompt);
        });
        Ok(output.negative_prompt)
    }

    /// Render a portrait of the working character.
    #[instrument(skip(self))]
    pub async fn portrait(&self, style: Option<String>) -> EstudioResult<GeneratedImage> {
        let current = self.current_or_report()?;
        let input = CharacterPortraitInput {
            character: current.profile,
            style,
        };
        let image = self
            .runner
            .run_flow(self.context.executor(), CharacterPortraitFlow, input)
            .await?;
        lock(&self.form).portrait = Some(image.clone());
        Ok(image)
    }

    /// Persist the working character.
    #[instrument(skip_all)]
    pub fn save(&self) -> EstudioResult<Vec<Character>> {
        let character = self.current_or_report()?;
        let name = character.profile.name.clone();
        let saved = self
            .runner
            .report(self.context.gallery().characters().save(character))?;
        self.runner
            .success("Personagem salvo", format!("{} foi salvo na galeria.", name));
        Ok(saved)
    }

    /// Put a stored character into the form.
    pub fn load(&self, character: Character) {
        let mut form = lock(&self.form);
        form.character = Some(character);
        form.portrait = None;
    }

    /// Empty the form.
    pub fn clear(&self) {
        *lock(&self.form) = CharacterForm::default();
    }
}

impl<D: EstudioDriver + 'static> EditorTarget for CharacterBuilder<D> {
    fn editor_name(&self) -> &'static str {
        FEATURE
    }

    fn apply(&self, request: &EditorRequest) -> bool {
        match request {
            EditorRequest::LoadCharacter(character) => {
                self.load(character.clone());
                true
            }
            _ => false,
        }
    }
}
