//! Digital influencer characters.

use crate::validation::non_blank;
use crate::{EntityId, Gender};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// The descriptive part of a character, as produced by the model.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    JsonSchema,
    Validate,
    derive_setters::Setters,
)]
#[serde(rename_all = "camelCase")]
#[setters(prefix = "with_", into)]
pub struct CharacterProfile {
    /// Nome artístico do personagem
    #[validate(custom(function = "non_blank"))]
    pub name: String,
    /// Nicho de conteúdo (ex.: Moda, Games, Culinária)
    #[validate(custom(function = "non_blank"))]
    pub niche: String,
    /// Personalidade e jeito de se comunicar
    #[validate(custom(function = "non_blank"))]
    pub personality: String,
    /// Aparência física detalhada, útil para gerar imagens consistentes
    #[validate(custom(function = "non_blank"))]
    pub physical_appearance: String,
    /// Estilo de roupa característico
    #[validate(custom(function = "non_blank"))]
    pub clothing_style: String,
    /// Biografia curta
    #[validate(custom(function = "non_blank"))]
    pub biography: String,
    /// Traços únicos que tornam o personagem memorável
    #[validate(custom(function = "non_blank"))]
    pub unique_traits: String,
    /// Sotaque ou regionalismo da fala
    #[validate(custom(function = "non_blank"))]
    pub accent: String,
    /// Idade aparente (ex.: "28 anos")
    #[validate(custom(function = "non_blank"))]
    pub age: String,
    /// Gênero
    pub gender: Gender,
}

/// A saved character.
///
/// `seed` is generated on the client and fed into video prompts so that the
/// same character renders consistently across scenes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    /// Gallery identifier
    pub id: EntityId,
    /// Descriptive fields
    #[serde(flatten)]
    pub profile: CharacterProfile,
    /// Visual consistency seed
    pub seed: u32,
    /// Things the video model must avoid for this character
    #[serde(default)]
    pub negative_prompt: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Character {
    /// Wrap a profile into a new gallery entity.
    pub fn new(profile: CharacterProfile, seed: u32) -> Self {
        Self {
            id: EntityId::new(),
            profile,
            seed,
            negative_prompt: None,
            created_at: Utc::now(),
        }
    }
}
