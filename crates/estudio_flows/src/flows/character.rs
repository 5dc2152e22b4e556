//! Character flows: creation from a photo or an idea, field refinement,
//! negative prompts and portraits.

use super::GeneratedImage;
use crate::executor::{Flow, FlowConfig};
use estudio_core::validation::{data_uri, non_blank};
use estudio_core::{CharacterField, CharacterProfile, Gender};
use estudio_error::{EstudioResult, JsonError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// Input of [`CharacterFromImageFlow`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CharacterFromImageInput {
    /// Foto de referência como data URI
    #[validate(custom(function = "data_uri"))]
    pub photo_data_uri: String,
    /// Nicho desejado
    #[serde(default)]
    pub niche: Option<String>,
    /// Sugestão de nome
    #[serde(default)]
    pub name_hint: Option<String>,
}

/// Builds a full character profile from a photo.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharacterFromImageFlow;

const CHARACTER_FROM_IMAGE: &str = "Analise a foto a seguir e crie um influenciador digital \
inspirado nela.
{{media photoDataUri}}
Descreva a aparência física com riqueza de detalhes (cabelo, olhos, tom de pele, \
traços marcantes) para que o personagem possa ser recriado em vídeos. Invente nome, \
personalidade, biografia, estilo de roupa, traços únicos e sotaque coerentes com a imagem.\
{{#if niche}} O personagem deve criar conteúdo sobre {{niche}}.{{/if}}\
{{#if nameHint}} Use o nome {{nameHint}} ou uma variação dele.{{/if}}";

impl Flow for CharacterFromImageFlow {
    type Input = CharacterFromImageInput;
    type Output = CharacterProfile;

    fn name(&self) -> &'static str {
        "character_from_image"
    }

    fn template(&self) -> &'static str {
        CHARACTER_FROM_IMAGE
    }

    fn config(&self) -> FlowConfig {
        FlowConfig::json().relaxed()
    }
}

/// Input of [`CharacterFromIdeaFlow`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CharacterFromIdeaInput {
    /// Nicho de conteúdo
    #[validate(custom(function = "non_blank"))]
    pub niche: String,
    /// Ideia livre do usuário
    #[serde(default)]
    pub idea: Option<String>,
    /// Gênero desejado
    #[serde(default)]
    pub gender: Option<Gender>,
    /// Faixa etária (ex.: "20 a 30 anos")
    #[serde(default)]
    pub age_range: Option<String>,
}

/// Invents a character from a niche and an optional idea.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharacterFromIdeaFlow;

const CHARACTER_FROM_IDEA: &str = "Crie um influenciador digital brasileiro original para o nicho \
de {{niche}}.\
{{#if idea}} Ideia do criador: {{idea}}.{{/if}}\
{{#if gender}} Gênero: {{gender}}.{{/if}}\
{{#if ageRange}} Faixa etária: {{ageRange}}.{{/if}} \
O personagem precisa ser memorável, com personalidade marcante e uma aparência física \
descrita em detalhes suficientes para gerar imagens e vídeos consistentes.";

impl Flow for CharacterFromIdeaFlow {
    type Input = CharacterFromIdeaInput;
    type Output = CharacterProfile;

    fn name(&self) -> &'static str {
        "character_from_idea"
    }

    fn template(&self) -> &'static str {
        CHARACTER_FROM_IDEA
    }

    fn config(&self) -> FlowConfig {
        FlowConfig::json().with_temperature(1.0)
    }
}

/// Input of [`RefineCharacterFieldFlow`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefineCharacterFieldInput {
    /// Personagem atual
    #[validate(nested)]
    pub character: CharacterProfile,
    /// Campo a reescrever
    pub field: CharacterField,
    /// Orientação do usuário para a nova versão
    #[serde(default)]
    pub instruction: Option<String>,
}

/// New text for one character field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefinedField {
    /// Novo texto do campo
    #[validate(custom(function = "non_blank"))]
    pub value: String,
}

/// Rewrites a single field of a character, keeping the rest consistent.
#[derive(Debug, Clone, Copy, Default)]
pub struct RefineCharacterFieldFlow;

const REFINE_CHARACTER_FIELD: &str = "Este é o personagem {{character.name}}, criador de conteúdo \
de {{character.niche}}.
Personalidade: {{character.personality}}
Aparência física: {{character.physicalAppearance}}
Estilo de roupa: {{character.clothingStyle}}
Biografia: {{character.biography}}
Traços únicos: {{character.uniqueTraits}}
Sotaque: {{character.accent}}

Reescreva apenas o campo \"{{fieldLabel}}\" (valor atual: {{currentValue}}) mantendo \
coerência com o restante do perfil.\
{{#if instruction}} Orientação do criador: {{instruction}}.{{/if}}";

impl Flow for RefineCharacterFieldFlow {
    type Input = RefineCharacterFieldInput;
    type Output = RefinedField;

    fn name(&self) -> &'static str {
        "refine_character_field"
    }

    fn template(&self) -> &'static str {
        REFINE_CHARACTER_FIELD
    }

    fn prompt_context(&self, input: &Self::Input) -> EstudioResult<Value> {
        let mut context = serde_json::to_value(input).map_err(|e| JsonError::new(e.to_string()))?;
        let current = context
            .get("character")
            .and_then(|c| c.get(input.field.to_string()))
            .cloned()
            .unwrap_or(Value::Null);
        if let Some(map) = context.as_object_mut() {
            map.insert("fieldLabel".to_string(), Value::from(input.field.label()));
            map.insert("currentValue".to_string(), current);
        }
        Ok(context)
    }
}

/// Input shared by flows that only need a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CharacterInput {
    /// Personagem
    #[validate(nested)]
    pub character: CharacterProfile,
}

/// Things a video model must avoid when rendering a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NegativePrompt {
    /// Lista de elementos a evitar, separados por vírgula
    #[validate(custom(function = "non_blank"))]
    pub negative_prompt: String,
}

/// Derives a negative prompt that keeps a character consistent.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharacterNegativePromptFlow;

const CHARACTER_NEGATIVE_PROMPT: &str = "Para manter o personagem {{character.name}} consistente \
em vídeos gerados por IA, liste o que o modelo de vídeo deve evitar: deformações, \
características que contradizem a aparência ({{character.physicalAppearance}}), \
roupas fora do estilo ({{character.clothingStyle}}) e artefatos comuns. \
Escreva em inglês, como uma lista separada por vírgulas.";

impl Flow for CharacterNegativePromptFlow {
    type Input = CharacterInput;
    type Output = NegativePrompt;

    fn name(&self) -> &'static str {
        "character_negative_prompt"
    }

    fn template(&self) -> &'static str {
        CHARACTER_NEGATIVE_PROMPT
    }

    fn config(&self) -> FlowConfig {
        FlowConfig::json().with_temperature(0.4)
    }
}

/// Input of [`CharacterPortraitFlow`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CharacterPortraitInput {
    /// Personagem
    #[validate(nested)]
    pub character: CharacterProfile,
    /// Estilo visual do retrato
    #[serde(default)]
    pub style: Option<String>,
}

/// Renders a portrait of a character.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharacterPortraitFlow;

const CHARACTER_PORTRAIT: &str = "Gere um retrato fotográfico realista, de frente, do \
influenciador {{character.name}} ({{character.age}}, {{character.gender}}).
Aparência: {{character.physicalAppearance}}
Roupa: {{character.clothingStyle}}\
{{#if style}}
Estilo: {{style}}{{/if}}
Fundo neutro, iluminação suave de estúdio.";

impl Flow for CharacterPortraitFlow {
    type Input = CharacterPortraitInput;
    type Output = GeneratedImage;

    fn name(&self) -> &'static str {
        "character_portrait"
    }

    fn template(&self) -> &'static str {
        CHARACTER_PORTRAIT
    }

    fn config(&self) -> FlowConfig {
        FlowConfig::image().relaxed()
    }
}
