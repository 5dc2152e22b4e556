//! Scene flows: drafting a scene, writing dialogue and assembling the final
//! video prompt.

use crate::executor::{Flow, FlowConfig};
use estudio_core::validation::non_blank;
use estudio_core::{CharacterProfile, Product, SceneDraft, SceneDuration, ToneOfVoice, VideoFormat};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Input of [`SceneFromIdeaFlow`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SceneFromIdeaInput {
    /// Ideia da cena
    #[validate(custom(function = "non_blank"))]
    pub idea: String,
    /// Personagem que protagoniza a cena
    #[serde(default)]
    #[validate(nested)]
    pub character: Option<CharacterProfile>,
    /// Formato do vídeo
    pub video_format: VideoFormat,
    /// Duração da cena
    #[serde(default)]
    pub duration: Option<SceneDuration>,
}

/// Turns an idea into a scene draft.
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneFromIdeaFlow;

const SCENE_FROM_IDEA: &str = "Transforme a ideia abaixo em uma cena curta para vídeo vertical \
ou horizontal gerado por IA.
Ideia: {{idea}}
Formato: {{videoFormat}}\
{{#if duration}}
Duração: {{duration}}{{/if}}\
{{#if character}}
Protagonista: {{character.name}}, {{character.physicalAppearance}}. \
Jeito de falar: {{character.personality}}, sotaque {{character.accent}}.{{/if}}
Descreva o cenário, a ação principal, a fala (curta o bastante para a duração) e o \
enquadramento de câmera.";

impl Flow for SceneFromIdeaFlow {
    type Input = SceneFromIdeaInput;
    type Output = SceneDraft;

    fn name(&self) -> &'static str {
        "scene_from_idea"
    }

    fn template(&self) -> &'static str {
        SCENE_FROM_IDEA
    }
}

/// Input of [`SceneDialogueFlow`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SceneDialogueInput {
    /// Cenário
    #[validate(custom(function = "non_blank"))]
    pub setting: String,
    /// Ação principal
    #[validate(custom(function = "non_blank"))]
    pub main_action: String,
    /// Personagem que fala
    #[validate(nested)]
    pub character: CharacterProfile,
    /// Tom da fala
    #[serde(default)]
    pub tone: Option<ToneOfVoice>,
}

/// A line of dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SceneDialogue {
    /// Fala do personagem
    #[validate(custom(function = "non_blank"))]
    pub dialogue: String,
}

/// Writes what the character says in a scene.
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneDialogueFlow;

const SCENE_DIALOGUE: &str = "Escreva a fala de {{character.name}} para esta cena.
Cenário: {{setting}}
Ação: {{mainAction}}
Personalidade: {{character.personality}}
Sotaque: {{character.accent}}\
{{#if tone}}
Tom: {{tone}}{{/if}}
A fala deve soar natural, em português do Brasil, e caber em poucos segundos.";

impl Flow for SceneDialogueFlow {
    type Input = SceneDialogueInput;
    type Output = SceneDialogue;

    fn name(&self) -> &'static str {
        "scene_dialogue"
    }

    fn template(&self) -> &'static str {
        SCENE_DIALOGUE
    }
}

/// Input of [`VideoPromptFlow`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VideoPromptInput {
    /// Personagem
    #[validate(nested)]
    pub character: CharacterProfile,
    /// Cena
    #[validate(nested)]
    pub scene: SceneDraft,
    /// Produto exibido na cena
    #[serde(default)]
    #[validate(nested)]
    pub product: Option<Product>,
    /// Semente de consistência visual do personagem
    pub seed: u32,
    /// Elementos a evitar
    #[serde(default)]
    pub negative_prompt: Option<String>,
    /// Formato do vídeo
    #[serde(default)]
    pub video_format: VideoFormat,
    /// Duração
    #[serde(default)]
    pub duration: SceneDuration,
    /// Exibir legendas da fala
    #[serde(default)]
    pub show_subtitles: bool,
    /// Exibir textos na tela
    #[serde(default)]
    pub show_on_screen_text: bool,
}

/// The final prompt for a video model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VideoPrompt {
    /// Prompt completo para o gerador de vídeo
    #[validate(custom(function = "non_blank"))]
    pub prompt: String,
}

/// Assembles a detailed video-generation prompt from a character and a scene.
#[derive(Debug, Clone, Copy, Default)]
pub struct VideoPromptFlow;

const VIDEO_PROMPT: &str = "Monte um prompt detalhado para um gerador de vídeo por IA.
Personagem: {{character.name}}, {{character.age}}, {{character.gender}}. \
Aparência: {{character.physicalAppearance}}. Roupa: {{character.clothingStyle}}.
Cenário: {{scene.setting}}
Ação: {{scene.mainAction}}
Câmera: {{scene.cameraAngle}}\
{{#if scene.dialogue}}
Fala (em português do Brasil, sotaque {{character.accent}}): \"{{scene.dialogue}}\"{{/if}}\
{{#if product}}
Produto em destaque: {{product.name}} da marca {{product.brand}}. {{product.description}}{{/if}}
Formato: {{videoFormat}}. Duração: {{duration}}. Seed: {{seed}}.\
{{#if showSubtitles}}
Inclua legendas da fala.{{/if}}\
{{#if showOnScreenText}}
Inclua textos curtos na tela.{{/if}}\
{{#if negativePrompt}}
Evite: {{negativePrompt}}{{/if}}";

impl Flow for VideoPromptFlow {
    type Input = VideoPromptInput;
    type Output = VideoPrompt;

    fn name(&self) -> &'static str {
        "video_prompt"
    }

    fn template(&self) -> &'static str {
        VIDEO_PROMPT
    }

    fn config(&self) -> FlowConfig {
        FlowConfig::json().with_temperature(0.6)
    }
}
