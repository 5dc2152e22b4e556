//! Video scenes.

use crate::validation::non_blank;
use crate::{EntityId, Product, SceneDuration, VideoFormat};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// The descriptive part of a scene, as produced by the model.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
    Validate,
    derive_setters::Setters,
)]
#[serde(rename_all = "camelCase")]
#[setters(prefix = "with_", into)]
pub struct SceneDraft {
    /// Cenário: lugar, iluminação e clima
    #[validate(custom(function = "non_blank"))]
    pub setting: String,
    /// Ação principal do personagem
    #[validate(custom(function = "non_blank"))]
    pub main_action: String,
    /// Fala do personagem, em português do Brasil
    pub dialogue: String,
    /// Enquadramento e movimento de câmera
    #[validate(custom(function = "non_blank"))]
    pub camera_angle: String,
}

/// A saved scene.
///
/// `character_id` is a loose reference: deleting the character does not
/// touch scenes that mention it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Gallery identifier
    pub id: EntityId,
    /// Descriptive fields
    #[serde(flatten)]
    pub draft: SceneDraft,
    /// Clip length
    pub duration: SceneDuration,
    /// Aspect ratio
    pub video_format: VideoFormat,
    /// Burn subtitles into the video
    #[serde(default)]
    pub show_subtitles: bool,
    /// Show on-screen text overlays
    #[serde(default)]
    pub show_on_screen_text: bool,
    /// Embedded product, if the scene advertises one
    #[serde(default)]
    pub product: Option<Product>,
    /// Character appearing in the scene
    #[serde(default)]
    pub character_id: Option<EntityId>,
    /// Final prompt for the video model
    #[serde(default)]
    pub video_prompt: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Scene {
    /// Wrap a draft into a new gallery entity.
    pub fn new(draft: SceneDraft, duration: SceneDuration, video_format: VideoFormat) -> Self {
        Self {
            id: EntityId::new(),
            draft,
            duration,
            video_format,
            show_subtitles: false,
            show_on_screen_text: false,
            product: None,
            character_id: None,
            video_prompt: None,
            created_at: Utc::now(),
        }
    }
}
