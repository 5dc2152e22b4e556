//! Commercials ("propagandas").

use crate::validation::non_blank;
use crate::{CommercialDuration, EntityId, ToneOfVoice};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A commercial script produced by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CommercialScript {
    /// Título do comercial
    #[validate(custom(function = "non_blank"))]
    pub title: String,
    /// Gancho dos primeiros segundos
    #[validate(custom(function = "non_blank"))]
    pub hook: String,
    /// Roteiro completo com indicações de cena e locução
    #[validate(custom(function = "non_blank"))]
    pub script: String,
    /// Chamada para ação final
    #[validate(custom(function = "non_blank"))]
    pub call_to_action: String,
}

/// A saved commercial.
///
/// Built incrementally: campaign suggestion, narration and script each fill
/// in part of it before it is persisted once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_setters::Setters)]
#[serde(rename_all = "camelCase")]
#[setters(prefix = "with_", into)]
pub struct Propaganda {
    /// Gallery identifier
    #[setters(skip)]
    pub id: EntityId,
    /// Product name
    pub product_name: String,
    /// Product description
    pub product_description: String,
    /// Target audience
    pub target_audience: String,
    /// Main message
    pub main_message: String,
    /// Tone of voice
    pub tone: ToneOfVoice,
    /// Commercial length
    pub duration: CommercialDuration,
    /// Voice-over narration
    #[serde(default)]
    pub narration: String,
    /// Reference image as a data URI
    #[serde(default)]
    pub reference_image: Option<String>,
    /// Generated script
    #[serde(default)]
    pub script: Option<CommercialScript>,
    /// Creation timestamp
    #[setters(skip)]
    pub created_at: DateTime<Utc>,
}

impl Propaganda {
    /// Start a new commercial with empty generated fields.
    pub fn new(
        product_name: impl Into<String>,
        product_description: impl Into<String>,
        tone: ToneOfVoice,
        duration: CommercialDuration,
    ) -> Self {
        Self {
            id: EntityId::new(),
            product_name: product_name.into(),
            product_description: product_description.into(),
            target_audience: String::new(),
            main_message: String::new(),
            tone,
            duration,
            narration: String::new(),
            reference_image: None,
            script: None,
            created_at: Utc::now(),
        }
    }
}
