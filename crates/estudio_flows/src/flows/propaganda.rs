//! Commercial flows: campaign suggestion, narration and the size-capped
//! script.

use crate::executor::{Flow, FlowConfig};
use estudio_core::validation::{data_uri, non_blank};
use estudio_core::{CommercialDuration, CommercialScript, ToneOfVoice};
use estudio_error::{EstudioResult, JsonError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use validator::Validate;

/// Maximum length of a commercial script, in characters.
pub const SCRIPT_CHAR_BUDGET: usize = 1000;

/// Appended to a script cut down to [`SCRIPT_CHAR_BUDGET`].
pub const TRUNCATION_MARKER: &str = " […]";

/// Input of [`CampaignSuggestionFlow`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSuggestionInput {
    /// Nome do produto
    #[validate(custom(function = "non_blank"))]
    pub product_name: String,
    /// Descrição do produto
    #[validate(custom(function = "non_blank"))]
    pub product_description: String,
    /// Público-alvo, se já definido
    #[serde(default)]
    pub target_audience: Option<String>,
}

/// Suggested positioning for a commercial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSuggestion {
    /// Público-alvo sugerido
    #[validate(custom(function = "non_blank"))]
    pub target_audience: String,
    /// Mensagem principal do comercial
    #[validate(custom(function = "non_blank"))]
    pub main_message: String,
    /// Tom de voz recomendado
    pub tone: ToneOfVoice,
}

/// Suggests audience, message and tone for a product.
#[derive(Debug, Clone, Copy, Default)]
pub struct CampaignSuggestionFlow;

const CAMPAIGN_SUGGESTION: &str = "Você é um publicitário experiente. Para o produto \
{{productName}} ({{productDescription}}), sugira o público-alvo, a mensagem principal de um \
comercial curto e o tom de voz mais adequado.\
{{#if targetAudience}} O público-alvo já definido é {{targetAudience}}; refine-o.{{/if}}";

impl Flow for CampaignSuggestionFlow {
    type Input = CampaignSuggestionInput;
    type Output = CampaignSuggestion;

    fn name(&self) -> &'static str {
        "campaign_suggestion"
    }

    fn template(&self) -> &'static str {
        CAMPAIGN_SUGGESTION
    }
}

/// Input of [`CommercialNarrationFlow`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CommercialNarrationInput {
    /// Nome do produto
    #[validate(custom(function = "non_blank"))]
    pub product_name: String,
    /// Mensagem principal
    #[validate(custom(function = "non_blank"))]
    pub main_message: String,
    /// Público-alvo
    #[validate(custom(function = "non_blank"))]
    pub target_audience: String,
    /// Tom de voz
    pub tone: ToneOfVoice,
    /// Duração do comercial
    pub duration: CommercialDuration,
}

/// Voice-over text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Narration {
    /// Texto da locução
    #[validate(custom(function = "non_blank"))]
    pub narration: String,
}

/// Writes the voice-over for a commercial.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommercialNarrationFlow;

const COMMERCIAL_NARRATION: &str = "Escreva a locução de um comercial de {{durationSeconds}} \
segundos para {{productName}}.
Público-alvo: {{targetAudience}}
Mensagem principal: {{mainMessage}}
Tom de voz: {{tone}}
A locução deve caber no tempo ao ser lida em ritmo natural.";

impl Flow for CommercialNarrationFlow {
    type Input = CommercialNarrationInput;
    type Output = Narration;

    fn name(&self) -> &'static str {
        "commercial_narration"
    }

    fn template(&self) -> &'static str {
        COMMERCIAL_NARRATION
    }

    fn prompt_context(&self, input: &Self::Input) -> EstudioResult<Value> {
        with_duration_seconds(input, input.duration)
    }
}

/// Input of [`CommercialScriptFlow`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CommercialScriptInput {
    /// Nome do produto
    #[validate(custom(function = "non_blank"))]
    pub product_name: String,
    /// Descrição do produto
    #[validate(custom(function = "non_blank"))]
    pub product_description: String,
    /// Público-alvo
    #[validate(custom(function = "non_blank"))]
    pub target_audience: String,
    /// Mensagem principal
    #[validate(custom(function = "non_blank"))]
    pub main_message: String,
    /// Tom de voz
    pub tone: ToneOfVoice,
    /// Duração do comercial
    pub duration: CommercialDuration,
    /// Locução já escrita
    #[serde(default)]
    pub narration: Option<String>,
    /// Imagem de referência como data URI
    #[serde(default)]
    #[validate(custom(function = "data_uri"))]
    pub reference_image_data_uri: Option<String>,
}

/// Writes a complete commercial script, capped at [`SCRIPT_CHAR_BUDGET`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CommercialScriptFlow;

const COMMERCIAL_SCRIPT: &str = "Escreva o roteiro de um comercial de {{durationSeconds}} \
segundos.
Produto: {{productName}}: {{productDescription}}
Público-alvo: {{targetAudience}}
Mensagem principal: {{mainMessage}}
Tom de voz: {{tone}}\
{{#if narration}}
Use esta locução: {{narration}}{{/if}}\
{{#if referenceImageDataUri}}
Imagem de referência do produto:
{{media referenceImageDataUri}}{{/if}}
Inclua título, gancho inicial, roteiro com indicações de cena e chamada para ação. \
O roteiro deve ter no máximo 1000 caracteres.";

impl Flow for CommercialScriptFlow {
    type Input = CommercialScriptInput;
    type Output = CommercialScript;

    fn name(&self) -> &'static str {
        "commercial_script"
    }

    fn template(&self) -> &'static str {
        COMMERCIAL_SCRIPT
    }

    fn config(&self) -> FlowConfig {
        FlowConfig::json().with_max_tokens(2048)
    }

    fn prompt_context(&self, input: &Self::Input) -> EstudioResult<Value> {
        with_duration_seconds(input, input.duration)
    }

    fn repair(&self, mut output: CommercialScript) -> CommercialScript {
        let original = output.script.chars().count();
        if original > SCRIPT_CHAR_BUDGET {
            output.script = truncate_script(&output.script);
            warn!(
                flow = self.name(),
                original,
                budget = SCRIPT_CHAR_BUDGET,
                "Script over budget, truncated"
            );
        }
        output
    }
}

/// Cut a script to [`SCRIPT_CHAR_BUDGET`] characters, marker included.
///
/// Scripts within budget are returned unchanged.
///
/// # Examples
///
/// ```
/// use estudio_flows::{SCRIPT_CHAR_BUDGET, TRUNCATION_MARKER, truncate_script};
///
/// assert_eq!(truncate_script("curto"), "curto");
///
/// let long = "é".repeat(SCRIPT_CHAR_BUDGET + 1);
/// let cut = truncate_script(&long);
/// assert_eq!(cut.chars().count(), SCRIPT_CHAR_BUDGET);
/// assert!(cut.ends_with(TRUNCATION_MARKER));
/// ```
pub fn truncate_script(script: &str) -> String {
    if script.chars().count() <= SCRIPT_CHAR_BUDGET {
        return script.to_string();
    }
    let keep = SCRIPT_CHAR_BUDGET - TRUNCATION_MARKER.chars().count();
    let mut cut: String = script.chars().take(keep).collect();
    cut.push_str(TRUNCATION_MARKER);
    cut
}

fn with_duration_seconds<T: Serialize>(input: &T, duration: CommercialDuration) -> EstudioResult<Value> {
    let mut context = serde_json::to_value(input).map_err(|e| JsonError::new(e.to_string()))?;
    if let Some(map) = context.as_object_mut() {
        map.insert("durationSeconds".to_string(), Value::from(duration.seconds()));
    }
    Ok(context)
}
