//! Gemini `generateContent` REST data transfer objects.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Inline base64 media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// MIME type
    mime_type: String,
    /// Base64 payload
    data: String,
}

impl InlineData {
    /// Create an inline media part.
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }
}

/// Media referenced by URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    /// MIME type, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    mime_type: Option<String>,
    /// Location of the file
    file_uri: String,
}

impl FileData {
    /// Create a URI media part.
    pub fn new(mime_type: Option<String>, file_uri: impl Into<String>) -> Self {
        Self {
            mime_type,
            file_uri: file_uri.into(),
        }
    }
}

/// One part of a content block. Exactly one payload field is set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Text payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    /// Inline media payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
    /// URI media payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_data: Option<FileData>,
    /// Marks model reasoning parts, which are not part of the answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thought: Option<bool>,
}

impl Part {
    /// A text part.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// An inline media part.
    pub fn from_inline(data: InlineData) -> Self {
        Self {
            inline_data: Some(data),
            ..Default::default()
        }
    }

    /// A URI media part.
    pub fn from_file(data: FileData) -> Self {
        Self {
            file_data: Some(data),
            ..Default::default()
        }
    }

    /// Whether this is a reasoning part.
    pub fn is_thought(&self) -> bool {
        self.thought.unwrap_or(false)
    }
}

/// A block of parts authored by one role.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// "user" or "model"; omitted for system instructions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    /// Ordered parts
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    /// Create a content block.
    pub fn new(role: Option<String>, parts: Vec<Part>) -> Self {
        Self { role, parts }
    }
}

/// Sampling and output shape settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Builder, Getters)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into, strip_option), default)]
pub struct GenerationConfig {
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Output token cap
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    /// `application/json` for JSON mode
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    /// `["TEXT", "IMAGE"]` for image generation
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<String>>,
}

/// One safety category threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct SafetySetting {
    /// Harm category
    category: String,
    /// Blocking threshold
    threshold: String,
}

impl SafetySetting {
    /// Create a safety setting.
    pub fn new(category: impl Into<String>, threshold: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            threshold: threshold.into(),
        }
    }
}

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into))]
pub struct GeminiRequest {
    /// Conversation turns
    contents: Vec<Content>,
    /// System instruction
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    /// Generation settings
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
    /// Safety thresholds
    #[builder(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    safety_settings: Vec<SafetySetting>,
}

impl GeminiRequest {
    /// Creates a new builder for `GeminiRequest`.
    pub fn builder() -> GeminiRequestBuilder {
        GeminiRequestBuilder::default()
    }
}

/// One response candidate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content
    #[serde(default)]
    content: Option<Content>,
    /// Provider finish reason (e.g. "STOP", "SAFETY")
    #[serde(default)]
    finish_reason: Option<String>,
}

/// Feedback on the prompt itself.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Set when the prompt was blocked
    #[serde(default)]
    block_reason: Option<String>,
}

/// Response body of `generateContent`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    /// Response candidates
    #[serde(default)]
    candidates: Vec<Candidate>,
    /// Prompt feedback
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}
