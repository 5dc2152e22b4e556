//! Request and response types for model generation.

use crate::{Message, Output};
use serde::{Deserialize, Serialize};

/// Shape of the response a flow expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Free text
    #[default]
    Text,
    /// A single JSON document
    Json,
    /// Image output (text parts allowed alongside)
    Image,
}

/// Safety filter policy for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyPolicy {
    /// Provider defaults
    #[default]
    Standard,
    /// Filters lowered so photos of real people are accepted
    Relaxed,
}

/// Generation request (multimodal-safe).
///
/// # Examples
///
/// ```
/// use estudio_core::{GenerateRequest, Input, Message, ResponseFormat};
///
/// let request = GenerateRequest::builder()
///     .messages(vec![Message::user(vec![Input::Text("Olá!".to_string())])])
///     .max_tokens(100u32)
///     .response_format(ResponseFormat::Json)
///     .build()
///     .unwrap();
///
/// assert_eq!(request.messages.len(), 1);
/// assert_eq!(request.max_tokens, Some(100));
/// assert_eq!(request.temperature, None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, derive_builder::Builder)]
#[builder(setter(into), default)]
pub struct GenerateRequest {
    /// The conversation messages to send
    pub messages: Vec<Message>,
    /// Maximum number of tokens to generate
    #[builder(setter(strip_option))]
    pub max_tokens: Option<u32>,
    /// Sampling temperature (0.0 to 2.0)
    #[builder(setter(strip_option))]
    pub temperature: Option<f32>,
    /// Model identifier to use
    #[builder(setter(strip_option))]
    pub model: Option<String>,
    /// Expected response shape
    pub response_format: ResponseFormat,
    /// Safety filter policy
    pub safety: SafetyPolicy,
}

impl GenerateRequest {
    /// Start building a request.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }
}

/// The unified response object.
///
/// # Examples
///
/// ```
/// use estudio_core::{GenerateResponse, Output};
///
/// let response = GenerateResponse {
///     outputs: vec![Output::Text("{\"a\":".into()), Output::Text("1}".into())],
/// };
/// assert_eq!(response.text().as_deref(), Some("{\"a\":1}"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The generated outputs from the model
    pub outputs: Vec<Output>,
}

impl GenerateResponse {
    /// Concatenated text parts, or `None` when there are no non-empty ones.
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .outputs
            .iter()
            .filter_map(|output| match output {
                Output::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect();
        if text.trim().is_empty() { None } else { Some(text) }
    }

    /// First image part.
    pub fn first_image(&self) -> Option<&Output> {
        self.outputs
            .iter()
            .find(|output| matches!(output, Output::Image { .. }))
    }
}
