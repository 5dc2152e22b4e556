//! Supporting types for driver capabilities.

use serde::{Deserialize, Serialize};

/// Why generation stopped.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, strum::EnumIter,
)]
pub enum FinishReason {
    /// Model completed naturally.
    Stop,
    /// Hit the output token limit.
    Length,
    /// Content was filtered for safety.
    ContentFilter,
    /// Other/unknown reason.
    Other,
}

impl FinishReason {
    /// Parse a provider finish reason string.
    ///
    /// # Examples
    ///
    /// ```
    /// use estudio_interface::FinishReason;
    ///
    /// assert_eq!(FinishReason::from_provider("SAFETY"), FinishReason::ContentFilter);
    /// assert_eq!(FinishReason::from_provider("STOP"), FinishReason::Stop);
    /// ```
    pub fn from_provider(reason: &str) -> Self {
        match reason {
            "STOP" => FinishReason::Stop,
            "MAX_TOKENS" => FinishReason::Length,
            "SAFETY" | "PROHIBITED_CONTENT" | "BLOCKLIST" | "IMAGE_SAFETY" | "RECITATION" => {
                FinishReason::ContentFilter
            }
            _ => FinishReason::Other,
        }
    }
}

/// Metadata describing a model's capabilities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelMetadata {
    /// Provider name (e.g., "gemini")
    pub provider: &'static str,
    /// Model identifier
    pub model: String,
    /// Maximum input context tokens
    pub max_input_tokens: usize,
    /// Maximum output tokens per request
    pub max_output_tokens: usize,
    /// Supports image inputs
    pub supports_vision: bool,
    /// Supports audio inputs
    pub supports_audio: bool,
    /// Supports video inputs
    pub supports_video: bool,
    /// Can return generated images
    pub supports_image_output: bool,
    /// Supports structured JSON output mode
    pub supports_json_mode: bool,
}
