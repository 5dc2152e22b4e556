//! Input types for model requests.

use crate::MediaSource;
use serde::{Deserialize, Serialize};

/// One part of a prompt sent to the model.
///
/// Rendered templates produce an ordered list of these: text segments
/// interleaved with the inline media the template refers to.
///
/// # Examples
///
/// ```
/// use estudio_core::{Input, MediaSource};
///
/// let text = Input::Text("Descreva a foto.".to_string());
/// let image = Input::Image {
///     mime: Some("image/png".to_string()),
///     source: MediaSource::Base64("iVBORw0KGgo=".to_string()),
/// };
/// assert!(text.is_text());
/// assert!(!image.is_text());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Input {
    /// Plain text input.
    Text(String),

    /// Image input (PNG, JPEG, WebP, etc.).
    Image {
        /// MIME type, e.g., "image/png" or "image/jpeg"
        mime: Option<String>,
        /// Media source
        source: MediaSource,
    },

    /// Audio input (MP3, WAV, OGG, etc.).
    Audio {
        /// MIME type, e.g., "audio/mpeg" or "audio/wav"
        mime: Option<String>,
        /// Media source
        source: MediaSource,
    },

    /// Video input (MP4, WebM, etc.).
    Video {
        /// MIME type, e.g., "video/mp4"
        mime: Option<String>,
        /// Media source
        source: MediaSource,
    },

    /// Any other inline file.
    Document {
        /// MIME type, e.g., "application/pdf"
        mime: Option<String>,
        /// Media source
        source: MediaSource,
        /// Optional filename for context
        filename: Option<String>,
    },
}

impl Input {
    /// Whether this part is plain text.
    pub fn is_text(&self) -> bool {
        matches!(self, Input::Text(_))
    }

    /// Text content, if this is a text part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Input::Text(text) => Some(text),
            _ => None,
        }
    }
}
