//! Output types from model responses.

use crate::DataUri;
use serde::{Deserialize, Serialize};

/// One part of a model response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Output {
    /// Plain text output.
    Text(String),

    /// Generated image output.
    Image {
        /// MIME type of the image
        mime: Option<String>,
        /// Binary image data
        data: Vec<u8>,
    },

    /// Generated audio output.
    Audio {
        /// MIME type of the audio
        mime: Option<String>,
        /// Binary audio data
        data: Vec<u8>,
    },

    /// Structured JSON output.
    Json(serde_json::Value),
}

impl Output {
    /// Re-encode an image part as a data URI.
    ///
    /// # Examples
    ///
    /// ```
    /// use estudio_core::Output;
    ///
    /// let image = Output::Image { mime: None, data: vec![1, 2, 3] };
    /// let uri = image.to_data_uri().unwrap();
    /// assert_eq!(uri.mime(), "image/png");
    /// ```
    pub fn to_data_uri(&self) -> Option<DataUri> {
        match self {
            Output::Image { mime, data } => Some(DataUri::from_bytes(
                mime.clone().unwrap_or_else(|| "image/png".to_string()),
                data,
            )),
            _ => None,
        }
    }
}
