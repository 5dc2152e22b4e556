//! Media source types and inline data URIs.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use estudio_error::{MediaError, MediaErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where media content is sourced from.
///
/// # Examples
///
/// ```
/// use estudio_core::MediaSource;
///
/// let url = MediaSource::Url("https://example.com/image.png".to_string());
/// let base64 = MediaSource::Base64("iVBORw0KGgo=".to_string());
/// assert_ne!(url, base64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaSource {
    /// URL to fetch the content from
    Url(String),
    /// Base64-encoded content
    Base64(String),
    /// Raw binary data
    Binary(Vec<u8>),
}

/// Broad media family, taken from the MIME type prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum MediaFamily {
    /// `image/*`
    Image,
    /// `audio/*`
    Audio,
    /// `video/*`
    Video,
    /// Anything else
    Other,
}

const DATA_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// An inline `data:<mime>;base64,<data>` reference.
///
/// Uploaded photos, reference images and recordings travel through the flows
/// in this form.
///
/// # Examples
///
/// ```
/// use estudio_core::{DataUri, MediaFamily};
///
/// let uri: DataUri = "data:image/png;base64,iVBORw0KGgo=".parse().unwrap();
/// assert_eq!(uri.mime(), "image/png");
/// assert_eq!(uri.family(), MediaFamily::Image);
/// assert_eq!(uri.to_string(), "data:image/png;base64,iVBORw0KGgo=");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataUri {
    mime: String,
    data: String,
}

impl DataUri {
    /// Encode raw bytes as a data URI.
    pub fn from_bytes(mime: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime: mime.into(),
            data: STANDARD.encode(bytes),
        }
    }

    /// MIME type, e.g. `image/png`.
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Base64 payload.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Media family of the MIME type.
    pub fn family(&self) -> MediaFamily {
        match self.mime.split('/').next() {
            Some("image") => MediaFamily::Image,
            Some("audio") => MediaFamily::Audio,
            Some("video") => MediaFamily::Video,
            _ => MediaFamily::Other,
        }
    }

    /// Decode the payload.
    #[track_caller]
    pub fn decode(&self) -> Result<Vec<u8>, MediaError> {
        STANDARD
            .decode(&self.data)
            .map_err(|e| MediaError::new(MediaErrorKind::Decode(e.to_string())))
    }

    /// Convert into a prompt part of the matching media family.
    pub fn into_input(self) -> crate::Input {
        let mime = Some(self.mime.clone());
        let source = MediaSource::Base64(self.data.clone());
        match self.family() {
            MediaFamily::Image => crate::Input::Image { mime, source },
            MediaFamily::Audio => crate::Input::Audio { mime, source },
            MediaFamily::Video => crate::Input::Video { mime, source },
            MediaFamily::Other => crate::Input::Document {
                mime,
                source,
                filename: None,
            },
        }
    }
}

impl FromStr for DataUri {
    type Err = MediaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .trim()
            .strip_prefix(DATA_PREFIX)
            .ok_or_else(|| MediaError::new(MediaErrorKind::MissingScheme))?;
        let (mime, data) = rest
            .split_once(BASE64_MARKER)
            .ok_or_else(|| MediaError::new(MediaErrorKind::NotBase64))?;

        let valid_mime = mime
            .split_once('/')
            .is_some_and(|(kind, sub)| !kind.is_empty() && !sub.is_empty());
        if !valid_mime {
            return Err(MediaError::new(MediaErrorKind::InvalidMime(mime.to_string())));
        }
        if data.is_empty() {
            return Err(MediaError::new(MediaErrorKind::EmptyPayload));
        }
        if !data
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'='))
        {
            return Err(MediaError::new(MediaErrorKind::Decode(
                "payload contains characters outside the base64 alphabet".to_string(),
            )));
        }

        Ok(Self {
            mime: mime.to_string(),
            data: data.to_string(),
        })
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}{}", DATA_PREFIX, self.mime, BASE64_MARKER, self.data)
    }
}

impl Serialize for DataUri {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DataUri {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_marker() {
        let err = "data:image/png,abcd".parse::<DataUri>().unwrap_err();
        assert_eq!(err.kind, MediaErrorKind::NotBase64);
    }

    #[test]
    fn rejects_plain_url() {
        let err = "https://example.com/a.png".parse::<DataUri>().unwrap_err();
        assert_eq!(err.kind, MediaErrorKind::MissingScheme);
    }

    #[test]
    fn bytes_survive_encoding() {
        let uri = DataUri::from_bytes("audio/mpeg", b"ID3");
        assert_eq!(uri.family(), MediaFamily::Audio);
        assert_eq!(uri.decode().unwrap(), b"ID3");
    }
}
