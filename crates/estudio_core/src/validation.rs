//! Field rules shared by every flow schema.
//!
//! Used through `#[validate(custom(function = ...))]` attributes.

use crate::DataUri;
use std::borrow::Cow;
use validator::ValidationError;

/// Validation code for required text that is empty or whitespace.
pub const CODE_BLANK: &str = "blank";
/// Validation code for a malformed inline media reference.
pub const CODE_DATA_URI: &str = "data_uri";

/// Required text must contain something other than whitespace.
///
/// # Examples
///
/// ```
/// use estudio_core::validation::non_blank;
///
/// assert!(non_blank("Moda").is_ok());
/// assert!(non_blank("   ").is_err());
/// ```
pub fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(CODE_BLANK).with_message(Cow::from("must not be empty")));
    }
    Ok(())
}

/// Must be a `data:<mime>;base64,<data>` URI.
pub fn data_uri(value: &str) -> Result<(), ValidationError> {
    value.parse::<DataUri>().map(|_| ()).map_err(|e| {
        ValidationError::new(CODE_DATA_URI).with_message(Cow::from(e.kind.to_string()))
    })
}

/// Must be a data URI or an `http(s)` URL.
pub fn media_reference(value: &str) -> Result<(), ValidationError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        return Ok(());
    }
    data_uri(value)
}
