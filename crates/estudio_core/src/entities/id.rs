//! Locally generated entity identifiers.

use serde::{Deserialize, Serialize};

/// Identifier of a gallery entity (a UUID v4 string).
///
/// # Examples
///
/// ```
/// use estudio_core::EntityId;
///
/// let a = EntityId::new();
/// let b = EntityId::new();
/// assert_ne!(a, b);
/// assert_eq!(EntityId::from("abc").as_str(), "abc");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    schemars::JsonSchema,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
