//! Role types for conversation participants.

use serde::{Deserialize, Serialize};

/// Who authored a message sent to the model.
///
/// # Examples
///
/// ```
/// use estudio_core::Role;
///
/// assert_ne!(Role::User, Role::Model);
/// assert_eq!(format!("{}", Role::System), "System");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum Role {
    /// Instructions that frame every flow
    System,
    /// Rendered prompt parts
    User,
    /// Earlier model turns
    Model,
}
