//! One controller per feature.
//!
//! Controllers own a form (the in-memory state of the feature), run flows
//! through a [`FeatureRunner`](crate::FeatureRunner) and only touch the form
//! after an action succeeds.

mod character;
mod gallery;
mod propaganda;
mod scene;
mod thumbnail;
mod transcriber;

pub use character::{CharacterBuilder, CharacterForm};
pub use gallery::{GalleryBrowser, GalleryItem};
pub use propaganda::{PropagandaForm, PropagandaGenerator};
pub use scene::{SceneBuilder, SceneForm};
pub use thumbnail::{ThumbnailForm, ThumbnailGenerator};
pub use transcriber::{Transcriber, TranscriberForm};

use estudio_error::{EstudioError, SchemaErrorKind, SchemaValidationError};
use estudio_gallery::GalleryEntity;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::warn;

/// Lock a form, recovering from a poisoned lock.
pub(crate) fn lock<T>(form: &Mutex<T>) -> MutexGuard<'_, T> {
    form.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Error for an action that needs a form value that is not there yet.
#[track_caller]
pub(crate) fn missing(field: &str) -> EstudioError {
    SchemaValidationError::new(field, SchemaErrorKind::MissingField).into()
}

/// Apply a generation result to the form entity it was requested for.
///
/// When the form holds another entity (or none) by the time the result
/// arrives, the form is left alone and the result is applied to the
/// snapshot only.
pub(crate) fn apply_if_current<T, F>(
    feature: &'static str,
    slot: &mut Option<T>,
    snapshot: T,
    update: F,
) -> T
where
    T: GalleryEntity,
    F: FnOnce(&mut T),
{
    match slot.as_mut() {
        Some(current) if current.id() == snapshot.id() => {
            update(current);
            current.clone()
        }
        other => {
            warn!(
                feature,
                requested = %snapshot.id(),
                current = ?other.map(|entity| entity.id().to_string()),
                "Form changed while generating, result not applied"
            );
            let mut detached = snapshot;
            update(&mut detached);
            detached
        }
    }
}
