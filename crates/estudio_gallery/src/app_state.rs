//! The app-state aggregate: commercials plus user settings.

use crate::repository::{read_object, write_object};
use crate::{APP_STATE_KEY, GalleryNotifier, GalleryRepository, KeyValueStore};
use estudio_core::{Propaganda, Theme};
use estudio_error::{EstudioResult, StorageError, StorageErrorKind};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

const THEME_FIELD: &str = "theme";

/// View over the `estudio-app-state` aggregate.
#[derive(Debug, Clone)]
pub struct AppState {
    store: Arc<dyn KeyValueStore>,
    notifier: GalleryNotifier,
}

impl AppState {
    /// Create a view over a store.
    pub fn new(store: Arc<dyn KeyValueStore>, notifier: GalleryNotifier) -> Self {
        Self { store, notifier }
    }

    /// Saved commercials.
    pub fn propagandas(&self) -> GalleryRepository<Propaganda> {
        GalleryRepository::new(Arc::clone(&self.store), self.notifier.clone())
    }

    /// Current theme. Unset means [`Theme::System`].
    pub fn theme(&self) -> EstudioResult<Theme> {
        match read_object(self.store.as_ref(), APP_STATE_KEY)?.remove(THEME_FIELD) {
            None | Some(Value::Null) => Ok(Theme::default()),
            Some(value) => Ok(serde_json::from_value(value).map_err(|e| {
                StorageError::new(StorageErrorKind::MalformedBucket {
                    key: APP_STATE_KEY.to_string(),
                    message: e.to_string(),
                })
            })?),
        }
    }

    /// Persist the theme, keeping every other field of the aggregate.
    pub fn set_theme(&self, theme: Theme) -> EstudioResult<()> {
        let mut object = read_object(self.store.as_ref(), APP_STATE_KEY)?;
        let value = serde_json::to_value(theme)
            .map_err(|e| StorageError::new(StorageErrorKind::Serialization(e.to_string())))?;
        object.insert(THEME_FIELD.to_string(), value);
        write_object(self.store.as_ref(), APP_STATE_KEY, object)?;
        info!(%theme, "Theme updated");
        Ok(())
    }
}
