//! Entry point bundling the store, the notifier and the repositories.

use crate::export::{ExportFormat, characters_to_csv, to_json};
use crate::{
    AppState, FileKeyValueStore, GalleryCategory, GalleryEntity, GalleryNotifier,
    GalleryRepository, GallerySubscription, KeyValueStore, MemoryKeyValueStore,
};
use estudio_core::{Character, EntityId, Propaganda, Scene, StoredProduct};
use estudio_error::{EstudioResult, StorageError, StorageErrorKind};
use std::path::PathBuf;
use std::sync::Arc;

/// The local gallery.
#[derive(Debug, Clone)]
pub struct Gallery {
    store: Arc<dyn KeyValueStore>,
    notifier: GalleryNotifier,
}

impl Gallery {
    /// Gallery over an injected store.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            notifier: GalleryNotifier::default(),
        }
    }

    /// Gallery persisted as JSON files in `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> EstudioResult<Self> {
        Ok(Self::new(Arc::new(FileKeyValueStore::new(dir)?)))
    }

    /// Gallery that lives only in memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryKeyValueStore::new()))
    }

    /// Underlying store.
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Change notifier shared by every repository of this gallery.
    pub fn notifier(&self) -> &GalleryNotifier {
        &self.notifier
    }

    /// Listen to changes in one category.
    pub fn subscribe(&self, category: GalleryCategory) -> GallerySubscription {
        self.notifier.subscribe(category)
    }

    /// Repository for any entity type.
    pub fn repository<T: GalleryEntity>(&self) -> GalleryRepository<T> {
        GalleryRepository::new(Arc::clone(&self.store), self.notifier.clone())
    }

    /// Saved characters.
    pub fn characters(&self) -> GalleryRepository<Character> {
        self.repository()
    }

    /// Saved scenes.
    pub fn scenes(&self) -> GalleryRepository<Scene> {
        self.repository()
    }

    /// Saved products.
    pub fn products(&self) -> GalleryRepository<StoredProduct> {
        self.repository()
    }

    /// Saved commercials.
    pub fn propagandas(&self) -> GalleryRepository<Propaganda> {
        self.repository()
    }

    /// App-state aggregate.
    pub fn app_state(&self) -> AppState {
        AppState::new(Arc::clone(&self.store), self.notifier.clone())
    }

    /// Export a whole collection.
    ///
    /// CSV is only available for characters.
    pub fn export_collection(
        &self,
        category: GalleryCategory,
        format: ExportFormat,
    ) -> EstudioResult<String> {
        match (category, format) {
            (GalleryCategory::Characters, ExportFormat::Csv) => {
                characters_to_csv(&self.characters().list()?)
            }
            (_, ExportFormat::Csv) => Err(StorageError::new(StorageErrorKind::Export(format!(
                "CSV export is only available for personagens, not {}",
                category
            )))
            .into()),
            (GalleryCategory::Characters, ExportFormat::Json) => to_json(&self.characters().list()?),
            (GalleryCategory::Scenes, ExportFormat::Json) => to_json(&self.scenes().list()?),
            (GalleryCategory::Products, ExportFormat::Json) => to_json(&self.products().list()?),
            (GalleryCategory::Propagandas, ExportFormat::Json) => {
                to_json(&self.propagandas().list()?)
            }
        }
    }

    /// Export one entity.
    pub fn export_entity(
        &self,
        category: GalleryCategory,
        id: &EntityId,
        format: ExportFormat,
    ) -> EstudioResult<String> {
        let missing = || StorageError::new(StorageErrorKind::NotFound(id.to_string()));
        match (category, format) {
            (GalleryCategory::Characters, ExportFormat::Csv) => {
                let character = self.characters().get(id)?.ok_or_else(missing)?;
                characters_to_csv(std::slice::from_ref(&character))
            }
            (_, ExportFormat::Csv) => Err(StorageError::new(StorageErrorKind::Export(format!(
                "CSV export is only available for personagens, not {}",
                category
            )))
            .into()),
            (GalleryCategory::Characters, ExportFormat::Json) => {
                to_json(&self.characters().get(id)?.ok_or_else(missing)?)
            }
            (GalleryCategory::Scenes, ExportFormat::Json) => {
                to_json(&self.scenes().get(id)?.ok_or_else(missing)?)
            }
            (GalleryCategory::Products, ExportFormat::Json) => {
                to_json(&self.products().get(id)?.ok_or_else(missing)?)
            }
            (GalleryCategory::Propagandas, ExportFormat::Json) => {
                to_json(&self.propagandas().get(id)?.ok_or_else(missing)?)
            }
        }
    }
}
