//! Gallery browser.

use crate::editor::{EditorChannel, EditorRequest};
use crate::notifications::{Notification, NotificationCenter};
use estudio_core::EntityId;
use estudio_error::{EstudioError, EstudioResult, StorageError, StorageErrorKind};
use estudio_gallery::{
    ExportFormat, Gallery, GalleryCategory, GalleryEntity, GalleryRepository, GallerySubscription,
    write_export,
};
use std::path::Path;
use tracing::{info, instrument};

/// One row of a gallery listing.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct GalleryItem {
    category: GalleryCategory,
    id: EntityId,
    title: String,
}

impl GalleryItem {
    fn from_entity<T: GalleryEntity>(entity: &T) -> Self {
        Self {
            category: T::CATEGORY,
            id: entity.id().clone(),
            title: entity.title().to_string(),
        }
    }
}

fn items<T: GalleryEntity>(entities: &[T]) -> Vec<GalleryItem> {
    entities.iter().map(GalleryItem::from_entity).collect()
}

/// Delete `id` and report whether anything was removed.
fn remove<T: GalleryEntity>(
    repository: GalleryRepository<T>,
    id: &EntityId,
) -> EstudioResult<(bool, Vec<GalleryItem>)> {
    let before = repository.list()?.len();
    let remaining = repository.delete(id)?;
    Ok((remaining.len() < before, items(&remaining)))
}

/// Lists, deletes, exports and opens saved entities.
#[derive(Debug, Clone)]
pub struct GalleryBrowser {
    gallery: Gallery,
    editor: EditorChannel,
    notifications: NotificationCenter,
}

impl GalleryBrowser {
    /// Create a browser publishing to `editor`.
    pub fn new(gallery: Gallery, editor: EditorChannel, notifications: NotificationCenter) -> Self {
        Self {
            gallery,
            editor,
            notifications,
        }
    }

    fn report<T>(&self, result: EstudioResult<T>) -> EstudioResult<T> {
        if let Err(e) = &result {
            self.notifications.publish(Notification::from_error(e));
        }
        result
    }

    /// Changes to one category; re-list on every event.
    pub fn subscribe(&self, category: GalleryCategory) -> GallerySubscription {
        self.gallery.subscribe(category)
    }

    /// Entries of a category, newest first.
    #[instrument(skip(self))]
    pub fn list(&self, category: GalleryCategory) -> EstudioResult<Vec<GalleryItem>> {
        let result = match category {
            GalleryCategory::Characters => self.gallery.characters().list().map(|v| items(&v)),
            GalleryCategory::Scenes => self.gallery.scenes().list().map(|v| items(&v)),
            GalleryCategory::Products => self.gallery.products().list().map(|v| items(&v)),
            GalleryCategory::Propagandas => self.gallery.propagandas().list().map(|v| items(&v)),
        };
        self.report(result)
    }

    /// Remove an entry and return the remaining ones.
    ///
    /// Unknown ids leave the collection as it was and publish nothing.
    #[instrument(skip_all, fields(%category, id = %id))]
    pub fn delete(&self, category: GalleryCategory, id: &EntityId) -> EstudioResult<Vec<GalleryItem>> {
        let result = match category {
            GalleryCategory::Characters => remove(self.gallery.characters(), id),
            GalleryCategory::Scenes => remove(self.gallery.scenes(), id),
            GalleryCategory::Products => remove(self.gallery.products(), id),
            GalleryCategory::Propagandas => remove(self.gallery.propagandas(), id),
        };
        let (removed, remaining) = self.report(result)?;
        if !removed {
            return Ok(remaining);
        }
        self.notifications.publish(Notification::destructive(
            "Item excluído",
            format!("O item foi removido de {}.", category),
        ));
        Ok(remaining)
    }

    /// Send an entry to its editor. Returns how many editors were listening.
    #[instrument(skip_all, fields(%category, id = %id))]
    pub fn open_in_editor(&self, category: GalleryCategory, id: &EntityId) -> EstudioResult<usize> {
        let not_found =
            || EstudioError::from(StorageError::new(StorageErrorKind::NotFound(id.to_string())));
        let request = match category {
            GalleryCategory::Characters => self
                .gallery
                .characters()
                .get(id)
                .and_then(|e| e.map(EditorRequest::LoadCharacter).ok_or_else(not_found)),
            GalleryCategory::Scenes => self
                .gallery
                .scenes()
                .get(id)
                .and_then(|e| e.map(EditorRequest::LoadScene).ok_or_else(not_found)),
            GalleryCategory::Products => self
                .gallery
                .products()
                .get(id)
                .and_then(|e| e.map(EditorRequest::LoadProduct).ok_or_else(not_found)),
            GalleryCategory::Propagandas => self
                .gallery
                .propagandas()
                .get(id)
                .and_then(|e| e.map(EditorRequest::LoadPropaganda).ok_or_else(not_found)),
        };
        let request = self.report(request)?;
        Ok(self.editor.publish(request))
    }

    /// Export one entry, or the whole category when `id` is `None`, to `path`.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn export(
        &self,
        category: GalleryCategory,
        id: Option<&EntityId>,
        format: ExportFormat,
        path: &Path,
    ) -> EstudioResult<()> {
        let contents = match id {
            Some(id) => self.gallery.export_entity(category, id, format),
            None => self.gallery.export_collection(category, format),
        };
        let result = contents.and_then(|contents| write_export(path, &contents));
        self.report(result)?;
        info!(%category, %format, "Exported");
        self.notifications.publish(Notification::success(
            "Exportação concluída",
            format!("Arquivo salvo em {}.", path.display()),
        ));
        Ok(())
    }
}
