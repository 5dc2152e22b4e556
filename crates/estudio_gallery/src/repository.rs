//! Typed access to one gallery collection.
//!
//! Every operation reads the whole collection, modifies it in memory and
//! writes it back. There is no locking: when two writers race, the last
//! write wins.

use crate::{BucketLocation, GalleryChange, GalleryEntity, GalleryEvent, GalleryNotifier, KeyValueStore};
use estudio_core::EntityId;
use estudio_error::{EstudioResult, StorageError, StorageErrorKind};
use serde_json::{Map, Value};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Repository for the entities of one category.
#[derive(Debug)]
pub struct GalleryRepository<T: GalleryEntity> {
    store: Arc<dyn KeyValueStore>,
    notifier: GalleryNotifier,
    entity: PhantomData<fn() -> T>,
}

impl<T: GalleryEntity> Clone for GalleryRepository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            notifier: self.notifier.clone(),
            entity: PhantomData,
        }
    }
}

fn malformed(key: &str, message: impl std::fmt::Display) -> StorageError {
    StorageError::new(StorageErrorKind::MalformedBucket {
        key: key.to_string(),
        message: message.to_string(),
    })
}

/// Read a JSON object bucket. Missing buckets are empty objects.
pub(crate) fn read_object(store: &dyn KeyValueStore, key: &str) -> EstudioResult<Map<String, Value>> {
    match store.get(key)? {
        None => Ok(Map::new()),
        Some(raw) => match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(malformed(key, format!("expected an object, found {}", other)).into()),
            Err(e) => Err(malformed(key, e).into()),
        },
    }
}

/// Write a JSON object bucket.
pub(crate) fn write_object(
    store: &dyn KeyValueStore,
    key: &str,
    object: Map<String, Value>,
) -> EstudioResult<()> {
    let raw = serde_json::to_string(&Value::Object(object))
        .map_err(|e| StorageError::new(StorageErrorKind::Serialization(e.to_string())))?;
    store.set(key, &raw)
}

impl<T: GalleryEntity> GalleryRepository<T> {
    /// Create a repository over a store.
    pub fn new(store: Arc<dyn KeyValueStore>, notifier: GalleryNotifier) -> Self {
        Self {
            store,
            notifier,
            entity: PhantomData,
        }
    }

    /// All entities, newest first.
    #[instrument(skip(self), fields(category = %T::CATEGORY))]
    pub fn list(&self) -> EstudioResult<Vec<T>> {
        let items = match T::CATEGORY.location() {
            BucketLocation::Array(key) => match self.store.get(key)? {
                None => Vec::new(),
                Some(raw) => serde_json::from_str(&raw).map_err(|e| malformed(key, e))?,
            },
            BucketLocation::Field { key, field } => {
                match read_object(self.store.as_ref(), key)?.remove(field) {
                    None | Some(Value::Null) => Vec::new(),
                    Some(value) => serde_json::from_value(value).map_err(|e| malformed(key, e))?,
                }
            }
        };
        debug!(count = items.len(), "Listed gallery");
        Ok(items)
    }

    /// One entity by id.
    pub fn get(&self, id: &EntityId) -> EstudioResult<Option<T>> {
        Ok(self.list()?.into_iter().find(|item| item.id() == id))
    }

    /// Insert or replace an entity and return the updated collection.
    ///
    /// An unseen id is prepended. A known id is replaced in place.
    #[instrument(skip(self, entity), fields(category = %T::CATEGORY, id = %entity.id()))]
    pub fn save(&self, entity: T) -> EstudioResult<Vec<T>> {
        let mut items = self.list()?;
        let id = entity.id().clone();
        match items.iter().position(|item| item.id() == &id) {
            Some(index) => items[index] = entity,
            None => items.insert(0, entity),
        }
        self.write(&items)?;
        self.notifier.publish(GalleryEvent {
            category: T::CATEGORY,
            change: GalleryChange::Saved,
            id,
        });
        Ok(items)
    }

    /// Remove an entity and return the updated collection.
    ///
    /// Removing an unknown id leaves the collection untouched.
    #[instrument(skip(self), fields(category = %T::CATEGORY))]
    pub fn delete(&self, id: &EntityId) -> EstudioResult<Vec<T>> {
        let mut items = self.list()?;
        let before = items.len();
        items.retain(|item| item.id() != id);
        if items.len() == before {
            debug!(%id, "Nothing to delete");
            return Ok(items);
        }
        self.write(&items)?;
        self.notifier.publish(GalleryEvent {
            category: T::CATEGORY,
            change: GalleryChange::Deleted,
            id: id.clone(),
        });
        Ok(items)
    }

    fn write(&self, items: &[T]) -> EstudioResult<()> {
        let value = serde_json::to_value(items)
            .map_err(|e| StorageError::new(StorageErrorKind::Serialization(e.to_string())))?;
        match T::CATEGORY.location() {
            BucketLocation::Array(key) => {
                let raw = serde_json::to_string(&value)
                    .map_err(|e| StorageError::new(StorageErrorKind::Serialization(e.to_string())))?;
                self.store.set(key, &raw)
            }
            BucketLocation::Field { key, field } => {
                let mut object = read_object(self.store.as_ref(), key)?;
                object.insert(field.to_string(), value);
                write_object(self.store.as_ref(), key, object)
            }
        }
    }
}
