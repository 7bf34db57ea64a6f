//! Content store
//!
//! Owns the site document for one session. The document is loaded at most
//! once (durable slot first, bootstrap resource otherwise), every mutation
//! goes through the store, and every mutation is written through to the
//! durable slot.

use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::content::list::{self, ListEntry};
use crate::content::{migrate, Document, BRANDS_KEY, LEGACY_BRANDS_KEY};
use crate::storage::{BootstrapBackend, DurableBackend, StorageError};

/// Content store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Content has not been loaded yet")]
    NotLoaded,

    #[error("Invalid field path: {0:?}")]
    InvalidPath(String),

    #[error("Failed to persist content: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Load-once, write-through owner of the content document
pub struct ContentStore<D, B> {
    durable: D,
    bootstrap: B,
    document: Option<Document>,
}

impl<D: DurableBackend, B: BootstrapBackend> ContentStore<D, B> {
    /// Create an unloaded store
    pub fn new(durable: D, bootstrap: B) -> Self {
        Self {
            durable,
            bootstrap,
            document: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    /// The loaded document, if any
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn durable(&self) -> &D {
        &self.durable
    }

    /// Load the document. Only the first call touches the backends; later
    /// calls return the cached document.
    pub async fn load(&mut self) -> &Document {
        if self.document.is_none() {
            let doc = self.read_sources().await;
            self.document = Some(doc);
        }
        self.document.get_or_insert_with(Document::default)
    }

    async fn read_sources(&self) -> Document {
        match self.durable.get() {
            Ok(Some(text)) => match serde_json::from_str::<Value>(&text) {
                Ok(raw) => {
                    tracing::debug!("Loaded content from durable storage");
                    return migrate(&raw);
                }
                Err(e) => tracing::error!("Error parsing stored content: {}", e),
            },
            Ok(None) => tracing::debug!("No stored content, bootstrapping"),
            Err(e) => tracing::error!("Error reading stored content: {}", e),
        }

        let doc = self.bootstrap.fetch_initial().await;
        // Seed the slot so the next session skips the bootstrap fetch
        match serde_json::to_string(&doc) {
            Ok(text) => {
                if let Err(e) = self.durable.put(&text) {
                    tracing::warn!("Failed to seed durable storage: {}", e);
                }
            }
            Err(e) => tracing::warn!("Failed to serialize bootstrap content: {}", e),
        }
        doc
    }

    /// Set the value at a dotted field path (`"colors.headerBg"`) and persist.
    ///
    /// Legacy path prefixes are rewritten to their current names, missing
    /// intermediate objects are created and the result is normalized through
    /// [`migrate`]. The value itself is not validated.
    pub fn set_field(&mut self, path: &str, value: Value) -> Result<&Document, StoreError> {
        let doc = self.document.as_ref().ok_or(StoreError::NotLoaded)?;
        let segments = field_path(path)?;

        let mut raw = serde_json::to_value(doc)?;
        set_path(&mut raw, &segments, value).ok_or_else(|| StoreError::InvalidPath(path.into()))?;

        self.document = Some(migrate(&raw));
        tracing::debug!("Set field {}", segments.join("."));
        self.commit()
    }

    /// Read the value at a dotted field path; legacy names resolve to their
    /// current field
    pub fn get_field(&self, path: &str) -> Result<Option<Value>, StoreError> {
        let doc = self.document.as_ref().ok_or(StoreError::NotLoaded)?;
        let segments = field_path(path)?;

        let raw = serde_json::to_value(doc)?;
        let pointer: String = segments
            .iter()
            .map(|s| format!("/{}", s.replace('~', "~0").replace('/', "~1")))
            .collect();
        Ok(raw.pointer(&pointer).cloned())
    }

    /// Replace the entry whose id matches `id`, or append `item` under a new
    /// id, then persist. Returns the id the entry was stored under.
    pub fn upsert_list_item<T: ListEntry>(
        &mut self,
        id: Option<u64>,
        item: T,
    ) -> Result<(u64, &Document), StoreError> {
        let doc = self.document.as_mut().ok_or(StoreError::NotLoaded)?;
        let assigned = list::upsert(T::list_mut(doc), id, item);
        tracing::info!("Saved {} entry {}", T::LIST, assigned);
        Ok((assigned, self.commit()?))
    }

    /// Remove the entry with `id` if present, then persist
    pub fn remove_list_item<T: ListEntry>(&mut self, id: u64) -> Result<&Document, StoreError> {
        let doc = self.document.as_mut().ok_or(StoreError::NotLoaded)?;
        if list::remove(T::list_mut(doc), id) {
            tracing::info!("Removed {} entry {}", T::LIST, id);
        } else {
            tracing::debug!("No {} entry {} to remove", T::LIST, id);
        }
        self.commit()
    }

    /// Serialize the document as pretty JSON (the `data.json` artifact)
    pub fn export_snapshot(&self) -> Result<String, StoreError> {
        let doc = self.document.as_ref().ok_or(StoreError::NotLoaded)?;
        Ok(serde_json::to_string_pretty(doc)?)
    }

    /// Write the exported snapshot to `path`
    pub fn export_to<P: AsRef<Path>>(&self, path: P) -> Result<(), StoreError> {
        let snapshot = self.export_snapshot()?;
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path.as_ref(), snapshot)?;
        tracing::info!("Exported content to {:?}", path.as_ref());
        Ok(())
    }

    /// Clear the durable slot and forget the loaded document
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.durable.clear()?;
        self.document = None;
        Ok(())
    }

    fn commit(&self) -> Result<&Document, StoreError> {
        let doc = self.document.as_ref().ok_or(StoreError::NotLoaded)?;
        self.durable.put(&serde_json::to_string(doc)?)?;
        Ok(doc)
    }
}

/// Split a dotted path and rewrite legacy names
fn field_path(path: &str) -> Result<Vec<String>, StoreError> {
    let mut segments: Vec<String> = path.split('.').map(str::to_string).collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(StoreError::InvalidPath(path.to_string()));
    }

    if segments[0] == LEGACY_BRANDS_KEY {
        segments[0] = BRANDS_KEY.to_string();
    } else if matches!(segments[0].as_str(), "textColors" | "sectionBackgrounds")
        && segments.get(1).map(String::as_str) == Some(LEGACY_BRANDS_KEY)
    {
        segments[1] = BRANDS_KEY.to_string();
    }

    Ok(segments)
}

/// Set `value` at `segments`, creating objects along the way. Array
/// elements are addressed by index. Returns `None` for an index outside
/// an array.
fn set_path(target: &mut Value, segments: &[String], value: Value) -> Option<()> {
    let (head, rest) = segments.split_first()?;

    let slot = match target {
        Value::Array(items) => {
            let index: usize = head.parse().ok()?;
            items.get_mut(index)?
        }
        other => {
            if !other.is_object() {
                *other = Value::Object(Map::new());
            }
            let obj = other.as_object_mut()?;
            obj.entry(head.clone()).or_insert(Value::Null)
        }
    };

    if rest.is_empty() {
        *slot = value;
        Some(())
    } else {
        set_path(slot, rest, value)
    }
}
