//! Storage backends
//!
//! Two capabilities back the content store:
//!
//! - a [`DurableBackend`]: one persistent slot holding the serialized
//!   document, surviving restarts
//! - a [`BootstrapBackend`]: a one-shot read of the factory `data.json`,
//!   used only when the durable slot is empty

mod bootstrap;
mod slot;

pub use bootstrap::{BootstrapSource, FileBootstrap, HttpBootstrap};
pub use slot::{FileSlot, MemorySlot};

use serde_json::Value;
use std::future::Future;
use thiserror::Error;

use crate::content::{migrate, Document};

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Bootstrap resource returned status {0}")]
    Status(u16),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// A single persistent key-value slot
pub trait DurableBackend: Send + Sync {
    /// Read the slot; `None` when nothing was stored yet
    fn get(&self) -> Result<Option<String>, StorageError>;

    /// Overwrite the slot
    fn put(&self, data: &str) -> Result<(), StorageError>;

    /// Remove the slot entirely
    fn clear(&self) -> Result<(), StorageError>;
}

/// Source of the initial document when the durable slot is empty
pub trait BootstrapBackend: Send + Sync {
    /// Fetch the raw bootstrap resource
    fn fetch_raw(&self) -> impl Future<Output = Result<Value, StorageError>> + Send;

    /// Fetch and migrate the bootstrap resource.
    ///
    /// Never fails: any error is logged and replaced by the minimal
    /// default document.
    fn fetch_initial(&self) -> impl Future<Output = Document> + Send {
        async move {
            match self.fetch_raw().await {
                Ok(raw) => migrate(&raw),
                Err(e) => {
                    tracing::warn!("Failed to load bootstrap content, using defaults: {}", e);
                    Document::default()
                }
            }
        }
    }
}
