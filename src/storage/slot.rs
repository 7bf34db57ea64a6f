//! Durable slots

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{DurableBackend, StorageError};

/// A slot stored as one JSON file: `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileSlot {
    dir: PathBuf,
    key: String,
}

impl FileSlot {
    pub fn new<P: AsRef<Path>>(dir: P, key: &str) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            key: key.to_string(),
        }
    }

    /// Path of the slot file
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.key))
    }

    fn temp_path(&self) -> PathBuf {
        self.dir.join(format!(".{}.json.tmp", self.key))
    }

    /// Copy the current slot next to itself with a timestamp suffix.
    /// Returns the backup path, or `None` if the slot is empty.
    pub fn backup(&self) -> Result<Option<PathBuf>, StorageError> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }

        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let backup = self.dir.join(format!("{}.{}.bak.json", self.key, stamp));
        fs::copy(&path, &backup)?;
        tracing::debug!("Backed up {:?} to {:?}", path, backup);
        Ok(Some(backup))
    }
}

impl DurableBackend for FileSlot {
    fn get(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path()) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, data: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;

        // Write then rename so a crash never leaves a truncated slot
        let temp = self.temp_path();
        fs::write(&temp, data)?;
        fs::rename(&temp, self.path())?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(self.path()) {
            Ok(()) => {
                tracing::info!("Deleted: {:?}", self.path());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// An in-process slot; lives as long as the value does
#[derive(Debug, Default)]
pub struct MemorySlot {
    data: Mutex<Option<String>>,
    gets: AtomicUsize,
    puts: AtomicUsize,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot that already holds `data`
    pub fn with_data(data: impl Into<String>) -> Self {
        Self {
            data: Mutex::new(Some(data.into())),
            ..Default::default()
        }
    }

    /// Current contents of the slot
    pub fn contents(&self) -> Option<String> {
        self.lock().clone()
    }

    /// Number of `get` calls so far
    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    /// Number of `put` calls so far
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        // A poisoned slot still holds the last complete write
        self.data.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DurableBackend for MemorySlot {
    fn get(&self) -> Result<Option<String>, StorageError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        Ok(self.lock().clone())
    }

    fn put(&self, data: &str) -> Result<(), StorageError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        *self.lock() = Some(data.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.lock() = None;
        Ok(())
    }
}
