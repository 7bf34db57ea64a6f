//! paintyard: content store and admin tooling for the Paintyard site
//!
//! The site is a static page driven by a single JSON content document
//! (`data.json`). This crate loads that document from a durable local slot
//! or the factory bootstrap file, migrates legacy shapes, applies admin
//! edits with write-through persistence and exports the result.

pub mod admin;
pub mod commands;
pub mod config;
pub mod content;
pub mod server;
pub mod storage;
pub mod store;

use anyhow::Result;
use std::path::{Path, PathBuf};

use storage::{BootstrapSource, FileSlot};
use store::ContentStore;

/// The content store as wired up for a site directory
pub type SiteStore = ContentStore<FileSlot, BootstrapSource>;

/// A Paintyard site rooted at a base directory
#[derive(Clone)]
pub struct Paintyard {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding the static site and `data.json`
    pub site_dir: PathBuf,
    /// Directory holding the durable content slot
    pub data_dir: PathBuf,
}

impl Paintyard {
    /// Create a new instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create an instance with an explicit configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let site_dir = base_dir.join(&config.site_dir);
        let data_dir = base_dir.join(&config.data_dir);

        Self {
            config,
            base_dir,
            site_dir,
            data_dir,
        }
    }

    /// The durable slot for this site
    pub fn durable_slot(&self) -> FileSlot {
        FileSlot::new(&self.data_dir, &self.config.storage_key)
    }

    /// Open an unloaded content store
    pub fn open_store(&self) -> Result<SiteStore> {
        let bootstrap = BootstrapSource::from_config(&self.config, &self.site_dir)?;
        Ok(ContentStore::new(self.durable_slot(), bootstrap))
    }

    /// Open the content store and load the document
    pub async fn load_store(&self) -> Result<SiteStore> {
        let mut store = self.open_store()?;
        store.load().await;
        Ok(store)
    }

    /// Initialize a new site
    pub fn init(&self) -> Result<()> {
        commands::init::run(self)
    }

    /// Clear the durable slot
    pub fn reset(&self) -> Result<()> {
        commands::reset::run(self)
    }
}
