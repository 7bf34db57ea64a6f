//! Bootstrap sources for the factory `data.json`

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{BootstrapBackend, StorageError};
use crate::config::SiteConfig;

/// Reads the bootstrap resource from the site directory
#[derive(Debug, Clone)]
pub struct FileBootstrap {
    path: PathBuf,
}

impl FileBootstrap {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BootstrapBackend for FileBootstrap {
    async fn fetch_raw(&self) -> Result<Value, StorageError> {
        tracing::debug!("Reading bootstrap content from {:?}", self.path);
        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Fetches the bootstrap resource from `<base_url>/<file>`
#[derive(Debug, Clone)]
pub struct HttpBootstrap {
    url: String,
    client: reqwest::Client,
}

impl HttpBootstrap {
    pub fn new(base_url: &str, file: &str, timeout: Duration) -> Result<Self, StorageError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let url = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            file.trim_start_matches('/')
        );
        Ok(Self { url, client })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl BootstrapBackend for HttpBootstrap {
    async fn fetch_raw(&self) -> Result<Value, StorageError> {
        tracing::debug!("Fetching bootstrap content from {}", self.url);
        let resp = self.client.get(&self.url).send().await?;

        if !resp.status().is_success() {
            return Err(StorageError::Status(resp.status().as_u16()));
        }

        Ok(resp.json::<Value>().await?)
    }
}

/// The bootstrap source selected by configuration
#[derive(Debug, Clone)]
pub enum BootstrapSource {
    File(FileBootstrap),
    Http(HttpBootstrap),
}

impl BootstrapSource {
    /// `bootstrap_url` when configured, otherwise `<site_dir>/<bootstrap_file>`
    pub fn from_config(config: &SiteConfig, site_dir: &Path) -> Result<Self, StorageError> {
        match &config.bootstrap_url {
            Some(url) => Ok(BootstrapSource::Http(HttpBootstrap::new(
                url,
                &config.bootstrap_file,
                Duration::from_secs(config.fetch_timeout_secs),
            )?)),
            None => Ok(BootstrapSource::File(FileBootstrap::new(
                site_dir.join(&config.bootstrap_file),
            ))),
        }
    }
}

impl BootstrapBackend for BootstrapSource {
    async fn fetch_raw(&self) -> Result<Value, StorageError> {
        match self {
            BootstrapSource::File(source) => source.fetch_raw().await,
            BootstrapSource::Http(source) => source.fetch_raw().await,
        }
    }
}
