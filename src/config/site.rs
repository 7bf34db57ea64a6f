//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,

    // Directories (relative to the base directory)
    pub site_dir: String,
    pub data_dir: String,

    // Content storage
    pub storage_key: String,
    pub bootstrap_file: String,
    pub bootstrap_url: Option<String>,
    pub fetch_timeout_secs: u64,

    // Admin
    pub admin_password: String,

    // Server
    #[serde(default)]
    pub server: ServerConfig,

    // Map widget
    #[serde(default)]
    pub map: MapConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Paintyard".to_string(),

            site_dir: "public".to_string(),
            data_dir: ".paintyard".to_string(),

            storage_key: "paintyardData".to_string(),
            bootstrap_file: "data.json".to_string(),
            bootstrap_url: None,
            fetch_timeout_secs: 10,

            admin_password: "admin".to_string(),

            server: ServerConfig::default(),
            map: MapConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Admin/preview server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 4000,
        }
    }
}

/// Map center coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Configuration handed to the embedded map/places widget
///
/// The widget performs its own place search, details and directions calls;
/// this crate only stores and serves the object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub center: LatLng,
    /// Search radius in meters
    pub radius: u32,
    pub marker_icon: String,
    pub api_key: String,
    pub places: bool,
    pub details: bool,
    pub directions: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: LatLng {
                lat: 50.4501,
                lng: 30.5234,
            },
            radius: 5000,
            marker_icon: "images/marker.png".to_string(),
            api_key: String::new(),
            places: true,
            details: true,
            directions: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.storage_key, "paintyardData");
        assert_eq!(config.bootstrap_file, "data.json");
        assert_eq!(config.admin_password, "admin");
        assert_eq!(config.site_dir, "public");
        assert_eq!(config.server.port, 4000);
        assert!(config.bootstrap_url.is_none());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Paintyard Kyiv
site_dir: www
bootstrap_url: https://paintyard.example
server:
  port: 8080
map:
  radius: 1200
  api_key: KEY
  directions: false
analytics: on
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Paintyard Kyiv");
        assert_eq!(config.site_dir, "www");
        assert_eq!(
            config.bootstrap_url.as_deref(),
            Some("https://paintyard.example")
        );
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.ip, "localhost");
        assert_eq!(config.map.radius, 1200);
        assert!(!config.map.directions);
        assert!(config.map.places);
        assert_eq!(config.storage_key, "paintyardData");
        assert!(config.extra.contains_key("analytics"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "admin_password: secret\n").unwrap();

        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.admin_password, "secret");
        assert_eq!(config.data_dir, ".paintyard");
    }
}
