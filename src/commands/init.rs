//! Initialize a new Paintyard site

use anyhow::Result;
use serde_json::json;
use std::fs;
use std::path::Path;

use crate::Paintyard;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;

    let config_content = r#"# Paintyard Configuration

# Site
title: Paintyard

# Directories
site_dir: public
data_dir: .paintyard

# Content storage
storage_key: paintyardData
bootstrap_file: data.json
# bootstrap_url: https://example.com
fetch_timeout_secs: 10

# Admin
admin_password: admin

# Server
server:
  ip: localhost
  port: 4000

# Map widget
map:
  center:
    lat: 50.4501
    lng: 30.5234
  radius: 5000
  marker_icon: images/marker.png
  api_key: ''
  places: true
  details: true
  directions: true
"#;

    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        tracing::info!("Keeping existing {:?}", config_path);
    } else {
        fs::write(&config_path, config_content)?;
    }

    // Lay out the rest according to the effective configuration
    let site = Paintyard::new(target_dir)?;
    fs::create_dir_all(site.site_dir.join("images"))?;

    // Factory content served when no edits have been stored yet
    let data_path = site.site_dir.join(&site.config.bootstrap_file);
    if data_path.exists() {
        tracing::info!("Keeping existing {:?}", data_path);
    } else {
        let factory = json!({
            "logo": "",
            "address": "",
            "phones": [],
            "aboutText": "",
            "brands": [],
            "articles": [],
            "colors": {
                "headerBg": crate::content::DEFAULT_HEADER_BG,
                "mainBg": crate::content::DEFAULT_MAIN_BG
            }
        });
        fs::write(&data_path, serde_json::to_string_pretty(&factory)?)?;
    }

    ignore_data_dir(&target_dir.join(".gitignore"), &site.config.data_dir)?;

    Ok(())
}

/// Add the data directory to `.gitignore`, keeping any existing entries
fn ignore_data_dir(gitignore: &Path, data_dir: &str) -> Result<()> {
    let entry = format!("{}/", data_dir.trim_end_matches('/'));
    let existing = match fs::read_to_string(gitignore) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    if existing
        .lines()
        .any(|line| line.trim().trim_start_matches('/') == entry)
    {
        return Ok(());
    }

    let mut content = existing;
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(&entry);
    content.push('\n');
    fs::write(gitignore, content)?;
    tracing::info!("Added {} to {:?}", entry, gitignore);
    Ok(())
}

/// Run the init command with an existing instance
pub fn run(site: &Paintyard) -> Result<()> {
    init_site(&site.base_dir)
}
