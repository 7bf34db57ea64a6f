//! Print the content document or one of its fields

use anyhow::Result;

use crate::Paintyard;

/// Render the whole document, or the value at `path`
pub async fn render(site: &Paintyard, path: Option<&str>) -> Result<String> {
    let store = site.load_store().await?;

    match path {
        None => Ok(store.export_snapshot()?),
        Some(path) => match store.get_field(path)? {
            Some(value) => Ok(serde_json::to_string_pretty(&value)?),
            None => anyhow::bail!("Field not set: {}", path),
        },
    }
}

/// Print the whole document, or the value at `path`
pub async fn run(site: &Paintyard, path: Option<&str>) -> Result<()> {
    println!("{}", render(site, path).await?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn test_render_field() {
        let dir = tempfile::tempdir().unwrap();
        let site = Paintyard::new(dir.path()).unwrap();
        fs::create_dir_all(&site.site_dir).unwrap();
        fs::write(
            site.site_dir.join("data.json"),
            r#"{"address": "Kyiv", "products": [{"id": 1, "name": "A", "description": "B", "image": ""}]}"#,
        )
        .unwrap();

        assert_eq!(render(&site, Some("address")).await.unwrap(), "\"Kyiv\"");
        assert_eq!(
            render(&site, Some("products.0.name")).await.unwrap(),
            "\"A\""
        );
        assert!(render(&site, Some("colors.menuBg")).await.is_err());

        let whole = render(&site, None).await.unwrap();
        assert!(whole.contains("\"brands\""));
    }
}
