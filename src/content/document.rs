//! Content document types

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default header background used when the document carries no colors
pub const DEFAULT_HEADER_BG: &str = "#2c3e50";

/// Default main background used when the document carries no colors
pub const DEFAULT_MAIN_BG: &str = "#f4f4f4";

/// The site content document (`data.json`)
///
/// The required core (`logo`, `address`, `phones`, `aboutText`, `brands`,
/// `articles`, `colors`) is always present. Optional groups are `None` when
/// the source document did not carry them. Any other top-level field is
/// kept verbatim in `extra`, in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub logo: String,
    pub address: String,
    pub phones: Vec<String>,
    pub about_text: String,
    pub brands: Vec<Brand>,
    pub articles: Vec<Article>,
    pub colors: Colors,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_colors: Option<IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_colors: Option<IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_sizes: Option<IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_size: Option<IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_backgrounds: Option<IndexMap<String, SectionBackground>>,

    /// Free-form layout knobs (`sectionHeights`, `headerPadding`, fonts, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Document {
    /// The minimal document used when nothing could be loaded
    fn default() -> Self {
        Self {
            logo: String::new(),
            address: String::new(),
            phones: Vec::new(),
            about_text: String::new(),
            brands: Vec::new(),
            articles: Vec::new(),
            colors: Colors::default(),
            text_colors: None,
            contact_colors: None,
            header_sizes: None,
            logo_size: None,
            section_backgrounds: None,
            extra: Map::new(),
        }
    }
}

impl Document {
    /// Text color override for a section, if any
    pub fn text_color(&self, section: &str) -> Option<&str> {
        self.text_colors
            .as_ref()
            .and_then(|colors| colors.get(section))
            .map(String::as_str)
    }

    /// Background configuration for a section, if any
    pub fn section_background(&self, section: &str) -> Option<&SectionBackground> {
        self.section_backgrounds
            .as_ref()
            .and_then(|backgrounds| backgrounds.get(section))
    }

    pub fn brand(&self, id: u64) -> Option<&Brand> {
        self.brands.iter().find(|b| b.id == id)
    }

    pub fn article(&self, id: u64) -> Option<&Article> {
        self.articles.iter().find(|a| a.id == id)
    }
}

/// Page colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Colors {
    pub header_bg: String,
    pub main_bg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_bg: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            header_bg: DEFAULT_HEADER_BG.to_string(),
            main_bg: DEFAULT_MAIN_BG.to_string(),
            menu_bg: None,
            extra: Map::new(),
        }
    }
}

/// A brand card (formerly "product")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brand {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

impl Brand {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            description: description.into(),
            image: String::new(),
            price: None,
        }
    }
}

/// An article card with its full content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: u64,
    pub name: String,
    pub excerpt: String,
    pub image: String,
    pub content: String,
}

impl Article {
    pub fn new(
        name: impl Into<String>,
        excerpt: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            excerpt: excerpt.into(),
            image: String::new(),
            content: content.into(),
        }
    }
}

/// Per-section background image configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionBackground {
    #[serde(default)]
    pub image: String,
    /// 0-100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos_x: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos_y: Option<Value>,
}

impl SectionBackground {
    pub fn from_image(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            opacity: None,
            scale: None,
            pos_x: None,
            pos_y: None,
        }
    }

    /// The image reference, only if it is a data URI or a relative
    /// `images/` path
    pub fn safe_image(&self) -> Option<&str> {
        let image = self.image.as_str();
        if image.starts_with("data:") || image.starts_with("images/") || image.starts_with("/images/")
        {
            Some(image)
        } else {
            if !image.is_empty() {
                tracing::warn!("Skipping unsafe background image: {}", image);
            }
            None
        }
    }

    /// Opacity as a 0.0-1.0 factor; unset or zero means fully opaque
    pub fn effective_opacity(&self) -> f32 {
        match self.opacity {
            Some(0) | None => 1.0,
            Some(o) => f32::from(o.min(100)) / 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_document() {
        let doc = Document::default();
        assert_eq!(doc.logo, "");
        assert!(doc.phones.is_empty());
        assert!(doc.brands.is_empty());
        assert!(doc.articles.is_empty());
        assert_eq!(doc.colors.header_bg, "#2c3e50");
        assert_eq!(doc.colors.main_bg, "#f4f4f4");
    }

    #[test]
    fn test_serialize_uses_site_field_names() {
        let mut doc = Document::default();
        doc.about_text = "Hello".to_string();
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["aboutText"], "Hello");
        assert_eq!(value["colors"]["headerBg"], "#2c3e50");
        assert!(value.get("textColors").is_none());
        assert!(value.get("colors").unwrap().get("menuBg").is_none());
    }

    #[test]
    fn test_safe_image() {
        let bg = SectionBackground::from_image("images/wall.jpg");
        assert_eq!(bg.safe_image(), Some("images/wall.jpg"));

        let bg = SectionBackground::from_image("data:image/png;base64,AAAA");
        assert!(bg.safe_image().is_some());

        let bg = SectionBackground::from_image("https://evil.example/x.png");
        assert_eq!(bg.safe_image(), None);
    }

    #[test]
    fn test_effective_opacity() {
        let mut bg = SectionBackground::from_image("images/a.jpg");
        assert_eq!(bg.effective_opacity(), 1.0);
        bg.opacity = Some(40);
        assert!((bg.effective_opacity() - 0.4).abs() < f32::EPSILON);
    }
}
