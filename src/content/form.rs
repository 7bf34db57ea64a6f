//! Admin form input for list entries

use serde::{Deserialize, Serialize};

use super::document::{Article, Brand};
use super::validate::ValidationError;

/// Fields submitted by the brand/article edit forms. Which fields matter
/// depends on the target list; an absent `id` means "add new".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemForm {
    pub id: Option<u64>,
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: Option<String>,
    pub excerpt: String,
    pub content: String,
}

impl ItemForm {
    /// Build a validated brand
    pub fn brand(&self) -> Result<Brand, ValidationError> {
        let brand = Brand {
            id: self.id.unwrap_or_default(),
            name: self.name.clone(),
            description: self.description.clone(),
            image: self.image.clone(),
            price: self.price.clone().filter(|p| !p.is_empty()),
        };
        brand.validate()?;
        Ok(brand)
    }

    /// Build a validated article
    pub fn article(&self) -> Result<Article, ValidationError> {
        let article = Article {
            id: self.id.unwrap_or_default(),
            name: self.name.clone(),
            excerpt: self.excerpt.clone(),
            image: self.image.clone(),
            content: self.content.clone(),
        };
        article.validate()?;
        Ok(article)
    }
}
