//! List brands and articles

use anyhow::Result;

use crate::content::{Document, ListName};
use crate::Paintyard;

/// Format the entries of a list, one per line
pub fn format_list(doc: &Document, list: ListName) -> Vec<String> {
    match list {
        ListName::Brands => doc
            .brands
            .iter()
            .map(|b| match &b.price {
                Some(price) => format!("  [{}] {} - {} ({})", b.id, b.name, b.description, price),
                None => format!("  [{}] {} - {}", b.id, b.name, b.description),
            })
            .collect(),
        ListName::Articles => doc
            .articles
            .iter()
            .map(|a| format!("  [{}] {} - {}", a.id, a.name, a.excerpt))
            .collect(),
    }
}

/// List site content by type
pub async fn run(site: &Paintyard, list: ListName) -> Result<()> {
    let mut store = site.open_store()?;
    let doc = store.load().await;

    let lines = format_list(doc, list);
    println!("{} ({}):", capitalize(list.as_str()), lines.len());
    for line in lines {
        println!("{}", line);
    }

    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Article, Brand};

    #[test]
    fn test_format_list() {
        let mut doc = Document::default();
        let mut brand = Brand::new("Dulux", "Paint");
        brand.id = 2;
        brand.price = Some("100".to_string());
        doc.brands.push(brand);
        let mut article = Article::new("Guide", "How to", "...");
        article.id = 1;
        doc.articles.push(article);

        assert_eq!(
            format_list(&doc, ListName::Brands),
            vec!["  [2] Dulux - Paint (100)"]
        );
        assert_eq!(
            format_list(&doc, ListName::Articles),
            vec!["  [1] Guide - How to"]
        );
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("brands"), "Brands");
        assert_eq!(capitalize(""), "");
    }
}
