//! Id-keyed content lists (brands and articles)

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use super::document::{Article, Brand, Document};

/// The id for a new entry: one past the largest id in `used`, `1` when
/// `used` is empty. When the largest id is `u64::MAX` the smallest unused
/// id is taken instead.
pub fn next_id(used: &HashSet<u64>) -> u64 {
    match used.iter().copied().max() {
        None => 1,
        Some(max) => max
            .checked_add(1)
            .unwrap_or_else(|| (1..=u64::MAX).find(|id| !used.contains(id)).unwrap_or(0)),
    }
}

/// Names of the lists a document carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListName {
    Brands,
    Articles,
}

impl ListName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListName::Brands => "brands",
            ListName::Articles => "articles",
        }
    }
}

impl fmt::Display for ListName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            // "products" is the old name of the brands list
            "brands" | "brand" | "products" | "product" => Ok(ListName::Brands),
            "articles" | "article" => Ok(ListName::Articles),
            _ => Err(format!("Unknown list: {}. Available: brands, articles", s)),
        }
    }
}

/// An entry of a document list
pub trait ListEntry: Clone {
    const LIST: ListName;

    fn id(&self) -> u64;
    fn set_id(&mut self, id: u64);
    fn list(doc: &Document) -> &Vec<Self>;
    fn list_mut(doc: &mut Document) -> &mut Vec<Self>;
}

impl ListEntry for Brand {
    const LIST: ListName = ListName::Brands;

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn list(doc: &Document) -> &Vec<Self> {
        &doc.brands
    }

    fn list_mut(doc: &mut Document) -> &mut Vec<Self> {
        &mut doc.brands
    }
}

impl ListEntry for Article {
    const LIST: ListName = ListName::Articles;

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn list(doc: &Document) -> &Vec<Self> {
        &doc.articles
    }

    fn list_mut(doc: &mut Document) -> &mut Vec<Self> {
        &mut doc.articles
    }
}

/// Replace the entry with a matching `id` in place, or append `item` under
/// a freshly assigned id. Returns the id the item ended up with.
pub fn upsert<T: ListEntry>(list: &mut Vec<T>, id: Option<u64>, mut item: T) -> u64 {
    if let Some(id) = id {
        if let Some(existing) = list.iter_mut().find(|e| e.id() == id) {
            item.set_id(id);
            *existing = item;
            return id;
        }
    }

    let used: HashSet<u64> = list.iter().map(ListEntry::id).collect();
    let id = next_id(&used);
    item.set_id(id);
    list.push(item);
    id
}

/// Remove the entry with `id`. Returns whether anything was removed.
pub fn remove<T: ListEntry>(list: &mut Vec<T>, id: u64) -> bool {
    let before = list.len();
    list.retain(|e| e.id() != id);
    list.len() != before
}
