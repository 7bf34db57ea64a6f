//! Schema migration
//!
//! Every document read from storage or the bootstrap resource passes through
//! [`migrate`], which upgrades legacy shapes and fills in the required core.
//! Migration is total: any JSON value produces a usable [`Document`].

use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::HashSet;

use super::document::{
    Article, Brand, Colors, Document, SectionBackground, DEFAULT_HEADER_BG, DEFAULT_MAIN_BG,
};
use super::list::next_id;
use super::parse_phone_lines;

/// Legacy name of the brands list and of its section keys
pub const LEGACY_BRANDS_KEY: &str = "products";

/// Current name of the brands list and of its section keys
pub const BRANDS_KEY: &str = "brands";

/// Top-level fields that map onto typed document fields
const TYPED_FIELDS: &[&str] = &[
    "logo",
    "address",
    "phones",
    "aboutText",
    "brands",
    "products",
    "articles",
    "colors",
    "textColors",
    "contactColors",
    "headerSizes",
    "logoSize",
    "sectionBackgrounds",
];

/// Which generation of the document layout a raw value uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaShape {
    /// Only current field names
    Current,
    /// At least one legacy field name or flat legacy value
    Legacy,
}

impl SchemaShape {
    /// Inspect a raw document without modifying it
    pub fn detect(raw: &Value) -> Self {
        let Some(obj) = raw.as_object() else {
            return SchemaShape::Current;
        };

        let legacy_list = obj.contains_key(LEGACY_BRANDS_KEY);
        let legacy_text_color = obj
            .get("textColors")
            .and_then(Value::as_object)
            .is_some_and(|m| m.contains_key(LEGACY_BRANDS_KEY));
        let legacy_background = obj
            .get("sectionBackgrounds")
            .and_then(Value::as_object)
            .is_some_and(|m| m.contains_key(LEGACY_BRANDS_KEY) || m.values().any(Value::is_string));

        if legacy_list || legacy_text_color || legacy_background {
            SchemaShape::Legacy
        } else {
            SchemaShape::Current
        }
    }
}

/// Upgrade an arbitrary JSON value to the current document schema
pub fn migrate(raw: &Value) -> Document {
    let empty = Map::new();
    let obj = match raw.as_object() {
        Some(obj) => obj,
        None => {
            tracing::warn!("Content document is not a JSON object, using defaults");
            &empty
        }
    };

    let shape = SchemaShape::detect(raw);
    if shape == SchemaShape::Legacy {
        tracing::debug!("Migrating legacy content document");
    }

    let brand_source = obj
        .get(BRANDS_KEY)
        .filter(|v| v.is_array())
        .or_else(|| obj.get(LEGACY_BRANDS_KEY).filter(|v| v.is_array()));

    let extra = obj
        .iter()
        .filter(|(key, _)| !TYPED_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Document {
        logo: text(obj, "logo"),
        address: text(obj, "address"),
        phones: phones(obj.get("phones")),
        about_text: text(obj, "aboutText"),
        brands: entries(brand_source, parse_brand),
        articles: entries(obj.get("articles"), parse_article),
        colors: colors(obj.get("colors")),
        text_colors: string_map(obj.get("textColors"), true),
        contact_colors: string_map(obj.get("contactColors"), false),
        header_sizes: string_map(obj.get("headerSizes"), false),
        logo_size: string_map(obj.get("logoSize"), false),
        section_backgrounds: section_backgrounds(obj.get("sectionBackgrounds")),
        extra,
    }
}

/// Read a field as text; numbers are stringified, anything else is empty
fn text(obj: &Map<String, Value>, key: &str) -> String {
    optional_text(obj.get(key)).unwrap_or_default()
}

fn optional_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn phones(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|p| !p.trim().is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(text)) => parse_phone_lines(text),
        _ => Vec::new(),
    }
}

/// Parse an id given as a non-negative integer or a numeric string
fn parse_id(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse a list of entries, keeping the first occurrence of each id and
/// assigning fresh ids to entries without a usable one
fn entries<T>(value: Option<&Value>, parse: fn(&Map<String, Value>, u64) -> T) -> Vec<T> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let parsed: Vec<(Option<u64>, &Map<String, Value>)> = items
        .iter()
        .filter_map(Value::as_object)
        .map(|entry| {
            let id = parse_id(entry.get("id")).filter(|id| seen.insert(*id));
            (id, entry)
        })
        .collect();

    parsed
        .into_iter()
        .map(|(id, entry)| {
            let id = id.unwrap_or_else(|| {
                let fresh = next_id(&seen);
                seen.insert(fresh);
                fresh
            });
            parse(entry, id)
        })
        .collect()
}

fn parse_brand(entry: &Map<String, Value>, id: u64) -> Brand {
    Brand {
        id,
        name: text(entry, "name"),
        description: text(entry, "description"),
        image: text(entry, "image"),
        price: optional_text(entry.get("price")),
    }
}

fn parse_article(entry: &Map<String, Value>, id: u64) -> Article {
    Article {
        id,
        name: text(entry, "name"),
        excerpt: text(entry, "excerpt"),
        image: text(entry, "image"),
        content: text(entry, "content"),
    }
}

fn colors(value: Option<&Value>) -> Colors {
    let Some(Value::Object(obj)) = value else {
        return Colors::default();
    };

    let color = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);

    Colors {
        header_bg: color("headerBg").unwrap_or_else(|| DEFAULT_HEADER_BG.to_string()),
        main_bg: color("mainBg").unwrap_or_else(|| DEFAULT_MAIN_BG.to_string()),
        menu_bg: color("menuBg"),
        extra: obj
            .iter()
            .filter(|(key, _)| !matches!(key.as_str(), "headerBg" | "mainBg" | "menuBg"))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
    }
}

/// Map a legacy section key onto its current name. Returns `None` when the
/// entry should be dropped because the current key is also present.
fn section_key<'a>(key: &'a str, source: &Map<String, Value>) -> Option<&'a str> {
    if key == LEGACY_BRANDS_KEY {
        if source.contains_key(BRANDS_KEY) {
            None
        } else {
            Some(BRANDS_KEY)
        }
    } else {
        Some(key)
    }
}

fn string_map(value: Option<&Value>, rename_legacy: bool) -> Option<IndexMap<String, String>> {
    let obj = value?.as_object()?;

    let mut map = IndexMap::new();
    for (key, value) in obj {
        let key = if rename_legacy {
            match section_key(key, obj) {
                Some(k) => k,
                None => continue,
            }
        } else {
            key.as_str()
        };
        if let Some(s) = value.as_str() {
            map.insert(key.to_string(), s.to_string());
        }
    }
    Some(map)
}

fn section_backgrounds(value: Option<&Value>) -> Option<IndexMap<String, SectionBackground>> {
    let obj = value?.as_object()?;

    let mut map = IndexMap::new();
    for (key, value) in obj {
        let Some(key) = section_key(key, obj) else {
            continue;
        };
        let background = match value {
            Value::String(image) => SectionBackground::from_image(image.clone()),
            Value::Object(fields) => SectionBackground {
                image: text(fields, "image"),
                opacity: opacity(fields.get("opacity")),
                scale: non_null(fields.get("scale")),
                pos_x: non_null(fields.get("posX")),
                pos_y: non_null(fields.get("posY")),
            },
            _ => continue,
        };
        map.insert(key.to_string(), background);
    }
    Some(map)
}

fn opacity(value: Option<&Value>) -> Option<u8> {
    let raw = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    if raw.is_nan() {
        return None;
    }
    Some(raw.round().clamp(0.0, 100.0) as u8)
}

fn non_null(value: Option<&Value>) -> Option<Value> {
    value.filter(|v| !v.is_null()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn remigrate(doc: &Document) -> Document {
        migrate(&serde_json::to_value(doc).unwrap())
    }

    #[test]
    fn test_empty_object_gets_core_defaults() {
        let doc = migrate(&json!({}));
        assert_eq!(doc, Document::default());
    }

    #[test]
    fn test_non_object_input() {
        assert_eq!(migrate(&json!(null)), Document::default());
        assert_eq!(migrate(&json!([1, 2, 3])), Document::default());
        assert_eq!(migrate(&json!("data")), Document::default());
    }

    #[test]
    fn test_legacy_products_become_brands() {
        let raw = json!({
            "products": [
                {"id": 1, "name": "Dulux", "description": "Paint", "price": "100", "image": ""}
            ]
        });
        assert_eq!(SchemaShape::detect(&raw), SchemaShape::Legacy);

        let doc = migrate(&raw);
        assert_eq!(doc.brands.len(), 1);
        assert_eq!(doc.brands[0].name, "Dulux");
        assert_eq!(doc.brands[0].price.as_deref(), Some("100"));

        let value = serde_json::to_value(&doc).unwrap();
        assert!(value.get("products").is_none());
        assert!(value.get("brands").is_some());
    }

    #[test]
    fn test_current_brands_win_over_products() {
        let doc = migrate(&json!({
            "brands": [{"id": 7, "name": "Current", "description": "", "image": ""}],
            "products": [{"id": 1, "name": "Old", "description": "", "image": ""}]
        }));
        assert_eq!(doc.brands.len(), 1);
        assert_eq!(doc.brands[0].name, "Current");
        assert!(!doc.extra.contains_key("products"));
    }

    #[test]
    fn test_legacy_section_keys_renamed() {
        let doc = migrate(&json!({
            "textColors": {"header": "#fff", "products": "#111"},
            "sectionBackgrounds": {
                "products": "images/brands.jpg",
                "about": {"image": "images/about.jpg", "opacity": 150, "posX": "50%"}
            }
        }));

        assert_eq!(doc.text_color("brands"), Some("#111"));
        assert_eq!(doc.text_color("products"), None);
        assert_eq!(doc.text_color("header"), Some("#fff"));

        let brands_bg = doc.section_background("brands").unwrap();
        assert_eq!(brands_bg.image, "images/brands.jpg");
        let about_bg = doc.section_background("about").unwrap();
        assert_eq!(about_bg.opacity, Some(100));
        assert_eq!(about_bg.pos_x, Some(json!("50%")));
    }

    #[test]
    fn test_current_section_key_wins() {
        let doc = migrate(&json!({
            "textColors": {"products": "#111", "brands": "#222"}
        }));
        let colors = doc.text_colors.unwrap();
        assert_eq!(colors.len(), 1);
        assert_eq!(colors["brands"], "#222");
    }

    #[test]
    fn test_partial_colors_filled() {
        let doc = migrate(&json!({"colors": {"headerBg": "#667eea", "menuBg": "#000"}}));
        assert_eq!(doc.colors.header_bg, "#667eea");
        assert_eq!(doc.colors.main_bg, "#f4f4f4");
        assert_eq!(doc.colors.menu_bg.as_deref(), Some("#000"));
    }

    #[test]
    fn test_unparseable_optional_groups_omitted() {
        let doc = migrate(&json!({
            "textColors": "red",
            "sectionBackgrounds": [1, 2],
            "headerSizes": {"menuHeight": "15px", "bad": 3}
        }));
        assert!(doc.text_colors.is_none());
        assert!(doc.section_backgrounds.is_none());
        let sizes = doc.header_sizes.unwrap();
        assert_eq!(sizes.len(), 1);
        assert_eq!(sizes["menuHeight"], "15px");
    }

    #[test]
    fn test_missing_and_duplicate_ids_assigned() {
        let doc = migrate(&json!({
            "articles": [
                {"id": 2, "name": "a"},
                {"name": "b"},
                {"id": 2, "name": "c"},
                {"id": "5", "name": "d"},
                "not an article"
            ]
        }));
        let ids: Vec<u64> = doc.articles.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![2, 6, 7, 5]);
    }

    #[test]
    fn test_phones_filtering() {
        let doc = migrate(&json!({"phones": ["+380 67 000 00 00", "  ", 42, "+380 50 111 11 11"]}));
        assert_eq!(doc.phones, vec!["+380 67 000 00 00", "+380 50 111 11 11"]);

        let doc = migrate(&json!({"phones": "111\n\n222\n"}));
        assert_eq!(doc.phones, vec!["111", "222"]);
    }

    #[test]
    fn test_unknown_fields_preserved_in_order() {
        let doc = migrate(&json!({
            "sectionHeights": {"about": "400px"},
            "logo": "images/logo.png",
            "menuUnderlineColor": "#f00"
        }));
        let keys: Vec<&String> = doc.extra.keys().collect();
        assert_eq!(keys, vec!["sectionHeights", "menuUnderlineColor"]);
        assert_eq!(doc.logo, "images/logo.png");
    }

    #[test]
    fn test_fresh_ids_after_max_id_are_unique() {
        let raw = json!({
            "brands": [
                {"id": u64::MAX, "name": "A", "description": "a", "image": ""},
                {"name": "B", "description": "b", "image": ""},
                {"id": u64::MAX, "name": "C", "description": "c", "image": ""}
            ]
        });

        let doc = migrate(&raw);
        let ids: Vec<u64> = doc.brands.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![u64::MAX, 1, 2]);
    }

    #[test]
    fn test_migration_is_idempotent() {
        let raw = json!({
            "logo": "data:image/png;base64,AAAA",
            "address": "Kyiv",
            "phones": ["1", "", "2"],
            "aboutText": "<b>About</b>",
            "products": [
                {"id": "3", "name": "X", "description": "Y", "image": "", "price": 12.5},
                {"name": "Z", "description": "W", "image": ""}
            ],
            "articles": [{"id": 1, "name": "A", "excerpt": "E", "image": "", "content": "C"}],
            "colors": {"headerBg": 5, "accent": "#abc"},
            "textColors": {"products": "#111"},
            "contactColors": {"phones": "#222"},
            "logoSize": {"width": "80px", "height": "40px"},
            "sectionBackgrounds": {"products": "images/p.jpg", "footer": {"image": "x", "opacity": "30"}},
            "fonts": {"body": "Roboto"}
        });

        let once = migrate(&raw);
        let twice = remigrate(&once);
        assert_eq!(once, twice);
        assert_eq!(SchemaShape::detect(&serde_json::to_value(&once).unwrap()), SchemaShape::Current);
    }
}
