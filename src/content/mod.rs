//! Content module - the site document, its migration and list helpers

mod document;
mod form;
pub mod list;
mod migrate;
mod validate;

pub use document::{Article, Brand, Colors, Document, SectionBackground};
pub use document::{DEFAULT_HEADER_BG, DEFAULT_MAIN_BG};
pub use form::ItemForm;
pub use list::{ListEntry, ListName};
pub use migrate::{migrate, SchemaShape, BRANDS_KEY, LEGACY_BRANDS_KEY};
pub use validate::{parse_phone_lines, phone_href, ValidationError};
