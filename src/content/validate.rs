//! Admin form validation

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use super::document::{Article, Brand};

lazy_static! {
    static ref NON_DIGIT: Regex = Regex::new(r"\D").unwrap();
}

/// A required form field was left empty
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Required field is empty: {field}")]
pub struct ValidationError {
    pub field: &'static str,
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError { field })
    } else {
        Ok(())
    }
}

impl Brand {
    /// Check the fields the brand form requires
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("description", &self.description)
    }
}

impl Article {
    /// Check the fields the article form requires
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("excerpt", &self.excerpt)?;
        require("content", &self.content)
    }
}

/// Split textarea input into phone numbers, one per non-blank line
pub fn parse_phone_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// `tel:` link for a phone number, keeping digits only
pub fn phone_href(phone: &str) -> String {
    format!("tel:{}", NON_DIGIT.replace_all(phone, ""))
}
