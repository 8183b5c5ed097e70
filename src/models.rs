//! Data models for BBC Monitoring API responses.
//!
//! - [`Article`]: a product fetched by id, with its `bodyHtml` fragment
//! - [`SearchResult`]: the raw JSON returned by a headline search
//!
//! The API's schema is not owned by this crate. Both types keep the JSON
//! exactly as the service returned it; `bodyHtml` and `title` are read on
//! demand.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A product returned by `GET product/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Article(pub Map<String, Value>);

impl Article {
    /// Look up a provider field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// The article's HTML, when `bodyHtml` is a string.
    pub fn body_html(&self) -> Option<&str> {
        self.field("bodyHtml").and_then(Value::as_str)
    }

    /// The headline, when the product has one.
    pub fn title(&self) -> Option<&str> {
        self.field("title").and_then(Value::as_str)
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// The response of a headline search, passed through unmodified.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SearchResult(pub Value);

impl SearchResult {
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}
