//! Article body text extraction.
//!
//! A product's `bodyHtml` carries the headline block, bylines and other
//! furniture before the article proper. The readable text starts at the first
//! `<p class="text">` paragraph; everything from there on is stripped of
//! markup and flattened into a single line.

use crate::error::ApiError;
use crate::models::Article;
use itertools::Itertools;
use scraper::Html;
use tracing::{debug, instrument};

/// Marks the start of the article text inside `bodyHtml`.
pub const BODY_TEXT_MARKER: &str = r#"<p class="text">"#;

/// Return the plain body text of an article.
///
/// Lines are trimmed and blank lines dropped, then the remaining lines are
/// joined with single spaces. Whitespace inside a line is left alone.
///
/// # Errors
///
/// - [`ApiError::MissingBodyHtml`] if `bodyHtml` is absent or not a string
/// - [`ApiError::MissingBodyMarker`] if `bodyHtml` has no text paragraph
#[instrument(level = "debug", skip_all)]
pub fn extract_body_text(article: &Article) -> Result<String, ApiError> {
    let html = article.body_html().ok_or(ApiError::MissingBodyHtml)?;
    let text = extract_text_after_marker(html)?;
    debug!(html_bytes = html.len(), text_bytes = text.len(), "Extracted body text");
    Ok(text)
}

fn extract_text_after_marker(html: &str) -> Result<String, ApiError> {
    let (_, body) = html
        .split_once(BODY_TEXT_MARKER)
        .ok_or(ApiError::MissingBodyMarker)?;

    let fragment = Html::parse_fragment(body);
    let raw: String = fragment.root_element().text().collect();

    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .join(" "))
}
