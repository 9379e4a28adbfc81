//! Selector normalization
//!
//! Every selector that reaches the renderer is one of the accepted
//! Playwright locator shapes:
//!
//! ```text
//! getByRole(..)  getByLabel(..)  getByText(..)  getByPlaceholder(..)
//! getByTestId(..)  getByAltText(..)  getByTitle(..)  locator(..)
//! ```
//!
//! The page-object template prefixes them with `page.`, so a leading
//! `page.` qualifier is dropped here.

use tracing::debug;

use crate::naming::escape_single_quoted;

/// Accepted locator method shapes
pub const LOCATOR_METHODS: &[&str] = &[
    "getByRole",
    "getByLabel",
    "getByText",
    "getByPlaceholder",
    "getByTestId",
    "getByAltText",
    "getByTitle",
    "locator",
];

const QUALIFIER: &str = "page.";

/// Whether a selector already has one of the accepted shapes
pub fn is_locator_shape(selector: &str) -> bool {
    LOCATOR_METHODS.iter().any(|method| {
        selector
            .strip_prefix(method)
            .map(|rest| rest.starts_with('('))
            .unwrap_or(false)
    })
}

/// Normalize a selector into an accepted shape.
///
/// `#id` becomes a test-id lookup, class and child-combinator CSS is wrapped
/// in the generic form, and anything unrecognised is wrapped as well.
pub fn normalize(selector: &str) -> String {
    let trimmed = selector.trim();
    let selector = trimmed.strip_prefix(QUALIFIER).unwrap_or(trimmed);

    if is_locator_shape(selector) {
        return selector.to_string();
    }

    if let Some(id) = selector.strip_prefix('#') {
        let normalized = format!("getByTestId('{}')", escape_single_quoted(id));
        debug!("Converted id selector {} -> {}", selector, normalized);
        return normalized;
    }

    let normalized = css_locator(selector);
    debug!("Wrapped selector {} -> {}", selector, normalized);
    normalized
}

/// Wrap a raw CSS or Playwright selector-engine string in the generic form
pub fn css_locator(raw: &str) -> String {
    format!("locator('{}')", escape_single_quoted(raw))
}

pub fn role(role: &str, name: &str) -> String {
    format!(
        "getByRole('{}', {{ name: '{}' }})",
        escape_single_quoted(role),
        escape_single_quoted(name)
    )
}

pub fn label(text: &str) -> String {
    format!("getByLabel('{}')", escape_single_quoted(text))
}

pub fn text(text: &str) -> String {
    format!("getByText('{}')", escape_single_quoted(text))
}
