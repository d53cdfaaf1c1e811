//! Field accessors shared by the review and business extractors.
//!
//! Optional lookups return `Option`; required lookups turn absence into an
//! [`ExtractError`] so callers can short-circuit with `?`.

use scraper::{ElementRef, Selector};
use url::Url;

use crate::ExtractError;

/// Concatenated text content of an element, like the DOM's `textContent`.
#[must_use]
pub fn text_content(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join("")
}

/// Trimmed text of the first match, or `None` if nothing matches or the
/// match holds only whitespace.
#[must_use]
pub fn optional_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(|el| text_content(el).trim().to_owned())
        .filter(|text| !text.is_empty())
}

/// First element matching `selector` below `scope`.
///
/// # Errors
///
/// Returns [`ExtractError::MissingField`] naming `field` when nothing
/// matches.
pub fn required_element<'a>(
    scope: ElementRef<'a>,
    selector: &Selector,
    scope_label: &str,
    field: &'static str,
) -> Result<ElementRef<'a>, ExtractError> {
    scope
        .select(selector)
        .next()
        .ok_or_else(|| missing(scope_label, field))
}

/// Trimmed text of the first element matching `selector`.
///
/// # Errors
///
/// Returns [`ExtractError::MissingField`] when nothing matches.
pub fn required_text(
    scope: ElementRef<'_>,
    selector: &Selector,
    scope_label: &str,
    field: &'static str,
) -> Result<String, ExtractError> {
    let element = required_element(scope, selector, scope_label, field)?;
    Ok(text_content(element).trim().to_owned())
}

/// Value of `attr` on `element`.
///
/// # Errors
///
/// Returns [`ExtractError::MissingField`] when the attribute is absent.
pub fn required_attr(
    element: ElementRef<'_>,
    attr: &str,
    scope_label: &str,
    field: &'static str,
) -> Result<String, ExtractError> {
    element
        .value()
        .attr(attr)
        .map(str::to_owned)
        .ok_or_else(|| missing(scope_label, field))
}

/// Resolves a site-relative reference against `origin`. Absolute URLs are
/// returned unchanged.
///
/// # Errors
///
/// Returns [`ExtractError::Link`] if `href` cannot be joined onto `origin`.
pub fn resolve(origin: &Url, href: &str, scope_label: &str) -> Result<String, ExtractError> {
    origin
        .join(href.trim())
        .map(String::from)
        .map_err(|source| ExtractError::Link {
            scope: scope_label.to_owned(),
            href: href.to_owned(),
            source,
        })
}

fn missing(scope_label: &str, field: &'static str) -> ExtractError {
    ExtractError::MissingField {
        scope: scope_label.to_owned(),
        field,
    }
}
