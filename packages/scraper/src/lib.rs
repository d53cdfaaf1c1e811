#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! HTML extraction for Trustpilot business review pages.
//!
//! [`extract`] walks a parsed page, turns every `.review` fragment into a
//! [`ReviewDraft`] and then reads the page-level aggregate block into a single
//! [`BusinessDraft`]. Extraction is synchronous and all-or-nothing: optional
//! fields resolve to `None`, while a missing required field aborts the whole
//! page with an [`ExtractError`].
//!
//! This crate performs no I/O. Callers fetch the body themselves and hand
//! over either the raw HTML ([`extract_html`]) or a parsed [`Html`] document.

pub mod business;
pub mod fields;
pub mod review;

use std::collections::HashSet;

use scraper::{Html, Selector};
use trust_reviews_source_models::{BusinessDraft, BusinessNames, ReviewDraft, business_id};
use url::Url;

/// Errors that can occur while extracting records from a page.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// A review fragment lacks a field every review must have.
    #[error("Missing required field '{field}' in {scope}")]
    MissingField {
        /// Where the field was looked up (e.g. `review 5e1f`).
        scope: String,
        /// Name of the missing field.
        field: &'static str,
    },

    /// Two review fragments on the page share an id.
    #[error("Duplicate review id '{id}'")]
    DuplicateReview {
        /// The repeated fragment id.
        id: String,
    },

    /// The page-level aggregate block is missing or incomplete.
    #[error("Missing aggregate block field '{field}'")]
    MissingAggregate {
        /// Name of the missing field.
        field: &'static str,
    },

    /// The embedded review-dates JSON could not be parsed.
    #[error("Invalid review dates in {scope}: {source}")]
    Dates {
        /// Where the JSON was found.
        scope: String,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// A link or image reference could not be resolved against the site
    /// origin.
    #[error("Invalid link '{href}' in {scope}: {source}")]
    Link {
        /// Where the link was found.
        scope: String,
        /// The raw attribute value.
        href: String,
        /// Underlying URL error.
        source: url::ParseError,
    },

    /// A built-in CSS selector failed to parse.
    #[error("Invalid CSS selector '{selector}': {message}")]
    Selector {
        /// The selector text.
        selector: &'static str,
        /// Parser message.
        message: String,
    },
}

/// Everything extracted from one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Reviews in document order.
    pub reviews: Vec<ReviewDraft>,
    /// The business summary. Its `children` lists the ids of `reviews`.
    pub business: BusinessDraft,
}

/// Extracts all reviews and the business summary from a parsed page.
///
/// `site_origin` is the base that relative review links and image
/// references are resolved against.
///
/// # Errors
///
/// Returns [`ExtractError`] if any review lacks a required field, two
/// reviews share an id, or the aggregate block is missing.
pub fn extract(
    document: &Html,
    site_origin: &Url,
    names: &BusinessNames,
) -> Result<Extraction, ExtractError> {
    let review_sel = parse_selector(review::REVIEW_SELECTOR)?;
    let selectors = review::ReviewSelectors::new()?;

    let reviews = document
        .select(&review_sel)
        .map(|fragment| review::extract_review(fragment, &selectors, site_origin, names))
        .collect::<Result<Vec<_>, _>>()?;

    let mut seen = HashSet::with_capacity(reviews.len());
    if let Some(duplicate) = reviews.iter().find(|draft| !seen.insert(draft.id.as_str())) {
        return Err(ExtractError::DuplicateReview {
            id: duplicate.id.clone(),
        });
    }

    log::debug!("[{}] Extracted {} review fragments", names.slug, reviews.len());

    let record = business::extract_business(document, site_origin)?;
    let children = reviews.iter().map(|draft| draft.id.clone()).collect();

    Ok(Extraction {
        reviews,
        business: BusinessDraft {
            id: business_id(&names.slug),
            record,
            children,
        },
    })
}

/// Parses `body` and runs [`extract`] on it.
///
/// The parsed document is dropped before returning, so this can be called
/// from async code without holding the (non-`Send`) DOM across an await.
///
/// # Errors
///
/// See [`extract`].
pub fn extract_html(
    body: &str,
    site_origin: &Url,
    names: &BusinessNames,
) -> Result<Extraction, ExtractError> {
    let document = Html::parse_document(body);
    extract(&document, site_origin, names)
}

/// Parses a CSS selector, returning an [`ExtractError`] on failure.
pub(crate) fn parse_selector(selector: &'static str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::Selector {
        selector,
        message: e.to_string(),
    })
}
