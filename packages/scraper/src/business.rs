//! Extraction of the page-level aggregate block.

use scraper::{ElementRef, Html, Selector};
use trust_reviews_source_models::BusinessRecord;
use url::Url;

use crate::fields::{resolve, text_content};
use crate::{ExtractError, parse_selector};

const SCOPE: &str = "aggregate block";

/// Reads the review count, aggregate rating glyph and score header.
///
/// The aggregate glyph is the first `.star-rating img` outside any review
/// fragment, so per-review glyphs earlier in the page are never picked up.
///
/// # Errors
///
/// Returns [`ExtractError::MissingAggregate`] if any part of the block is
/// missing.
pub fn extract_business(document: &Html, site_origin: &Url) -> Result<BusinessRecord, ExtractError> {
    let count_sel = parse_selector(".header--inline")?;
    let rating_sel = parse_selector(".star-rating img")?;
    let score_sel = parse_selector(".header_trustscore")?;

    let count = first(document, &count_sel, "reviewCountLabel")?;
    let rating = document
        .select(&rating_sel)
        .find(|img| !inside_review(*img))
        .ok_or(ExtractError::MissingAggregate {
            field: "rating",
        })?;
    let score = first(document, &score_sel, "trustScoreLabel")?;

    let src = rating
        .value()
        .attr("src")
        .ok_or(ExtractError::MissingAggregate {
            field: "ratingImageUrl",
        })?;
    let alt = rating
        .value()
        .attr("alt")
        .ok_or(ExtractError::MissingAggregate {
            field: "ratingImageAlt",
        })?;

    Ok(BusinessRecord {
        review_count_label: text_content(count).trim().to_owned(),
        rating_image_url: resolve(site_origin, src, SCOPE)?,
        rating_image_alt: alt.to_owned(),
        trust_score_label: text_content(score),
    })
}

fn first<'a>(
    document: &'a Html,
    selector: &Selector,
    field: &'static str,
) -> Result<ElementRef<'a>, ExtractError> {
    document
        .select(selector)
        .next()
        .ok_or(ExtractError::MissingAggregate { field })
}

fn inside_review(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| ancestor.value().classes().any(|class| class == "review"))
}
