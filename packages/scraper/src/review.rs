//! Extraction of a single `.review` fragment.

use scraper::{ElementRef, Selector};
use serde::Deserialize;
use trust_reviews_source_models::{BusinessNames, ReviewDraft, ReviewRecord, review_id};
use url::Url;

use crate::fields::{
    optional_text, required_attr, required_element, required_text, resolve, text_content,
};
use crate::{ExtractError, parse_selector};

/// Selects every review fragment on the page.
pub const REVIEW_SELECTOR: &str = ".review";

/// Selectors used inside a review fragment, parsed once per page.
#[derive(Debug)]
pub struct ReviewSelectors {
    name: Selector,
    location: Selector,
    rating: Selector,
    dates: Selector,
    title_link: Selector,
    text: Selector,
}

impl ReviewSelectors {
    /// Parses the built-in review selectors.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Selector`] if a selector fails to parse.
    pub fn new() -> Result<Self, ExtractError> {
        Ok(Self {
            name: parse_selector(".consumer-information__name")?,
            location: parse_selector(".consumer-information__location span")?,
            rating: parse_selector(".star-rating img")?,
            dates: parse_selector(".review-content-header__dates script")?,
            title_link: parse_selector(".review-content__title .link")?,
            text: parse_selector(".review-content__text")?,
        })
    }
}

/// JSON embedded in each review's dates header.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewDates {
    published_date: String,
}

/// Extracts one review fragment.
///
/// # Errors
///
/// Returns [`ExtractError`] if the fragment has no `id` attribute, lacks a
/// required field, or embeds unparsable dates.
pub fn extract_review(
    fragment: ElementRef<'_>,
    selectors: &ReviewSelectors,
    site_origin: &Url,
    names: &BusinessNames,
) -> Result<ReviewDraft, ExtractError> {
    let local_id = fragment
        .value()
        .id()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ExtractError::MissingField {
            scope: "review".to_owned(),
            field: "id",
        })?;
    let scope = format!("review {local_id}");

    let rating = required_element(fragment, &selectors.rating, &scope, "rating")?;
    let rating_src = required_attr(rating, "src", &scope, "ratingImageUrl")?;
    let link = required_element(fragment, &selectors.title_link, &scope, "title")?;
    let href = required_attr(link, "href", &scope, "permalink")?;

    let record = ReviewRecord {
        author_name: required_text(fragment, &selectors.name, &scope, "authorName")?,
        rating_image_url: resolve(site_origin, &rating_src, &scope)?,
        rating_image_alt: required_attr(rating, "alt", &scope, "ratingImageAlt")?,
        author_location: optional_text(fragment, &selectors.location),
        published_date: published_date(fragment, selectors, &scope)?,
        title: text_content(link).trim().to_owned(),
        permalink: resolve(site_origin, &href, &scope)?,
        body_text: optional_text(fragment, &selectors.text),
    };

    Ok(ReviewDraft {
        id: review_id(&names.slug, local_id),
        record,
    })
}

fn published_date(
    fragment: ElementRef<'_>,
    selectors: &ReviewSelectors,
    scope: &str,
) -> Result<String, ExtractError> {
    let script = required_element(fragment, &selectors.dates, scope, "publishedDate")?;
    let dates: ReviewDates =
        serde_json::from_str(&text_content(script)).map_err(|source| ExtractError::Dates {
            scope: scope.to_owned(),
            source,
        })?;
    Ok(dates.published_date)
}
