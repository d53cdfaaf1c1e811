#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Trustpilot review source.
//!
//! Fetches one business review page, extracts its reviews and business
//! summary with [`trust_reviews_scraper`], and hands the resulting
//! [`Node`]s to a [`NodeStore`]. A separate hook ([`mirror`]) mirrors the
//! rating glyph of every created node through a [`RemoteFileCache`].
//!
//! The host drives two entry points in [`lifecycle`]: one that sources the
//! nodes once per build and one that runs for every created node.

pub mod cache;
pub mod fetch;
pub mod lifecycle;
pub mod mirror;
pub mod nodes;
pub mod pipeline;
pub mod store;

use trust_reviews_scraper::ExtractError;
use trust_reviews_source_models::{OptionsError, SourceOptions};
use url::Url;

pub use cache::{CacheError, FileNode, FsRemoteFileCache, RemoteFileCache};
pub use fetch::{HttpFetcher, PageFetcher};
pub use store::{ChannelNodeStore, MemoryNodeStore, NodeStore, StoreError};
pub use trust_reviews_source_models::Node;

/// Domain of the review site; the country option is its first label.
pub const SITE_DOMAIN: &str = "trustpilot.com";

/// Errors that can occur during a source run.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A fetcher not backed by `reqwest` failed to retrieve the page.
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// Options failed validation.
    #[error(transparent)]
    Options(#[from] OptionsError),

    /// The page did not have the expected markup.
    #[error("Extraction failed: {0}")]
    Extract(#[from] ExtractError),

    /// A record could not be fingerprinted.
    #[error("Fingerprint error: {0}")]
    Fingerprint(#[from] serde_json::Error),

    /// The request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The storage collaborator rejected a node.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SourceError {
    /// Whether this error happened while talking to the remote site, as
    /// opposed to while interpreting what it returned.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Fetch(_))
    }
}

/// Origin that review links on the page are relative to, e.g.
/// `https://www.trustpilot.com`.
///
/// # Errors
///
/// Returns [`url::ParseError`] if `country` does not form a valid host.
pub fn site_origin(country: &str) -> Result<Url, url::ParseError> {
    Url::parse(&format!("https://{country}.{SITE_DOMAIN}"))
}

/// Builds the review page URL: locale, business path, language filter and
/// one `stars` parameter per selected rating.
///
/// The business is always a single escaped path segment, so it cannot
/// change the query or climb out of `/review/`.
///
/// # Errors
///
/// Returns [`url::ParseError`] if the options do not form a valid URL.
pub fn request_url(options: &SourceOptions) -> Result<Url, url::ParseError> {
    let mut url = site_origin(&options.country)?;

    url.path_segments_mut()
        .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .push("review")
        .push(&options.business);

    {
        let mut query = url.query_pairs_mut();
        query.append_pair("languages", &options.languages);
        for star in &options.stars {
            query.append_pair("stars", &star.to_string());
        }
    }

    Ok(url)
}
