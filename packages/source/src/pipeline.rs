//! Single-shot fetch, extract and create pass.

use trust_reviews_scraper::extract_html;
use trust_reviews_source_models::{BusinessNames, Node, SourceOptions};
use url::Url;

use crate::fetch::PageFetcher;
use crate::nodes::build_nodes;
use crate::store::NodeStore;
use crate::{SourceError, request_url, site_origin};

/// Outcome of one [`run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Number of review nodes created.
    pub reviews: usize,
    /// Id of the business node, if one was created.
    pub business_id: Option<String>,
}

impl RunReport {
    /// Whether the run created nothing (the fetch failed).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.business_id.is_none()
    }
}

/// Fetches the review page once and creates its nodes.
///
/// A transport failure is logged and yields an empty report: no records, no
/// retry. Everything after the fetch is all-or-nothing: the page is fully
/// extracted and fingerprinted before the first node reaches `store`, so an
/// extraction error leaves the store untouched.
///
/// # Errors
///
/// Returns [`SourceError`] if the page markup is not as expected, the URL
/// cannot be built, or the store rejects a node.
pub async fn run(
    options: &SourceOptions,
    names: &BusinessNames,
    fetcher: &dyn PageFetcher,
    store: &dyn NodeStore,
) -> Result<RunReport, SourceError> {
    let url = request_url(options)?;
    let origin = site_origin(&options.country)?;

    log::info!("[{}] Fetching reviews from {url}", names.slug);

    let body = match fetcher.fetch(&url).await {
        Ok(body) => body,
        Err(e) => {
            log::error!("[{}] Failed to fetch {url}: {e}", names.slug);
            return Ok(RunReport::default());
        }
    };

    let nodes = page_nodes(&body, &origin, names)?;
    let reviews = nodes.len() - 1;
    let business_id = nodes.last().map(|node| node.id.clone());

    for node in nodes {
        store.create_node(node).await?;
    }

    log::info!("[{}] Created {reviews} review nodes and 1 business node", names.slug);

    Ok(RunReport {
        reviews,
        business_id,
    })
}

/// Extracts and fingerprints every node of a page without suspending.
fn page_nodes(body: &str, origin: &Url, names: &BusinessNames) -> Result<Vec<Node>, SourceError> {
    let extraction = extract_html(body, origin, names)?;
    Ok(build_nodes(extraction, names)?)
}
