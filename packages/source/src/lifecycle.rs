//! Entry points the host calls.
//!
//! [`source_nodes`] runs once per build: it validates the options, derives
//! the business names and performs the fetch-extract-create pass.
//! [`node_created`] runs for every node the store reports as created and
//! mirrors its rating glyph when the node is one of ours.

use trust_reviews_source_models::{BusinessNames, Node, SourceOptions};

use crate::SourceError;
use crate::cache::RemoteFileCache;
use crate::fetch::PageFetcher;
use crate::mirror;
use crate::pipeline::{self, RunReport};
use crate::store::NodeStore;

/// Sources all nodes for the configured business.
///
/// # Errors
///
/// Returns [`SourceError::Options`] for invalid options, otherwise see
/// [`pipeline::run`].
pub async fn source_nodes(
    options: &SourceOptions,
    fetcher: &dyn PageFetcher,
    store: &dyn NodeStore,
) -> Result<RunReport, SourceError> {
    options.validate()?;
    let names = BusinessNames::from_business(&options.business)?;

    pipeline::run(options, &names, fetcher, store).await
}

/// Node-created hook. Filters to the two record kinds derived from
/// `options` and mirrors the node's rating glyph.
///
/// # Errors
///
/// Returns [`SourceError::Options`] if the business identifier is unusable.
pub async fn node_created(
    node: &mut Node,
    options: &SourceOptions,
    cache: &dyn RemoteFileCache,
) -> Result<bool, SourceError> {
    let names = BusinessNames::from_business(&options.business)?;
    Ok(mirror::on_create_node(node, &names, cache).await)
}
