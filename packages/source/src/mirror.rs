//! Asset mirror hook.
//!
//! Runs once per created node, after creation and independently of the
//! pipeline. Each invocation owns the node it is given, so many siblings can
//! be mirrored concurrently with nothing shared between them.

use std::sync::Arc;

use tokio::sync::mpsc;
use trust_reviews_source_models::{BusinessNames, Node};

use crate::cache::RemoteFileCache;

/// Mirrors the rating glyph of `node` and attaches the cached file's id as
/// `rating_file`.
///
/// Nodes whose type is not one of the two owned by `names` are left alone.
/// A failed or declined mirror is not an error: the node is kept without
/// the relation. Returns whether a relation was attached.
pub async fn on_create_node(
    node: &mut Node,
    names: &BusinessNames,
    cache: &dyn RemoteFileCache,
) -> bool {
    let Some(kind) = names.kind_of(&node.internal.type_name) else {
        return false;
    };

    let url = node.content.rating_image_url();
    if url.is_empty() {
        return false;
    }

    match cache.create_remote_file_node(url, &node.id).await {
        Ok(Some(file)) => {
            log::debug!("[{}] Mirrored {kind} glyph {} as {}", names.slug, file.url, file.id);
            node.rating_file = Some(file.id);
            true
        }
        Ok(None) => {
            log::debug!("[{}] Cache declined {url} for {kind} {}", names.slug, node.id);
            false
        }
        Err(e) => {
            log::warn!("[{}] Failed to mirror {url} for {kind} {}: {e}", names.slug, node.id);
            false
        }
    }
}

/// Drains node-created notifications, running [`on_create_node`] for each
/// node on its own task.
///
/// Returns once the sending side is dropped and every hook has finished.
/// Nodes come back in the order they were created.
pub async fn mirror_created_nodes(
    mut created: mpsc::UnboundedReceiver<Node>,
    names: Arc<BusinessNames>,
    cache: Arc<dyn RemoteFileCache>,
) -> Vec<Node> {
    let mut handles = Vec::new();

    while let Some(mut node) = created.recv().await {
        let names = Arc::clone(&names);
        let cache = Arc::clone(&cache);
        handles.push(tokio::spawn(async move {
            on_create_node(&mut node, &names, cache.as_ref()).await;
            node
        }));
    }

    let mut nodes = Vec::with_capacity(handles.len());
    for result in futures::future::join_all(handles).await {
        match result {
            Ok(node) => nodes.push(node),
            Err(e) => log::error!("[{}] Mirror task failed: {e}", names.slug),
        }
    }

    let attached = nodes.iter().filter(|node| node.rating_file.is_some()).count();
    log::info!(
        "[{}] Mirrored rating glyphs for {attached}/{} nodes",
        names.slug,
        nodes.len()
    );

    nodes
}
