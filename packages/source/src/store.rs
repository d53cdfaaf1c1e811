//! Storage collaborator.
//!
//! The pipeline only ever calls [`NodeStore::create_node`]. What happens to a
//! node afterwards (persisting, caching, post-processing) belongs to the
//! store. [`ChannelNodeStore`] publishes every created node on a channel so
//! that the asset mirror hook can consume creations independently.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::mpsc;
use trust_reviews_source_models::Node;

/// Errors a store can report when accepting a node.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Nobody is listening for created nodes any more.
    #[error("Node-created channel closed before node '{id}' was delivered")]
    ChannelClosed {
        /// Id of the node that could not be delivered.
        id: String,
    },

    /// A node with the same id was already created.
    #[error("Duplicate node id '{id}'")]
    Duplicate {
        /// The repeated id.
        id: String,
    },
}

/// Receives newly created nodes.
#[async_trait]
pub trait NodeStore: Send + Sync {
    /// Accepts one node.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the node cannot be accepted.
    async fn create_node(&self, node: Node) -> Result<(), StoreError>;
}

/// Keeps created nodes in memory, in creation order.
#[derive(Debug, Default)]
pub struct MemoryNodeStore {
    nodes: Mutex<Vec<Node>>,
}

impl MemoryNodeStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every node created so far.
    #[must_use]
    pub fn nodes(&self) -> Vec<Node> {
        self.nodes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of nodes created so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no node has been created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl NodeStore for MemoryNodeStore {
    async fn create_node(&self, node: Node) -> Result<(), StoreError> {
        let mut nodes = self.nodes.lock().unwrap_or_else(PoisonError::into_inner);
        if nodes.iter().any(|existing| existing.id == node.id) {
            return Err(StoreError::Duplicate { id: node.id });
        }
        nodes.push(node);
        Ok(())
    }
}

/// Emits a node-created notification for every node it accepts.
#[derive(Debug, Clone)]
pub struct ChannelNodeStore {
    tx: mpsc::UnboundedSender<Node>,
}

impl ChannelNodeStore {
    /// Creates a store together with the receiving end of its
    /// notifications.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Node>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl NodeStore for ChannelNodeStore {
    async fn create_node(&self, node: Node) -> Result<(), StoreError> {
        log::trace!("Node created: {} ({})", node.id, node.internal.type_name);
        self.tx
            .send(node)
            .map_err(|e| StoreError::ChannelClosed { id: e.0.id })
    }
}

#[cfg(test)]
pub(crate) mod test_nodes {
    use trust_reviews_source_models::{BusinessRecord, NodeContent, NodeInternal};

    use super::Node;

    pub fn business_node(id: &str, type_name: &str, rating_url: &str) -> Node {
        Node {
            id: id.to_string(),
            parent: None,
            children: Vec::new(),
            internal: NodeInternal {
                type_name: type_name.to_string(),
                content_digest: "digest".to_string(),
            },
            content: NodeContent::Business(BusinessRecord {
                review_count_label: "Reviews 3".to_string(),
                rating_image_url: rating_url.to_string(),
                rating_image_alt: "3 stars".to_string(),
                trust_score_label: "3.0".to_string(),
            }),
            rating_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_nodes::business_node;
    use super::*;

    #[tokio::test]
    async fn memory_store_keeps_creation_order() {
        let store = MemoryNodeStore::new();
        store
            .create_node(business_node("a", "TrustAcme", "https://x/a.svg"))
            .await
            .unwrap();
        store
            .create_node(business_node("b", "TrustAcme", "https://x/b.svg"))
            .await
            .unwrap();

        let ids: Vec<_> = store.nodes().into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn memory_store_rejects_duplicate_ids() {
        let store = MemoryNodeStore::new();
        store
            .create_node(business_node("a", "TrustAcme", "https://x/a.svg"))
            .await
            .unwrap();
        let err = store
            .create_node(business_node("a", "TrustAcme", "https://x/a.svg"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn channel_store_notifies_each_creation() {
        let (store, mut rx) = ChannelNodeStore::new();
        store
            .create_node(business_node("a", "TrustAcme", "https://x/a.svg"))
            .await
            .unwrap();
        assert_eq!(rx.recv().await.unwrap().id, "a");
    }

    #[tokio::test]
    async fn channel_store_reports_closed_receiver() {
        let (store, rx) = ChannelNodeStore::new();
        drop(rx);
        let err = store
            .create_node(business_node("a", "TrustAcme", "https://x/a.svg"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ChannelClosed { id } if id == "a"));
    }
}
