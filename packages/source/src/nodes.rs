//! Wraps extracted drafts in storage [`Node`] envelopes.

use trust_reviews_scraper::Extraction;
use trust_reviews_source_models::{
    BusinessDraft, BusinessNames, Node, NodeContent, NodeInternal, NodeKind, ReviewDraft,
    fingerprint,
};

/// Builds the review node: parented to the business, digest over the review
/// fields only.
///
/// # Errors
///
/// Returns [`serde_json::Error`] if the record cannot be fingerprinted.
pub fn review_node(
    draft: ReviewDraft,
    business_id: &str,
    names: &BusinessNames,
) -> Result<Node, serde_json::Error> {
    Ok(Node {
        internal: NodeInternal {
            type_name: names.type_name(NodeKind::Review),
            content_digest: fingerprint(&draft.record)?,
        },
        id: draft.id,
        parent: Some(business_id.to_owned()),
        children: Vec::new(),
        content: NodeContent::Review(draft.record),
        rating_file: None,
    })
}

/// Builds the business node with its review ids as children.
///
/// # Errors
///
/// Returns [`serde_json::Error`] if the record cannot be fingerprinted.
pub fn business_node(draft: BusinessDraft, names: &BusinessNames) -> Result<Node, serde_json::Error> {
    Ok(Node {
        internal: NodeInternal {
            type_name: names.type_name(NodeKind::Business),
            content_digest: fingerprint(&draft.record)?,
        },
        id: draft.id,
        parent: None,
        children: draft.children,
        content: NodeContent::Business(draft.record),
        rating_file: None,
    })
}

/// Converts a whole extraction into nodes: reviews in document order, then
/// the business.
///
/// # Errors
///
/// Returns [`serde_json::Error`] if any record cannot be fingerprinted.
pub fn build_nodes(
    extraction: Extraction,
    names: &BusinessNames,
) -> Result<Vec<Node>, serde_json::Error> {
    let Extraction { reviews, business } = extraction;

    let mut nodes = Vec::with_capacity(reviews.len() + 1);
    for draft in reviews {
        nodes.push(review_node(draft, &business.id, names)?);
    }
    nodes.push(business_node(business, names)?);

    Ok(nodes)
}
