#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Review and business record types for the Trustpilot review source.
//!
//! The scraper produces [`ReviewDraft`] and [`BusinessDraft`] values which
//! carry only the semantic fields read from the page plus their identifiers.
//! The source crate wraps them in a [`Node`] envelope (parent/child links,
//! record-kind name and content digest) before handing them to storage.

pub mod identity;
pub mod options;

use serde::{Deserialize, Serialize};
use strum_macros::Display;

pub use identity::{BusinessNames, business_id, fingerprint, review_id};
pub use options::{OptionsError, SourceOptions};

/// The two record kinds this source owns. Displays in lowercase for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum NodeKind {
    /// The business summary (one per fetch).
    Business,
    /// A single user review.
    Review,
}

/// Semantic fields of a single review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    /// Display name of the reviewer.
    pub author_name: String,
    /// URL of the star-rating glyph image.
    pub rating_image_url: String,
    /// Alt text of the glyph (e.g. "4 stars: Great").
    pub rating_image_alt: String,
    /// Reviewer location. `None` when the page omits it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_location: Option<String>,
    /// ISO-8601 publication timestamp, as embedded in the page.
    pub published_date: String,
    /// Review headline.
    pub title: String,
    /// Absolute URL of the individual review page.
    pub permalink: String,
    /// Review body. `None` for title-only reviews.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_text: Option<String>,
}

/// Semantic fields of the business summary block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessRecord {
    /// Review-count header exactly as displayed (e.g. "Reviews 12,345").
    pub review_count_label: String,
    /// URL of the aggregate star-rating glyph.
    pub rating_image_url: String,
    /// Alt text of the aggregate glyph.
    pub rating_image_alt: String,
    /// Score header exactly as displayed.
    pub trust_score_label: String,
}

/// A review extracted from the page, stamped with its node id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    /// Stable node id (see [`review_id`]).
    pub id: String,
    /// Extracted fields.
    pub record: ReviewRecord,
}

/// The business summary extracted from the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessDraft {
    /// Stable node id (see [`business_id`]).
    pub id: String,
    /// Extracted fields.
    pub record: BusinessRecord,
    /// Review ids extracted in the same pass, in document order.
    pub children: Vec<String>,
}

/// Storage metadata attached to every node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInternal {
    /// Record-kind name, e.g. `TrustAcmeReview`.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Fingerprint of the semantic fields.
    pub content_digest: String,
}

/// Semantic payload of a [`Node`], flattened into the node on output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NodeContent {
    /// Business summary fields.
    Business(BusinessRecord),
    /// Review fields.
    Review(ReviewRecord),
}

impl NodeContent {
    /// Which record kind this payload belongs to.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Business(_) => NodeKind::Business,
            Self::Review(_) => NodeKind::Review,
        }
    }

    /// URL of the rating glyph carried by either kind.
    #[must_use]
    pub fn rating_image_url(&self) -> &str {
        match self {
            Self::Business(record) => &record.rating_image_url,
            Self::Review(record) => &record.rating_image_url,
        }
    }
}

/// A record as handed to the storage collaborator.
///
/// Serializes to a flat mapping: the semantic fields sit next to `id`,
/// `parent`, `children` and `internal`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Node id.
    pub id: String,
    /// Owning business id for reviews, `None` for the business itself.
    pub parent: Option<String>,
    /// Child node ids.
    pub children: Vec<String>,
    /// Type name and content digest.
    pub internal: NodeInternal,
    /// Semantic fields.
    #[serde(flatten)]
    pub content: NodeContent,
    /// Id of the locally cached rating glyph, set by the asset mirror hook.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_file: Option<String>,
}

impl Node {
    /// Shorthand for [`NodeContent::kind`].
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.content.kind()
    }
}
