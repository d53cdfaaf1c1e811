//! Node identifiers, record-kind names and content fingerprints.
//!
//! Everything here is a pure function of its inputs: the same business
//! identifier and the same page markup always yield the same ids and digests.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::{NodeKind, OptionsError};

/// Prefix shared by every node id and type name this source emits.
const NAMESPACE: &str = "trust";

/// Names derived from the configured business identifier.
///
/// Built once per run and passed to every component that needs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessNames {
    /// Lowercase first segment of the business identifier (`acme` for
    /// `acme.co.uk`).
    pub slug: String,
    /// The slug with its first character uppercased (`Acme`).
    pub capitalized: String,
}

impl BusinessNames {
    /// Derives the slug and its capitalized form from a dotted business
    /// identifier.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::InvalidBusiness`] if the first segment is
    /// empty.
    pub fn from_business(business: &str) -> Result<Self, OptionsError> {
        let slug = business
            .split('.')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        let mut chars = slug.chars();
        let Some(first) = chars.next() else {
            return Err(OptionsError::InvalidBusiness {
                value: business.to_string(),
            });
        };
        let capitalized = first.to_uppercase().chain(chars).collect();

        Ok(Self { slug, capitalized })
    }

    /// Type name of the business node, e.g. `TrustAcme`.
    #[must_use]
    pub fn business_type(&self) -> String {
        format!("Trust{}", self.capitalized)
    }

    /// Type name of review nodes, e.g. `TrustAcmeReview`.
    #[must_use]
    pub fn review_type(&self) -> String {
        format!("Trust{}Review", self.capitalized)
    }

    /// Type name for the given record kind.
    #[must_use]
    pub fn type_name(&self, kind: NodeKind) -> String {
        match kind {
            NodeKind::Business => self.business_type(),
            NodeKind::Review => self.review_type(),
        }
    }

    /// Maps a type name back to the record kind, if it is one of ours.
    #[must_use]
    pub fn kind_of(&self, type_name: &str) -> Option<NodeKind> {
        [NodeKind::Business, NodeKind::Review]
            .into_iter()
            .find(|kind| self.type_name(*kind) == type_name)
    }
}

/// Node id of a review: namespace, business slug and the review's own
/// element id.
#[must_use]
pub fn review_id(slug: &str, local_id: &str) -> String {
    format!("{NAMESPACE}-{slug}-review-{local_id}")
}

/// Node id of the business summary.
#[must_use]
pub fn business_id(slug: &str) -> String {
    format!("{NAMESPACE}-{slug}")
}

/// SHA-256 hex digest of a record's canonical JSON form.
///
/// The record is first converted to a [`serde_json::Value`], whose maps keep
/// keys sorted, so the digest does not depend on field order.
///
/// # Errors
///
/// Returns [`serde_json::Error`] if the record cannot be represented as JSON
/// (e.g. a map with non-string keys).
pub fn fingerprint<T: Serialize + ?Sized>(record: &T) -> Result<String, serde_json::Error> {
    let canonical = serde_json::to_value(record)?;
    let bytes = serde_json::to_vec(&canonical)?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use super::*;
    use crate::BusinessRecord;

    fn business() -> BusinessRecord {
        BusinessRecord {
            review_count_label: "Reviews 1,024".to_string(),
            rating_image_url: "https://cdn.example.com/stars-4.5.svg".to_string(),
            rating_image_alt: "4.5 stars".to_string(),
            trust_score_label: "TrustScore 4.5".to_string(),
        }
    }

    #[test]
    fn derives_slug_and_type_names() {
        let names = BusinessNames::from_business("acme.co.uk").unwrap();
        assert_eq!(names.slug, "acme");
        assert_eq!(names.capitalized, "Acme");
        assert_eq!(names.business_type(), "TrustAcme");
        assert_eq!(names.review_type(), "TrustAcmeReview");
    }

    #[test]
    fn slug_is_lowercased() {
        let names = BusinessNames::from_business("TrustPilot.com").unwrap();
        assert_eq!(names.slug, "trustpilot");
        assert_eq!(names.capitalized, "Trustpilot");
    }

    #[test]
    fn rejects_empty_first_segment() {
        assert!(BusinessNames::from_business(".com").is_err());
        assert!(BusinessNames::from_business("").is_err());
    }

    #[test]
    fn kind_of_recognizes_only_owned_types() {
        let names = BusinessNames::from_business("acme.com").unwrap();
        assert_eq!(names.kind_of("TrustAcme"), Some(NodeKind::Business));
        assert_eq!(names.kind_of("TrustAcmeReview"), Some(NodeKind::Review));
        assert_eq!(names.kind_of("TrustOtherReview"), None);
        assert_eq!(names.kind_of("File"), None);
    }

    #[test]
    fn ids_are_deterministic() {
        assert_eq!(review_id("acme", "5e1f"), "trust-acme-review-5e1f");
        assert_eq!(review_id("acme", "5e1f"), review_id("acme", "5e1f"));
        assert_eq!(business_id("acme"), "trust-acme");
        assert_eq!(business_id("acme"), business_id("acme"));
        assert_ne!(review_id("acme", "a"), review_id("acme", "b"));
    }

    #[test]
    fn fingerprint_is_stable_across_calls() {
        let record = business();
        assert_eq!(fingerprint(&record).unwrap(), fingerprint(&record).unwrap());
        assert_eq!(fingerprint(&record).unwrap().len(), 64);
    }

    #[test]
    fn fingerprint_ignores_field_order() {
        let mut forward = HashMap::new();
        forward.insert("a", "1");
        forward.insert("b", "2");
        forward.insert("c", "3");

        let mut reverse = BTreeMap::new();
        reverse.insert("c", "3");
        reverse.insert("b", "2");
        reverse.insert("a", "1");

        assert_eq!(fingerprint(&forward).unwrap(), fingerprint(&reverse).unwrap());
    }

    #[test]
    fn fingerprint_changes_with_any_field() {
        let base = fingerprint(&business()).unwrap();

        let mut changed = business();
        changed.review_count_label = "Reviews 1,025".to_string();
        assert_ne!(fingerprint(&changed).unwrap(), base);

        let mut changed = business();
        changed.rating_image_alt = "4 stars".to_string();
        assert_ne!(fingerprint(&changed).unwrap(), base);

        let mut changed = business();
        changed.trust_score_label = "TrustScore 4.4".to_string();
        assert_ne!(fingerprint(&changed).unwrap(), base);
    }
}
