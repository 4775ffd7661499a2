//! Hypermedia link synthesis.
//!
//! Representations handed to protocol adapters carry a set of named action
//! descriptors — what can be done next and where. Targets are logical
//! references; the adapter resolves them to concrete addresses (URL, field
//! path, RPC method), which keeps this module protocol-agnostic.

use crate::catalog::destination::Destination;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Relation of an action to the representation carrying it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum LinkRelation {
    /// The representation itself.
    #[serde(rename = "self")]
    SelfLink,
    /// Full replacement of the record.
    Update,
    /// Partial update of the record.
    PartialUpdate,
    /// Removal of the record.
    Delete,
    /// The containing collection.
    Collection,
    /// Creation of a new record in the collection.
    Create,
}

/// The operation an adapter should map a link onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrudOperation {
    Read,
    Replace,
    Patch,
    Delete,
    List,
    Create,
}

/// Logical reference an adapter resolves to a concrete address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LinkTarget {
    Destination { id: u64 },
    Collection,
}

impl fmt::Display for LinkTarget {
    /// Canonical path form, convenient for REST-shaped adapters.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkTarget::Destination { id } => write!(f, "/destinations/{}", id),
            LinkTarget::Collection => write!(f, "/destinations"),
        }
    }
}

/// One related action: where it points and what it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub target: LinkTarget,
    pub operation: CrudOperation,
}

/// Named action set attached to a representation.
pub type LinkSet = BTreeMap<LinkRelation, ActionDescriptor>;

/// A record representation decorated with its action set — the shape every
/// adapter returns for a single destination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DestinationView {
    #[serde(flatten)]
    pub destination: Destination,
    pub links: LinkSet,
}

impl DestinationView {
    /// Decorate a record with self, update, partial-update and delete
    /// actions, plus the collection when asked for.
    pub fn decorate(destination: &Destination, include_collection_link: bool) -> Self {
        let record = LinkTarget::Destination {
            id: destination.id,
        };

        let mut links = LinkSet::new();
        links.insert(
            LinkRelation::SelfLink,
            ActionDescriptor {
                target: record,
                operation: CrudOperation::Read,
            },
        );
        links.insert(
            LinkRelation::Update,
            ActionDescriptor {
                target: record,
                operation: CrudOperation::Replace,
            },
        );
        links.insert(
            LinkRelation::PartialUpdate,
            ActionDescriptor {
                target: record,
                operation: CrudOperation::Patch,
            },
        );
        links.insert(
            LinkRelation::Delete,
            ActionDescriptor {
                target: record,
                operation: CrudOperation::Delete,
            },
        );
        if include_collection_link {
            links.insert(
                LinkRelation::Collection,
                ActionDescriptor {
                    target: LinkTarget::Collection,
                    operation: CrudOperation::List,
                },
            );
        }

        Self {
            destination: destination.clone(),
            links,
        }
    }
}

/// A collection representation: total count, decorated members, and the
/// collection's own action set (list + create).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionView {
    pub count: usize,
    pub data: Vec<DestinationView>,
    pub links: LinkSet,
}

impl CollectionView {
    pub fn assemble(items: &[Destination], total: usize) -> Self {
        let data = items
            .iter()
            .map(|destination| DestinationView::decorate(destination, false))
            .collect();

        let mut links = LinkSet::new();
        links.insert(
            LinkRelation::SelfLink,
            ActionDescriptor {
                target: LinkTarget::Collection,
                operation: CrudOperation::List,
            },
        );
        links.insert(
            LinkRelation::Create,
            ActionDescriptor {
                target: LinkTarget::Collection,
                operation: CrudOperation::Create,
            },
        );

        Self {
            count: total,
            data,
            links,
        }
    }
}

/// Action set attached to a not-found error so the caller can recover
/// navigation: the collection reference, nothing else.
pub fn recovery_links() -> LinkSet {
    let mut links = LinkSet::new();
    links.insert(
        LinkRelation::Collection,
        ActionDescriptor {
            target: LinkTarget::Collection,
            operation: CrudOperation::List,
        },
    );
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn barcelona() -> Destination {
        Destination {
            id: 4,
            name: "Barcelona".into(),
            country: "Spain".into(),
            price_per_day: 130.0,
            activities: vec!["Sagrada Familia".into()],
        }
    }

    #[test]
    fn decorated_record_carries_the_four_record_actions() {
        let view = DestinationView::decorate(&barcelona(), false);
        assert_eq!(view.links.len(), 4);
        assert_eq!(
            view.links[&LinkRelation::SelfLink],
            ActionDescriptor {
                target: LinkTarget::Destination { id: 4 },
                operation: CrudOperation::Read,
            }
        );
        assert!(!view.links.contains_key(&LinkRelation::Collection));
    }

    #[test]
    fn collection_link_is_opt_in() {
        let view = DestinationView::decorate(&barcelona(), true);
        assert_eq!(
            view.links[&LinkRelation::Collection].operation,
            CrudOperation::List
        );
    }

    #[test]
    fn view_serializes_to_the_adapter_shape() {
        let rendered = serde_json::to_value(DestinationView::decorate(&barcelona(), true)).unwrap();
        assert_eq!(rendered["id"], json!(4));
        assert_eq!(rendered["pricePerDay"], json!(130.0));
        assert_eq!(rendered["links"]["self"]["operation"], json!("read"));
        assert_eq!(
            rendered["links"]["partial-update"]["target"],
            json!({ "kind": "destination", "id": 4 })
        );
    }

    #[test]
    fn collection_view_reports_count_and_create() {
        let items = [barcelona()];
        let view = CollectionView::assemble(&items, 1);
        assert_eq!(view.count, 1);
        assert_eq!(view.data.len(), 1);
        assert_eq!(
            view.links[&LinkRelation::Create].operation,
            CrudOperation::Create
        );
    }

    #[test]
    fn not_found_keeps_a_way_back_to_the_collection() {
        let links = recovery_links();
        assert_eq!(links.len(), 1);
        assert_eq!(
            links[&LinkRelation::Collection].target,
            LinkTarget::Collection
        );
    }

    #[test]
    fn logical_targets_render_canonical_paths() {
        assert_eq!(
            LinkTarget::Destination { id: 7 }.to_string(),
            "/destinations/7"
        );
        assert_eq!(LinkTarget::Collection.to_string(), "/destinations");
    }
}
