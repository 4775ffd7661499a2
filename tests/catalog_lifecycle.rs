//! End-to-end lifecycle of the catalog: create, conflict, list, delete.

mod common;

use common::{ctx, rome_draft, seeded_store};
use futures::future::join_all;
use std::collections::HashSet;
use travel_catalog::{
    CatalogError, CollectionView, CrudOperation, DestinationDraft, DestinationStore,
    DestinationView, LinkRelation, ListFilter, ValidationError, recovery_links,
};

/// Creating Rome on top of the four seeded records yields a fresh id and
/// a reference to the new resource.
#[tokio::test]
async fn create_assigns_the_next_id_and_a_self_reference() {
    let store = seeded_store();
    let c = ctx();

    let rome = store.create(rome_draft(), &c).await.unwrap();
    assert_eq!(rome.id(), 5);
    assert_eq!(rome.destination().price_per_day, 140.0);
    assert_eq!(rome.destination().activities, vec!["Colosseum".to_string()]);

    let view = DestinationView::decorate(rome.destination(), true);
    let self_link = &view.links[&LinkRelation::SelfLink];
    assert_eq!(self_link.target.to_string(), "/destinations/5");
    assert_eq!(self_link.operation, CrudOperation::Read);
}

/// The same natural key a second time is rejected with a reference to the
/// first record, and the store is left unchanged.
#[tokio::test]
async fn duplicate_natural_key_is_rejected_with_a_reference() {
    let store = seeded_store();
    let c = ctx();

    let rome = store.create(rome_draft(), &c).await.unwrap();

    // Case differs on both fields; still the same natural key.
    let err = store
        .create(DestinationDraft::new("rome", "ITALY", 99.0), &c)
        .await
        .unwrap_err();

    match &err {
        CatalogError::Conflict {
            name,
            country,
            existing_id,
        } => {
            assert_eq!(name, "rome");
            assert_eq!(country, "ITALY");
            assert_eq!(*existing_id, rome.id());
        }
        other => panic!("expected Conflict, got {:?}", other),
    }
    assert_eq!(err.conflicting_id(), Some(rome.id()));

    // Still exactly one Rome.
    let snapshot = store.list(&ListFilter::country("Italy"), &c).await;
    assert_eq!(snapshot.total, 1);
    assert_eq!(store.len().await, 5);
}

#[tokio::test]
async fn create_without_required_fields_is_a_validation_error() {
    let store = seeded_store();

    let err = store
        .create(
            DestinationDraft {
                name: Some("Rome".into()),
                ..DestinationDraft::default()
            },
            &ctx(),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CatalogError::Validation(ValidationError::MissingRequiredField { field: "country" })
    ));
    assert_eq!(store.len().await, 4);
}

/// Deleting twice reports "absent" both times — success first, NotFound
/// second. The second call deliberately does not report success even
/// though the end state is the same either way.
#[tokio::test]
async fn delete_twice_reports_not_found_the_second_time() {
    let store = seeded_store();
    let c = ctx();

    let rome = store.create(rome_draft(), &c).await.unwrap();

    store.delete(rome.id(), None, &c).await.unwrap();
    assert!(store.get(rome.id(), &c).await.is_err());

    let err = store.delete(rome.id(), None, &c).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound { id } if id == rome.id()));
}

#[tokio::test]
async fn not_found_responses_keep_a_collection_affordance() {
    let store = seeded_store();
    let err = store.get(99, &ctx()).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound { id: 99 }));

    // The adapter attaches this to its error payload so the caller can
    // navigate back to the collection.
    let links = recovery_links();
    assert!(links.contains_key(&LinkRelation::Collection));
}

#[tokio::test]
async fn collection_view_reports_count_and_create_affordance() {
    let store = seeded_store();
    let snapshot = store.list(&ListFilter::max_price(160.0), &ctx()).await;

    let view = CollectionView::assemble(&snapshot.items, snapshot.total);
    assert_eq!(view.count, 2); // Paris 150, Barcelona 130
    assert_eq!(
        view.links[&LinkRelation::Create].operation,
        CrudOperation::Create
    );
    // Members carry their own record-level actions.
    assert!(view.data[0].links.contains_key(&LinkRelation::Delete));
}

/// Ids stay unique and strictly increasing under concurrent creates.
#[tokio::test]
async fn concurrent_creates_never_share_an_id() {
    let store = DestinationStore::new();
    common::init_logging();

    let creates = (0..16).map(|i| {
        let store = store.clone();
        async move {
            store
                .create(
                    DestinationDraft::new(format!("City {}", i), format!("Country {}", i), 50.0),
                    &ctx(),
                )
                .await
                .unwrap()
                .id()
        }
    });

    let ids: Vec<u64> = join_all(creates).await;
    let unique: HashSet<u64> = ids.iter().copied().collect();
    assert_eq!(unique.len(), 16);
    assert_eq!(*ids.iter().max().unwrap(), 16);
}
