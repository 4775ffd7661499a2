//! The authoritative in-memory destination store.
//!
//! A single [`DestinationStore`] instance owns all shared mutable state:
//! the id-keyed record arena behind a `tokio::sync::RwLock`, the monotonic
//! id counter, and the [`EventBus`] that fans mutation events out to
//! subscribers. Reads take the shared lock and hand out owned copies;
//! writes take the exclusive lock, and any fingerprint precondition is
//! compared and applied inside that same critical section, so no other
//! writer can interleave between check and apply.
//!
//! Events are published after the lock is released — no earlier than the
//! commit, before the operation returns — and a publish problem never
//! fails the mutation itself.

pub mod conditional;
pub mod conflict;

use crate::catalog::context::RequestContext;
use crate::catalog::destination::{
    Destination, DestinationChanges, DestinationDraft, DestinationSummary, ListFilter,
};
use crate::catalog::fingerprint::Fingerprint;
use crate::catalog::versioned::VersionedDestination;
use crate::error::{CatalogError, CatalogResult};
use crate::events::{ChangeEvent, EventBus};
use self::conditional::{CacheValidation, FingerprintMismatch, Precondition, Verdict};
use log::{debug, info, trace, warn};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Thread-safe in-memory destination catalog.
///
/// Cloning is cheap and every clone shares the same arena and event bus,
/// which is how protocol adapters running on separate tasks see one
/// catalog.
#[derive(Debug, Clone)]
pub struct DestinationStore {
    state: Arc<RwLock<CatalogState>>,
    events: EventBus,
}

#[derive(Debug)]
struct CatalogState {
    next_id: u64,
    records: BTreeMap<u64, Destination>,
}

impl CatalogState {
    /// Ids are handed out once and never reused, deletions included.
    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// An ordered, filtered view of the catalog plus its collection
/// fingerprint, used for list responses and collection cache validation.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSnapshot {
    /// Number of records matching the filter.
    pub total: usize,
    /// Matching records in insertion order.
    pub items: Vec<Destination>,
    /// Fingerprint over the ordered `items`.
    pub fingerprint: Fingerprint,
}

impl Default for DestinationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DestinationStore {
    /// Empty catalog; the first created record gets id 1.
    pub fn new() -> Self {
        Self::with_state(1, BTreeMap::new())
    }

    /// Catalog pre-populated with the four demonstration records
    /// (Paris, Tokyo, New York, Barcelona); the next id is 5.
    pub fn seeded() -> Self {
        let records: BTreeMap<u64, Destination> = seed_records()
            .into_iter()
            .map(|record| (record.id, record))
            .collect();
        Self::with_state(5, records)
    }

    fn with_state(next_id: u64, records: BTreeMap<u64, Destination>) -> Self {
        Self {
            state: Arc::new(RwLock::new(CatalogState { next_id, records })),
            events: EventBus::new(),
        }
    }

    /// The bus broadcasting this catalog's mutation events.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Number of live records.
    pub async fn len(&self) -> usize {
        self.state.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.records.is_empty()
    }

    /// Fetch one record with its current fingerprint.
    pub async fn get(
        &self,
        id: u64,
        ctx: &RequestContext,
    ) -> CatalogResult<VersionedDestination> {
        debug!("getting destination {} (request: '{}')", id, ctx.request_id);

        let state = self.state.read().await;
        state
            .records
            .get(&id)
            .cloned()
            .map(VersionedDestination::new)
            .ok_or(CatalogError::NotFound { id })
    }

    /// Cache-validating read: when `cached` still matches the record's
    /// fingerprint the result is [`CacheValidation::NotModified`] and no
    /// representation is materialized.
    pub async fn get_conditional(
        &self,
        id: u64,
        cached: Option<&Fingerprint>,
        ctx: &RequestContext,
    ) -> CatalogResult<CacheValidation<VersionedDestination>> {
        let versioned = self.get(id, ctx).await?;

        match Precondition::for_read(cached).check(versioned.fingerprint()) {
            Verdict::NotModified => {
                debug!(
                    "destination {} unchanged for cached token (request: '{}')",
                    id, ctx.request_id
                );
                Ok(CacheValidation::NotModified)
            }
            _ => Ok(CacheValidation::Refreshed(versioned)),
        }
    }

    /// List records in insertion order, applying the conjunctive filter.
    pub async fn list(&self, filter: &ListFilter, ctx: &RequestContext) -> CollectionSnapshot {
        debug!(
            "listing destinations with {:?} (request: '{}')",
            filter, ctx.request_id
        );

        let state = self.state.read().await;
        // Ids are monotonic, so ascending key order is insertion order.
        let items: Vec<Destination> = state
            .records
            .values()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();
        drop(state);

        let fingerprint = Fingerprint::of(&items);
        CollectionSnapshot {
            total: items.len(),
            items,
            fingerprint,
        }
    }

    /// Cache-validating list over the same filtered, ordered snapshot.
    pub async fn list_conditional(
        &self,
        filter: &ListFilter,
        cached: Option<&Fingerprint>,
        ctx: &RequestContext,
    ) -> CacheValidation<CollectionSnapshot> {
        let snapshot = self.list(filter, ctx).await;

        match Precondition::for_read(cached).check(&snapshot.fingerprint) {
            Verdict::NotModified => CacheValidation::NotModified,
            _ => CacheValidation::Refreshed(snapshot),
        }
    }

    /// Create a record: validate the draft, reject natural-key duplicates,
    /// assign the next id, append, and publish `created`.
    pub async fn create(
        &self,
        draft: DestinationDraft,
        ctx: &RequestContext,
    ) -> CatalogResult<VersionedDestination> {
        let fields = draft.validate()?;

        info!(
            "creating destination '{}' in '{}' (request: '{}')",
            fields.name, fields.country, ctx.request_id
        );

        let mut state = self.state.write().await;

        if let Some(existing_id) =
            conflict::detect_duplicate(&fields.name, &fields.country, state.records.values())
        {
            return Err(CatalogError::Conflict {
                name: fields.name,
                country: fields.country,
                existing_id,
            });
        }

        let id = state.allocate_id();
        let record = fields.into_destination(id);
        state.records.insert(id, record.clone());
        drop(state);

        trace!(
            "created destination: {}",
            serde_json::to_string(&record).unwrap_or_else(|_| "unserializable".into())
        );
        self.events
            .publish(ChangeEvent::created(DestinationSummary::of(&record)));

        Ok(VersionedDestination::new(record))
    }

    /// Full replacement, permissive about omissions: fields absent from
    /// `changes` retain their stored values.
    pub async fn replace(
        &self,
        id: u64,
        changes: DestinationChanges,
        expected: Option<&Fingerprint>,
        ctx: &RequestContext,
    ) -> CatalogResult<VersionedDestination> {
        info!(
            "replacing destination {} (request: '{}')",
            id, ctx.request_id
        );
        self.apply_update(id, changes, expected).await
    }

    /// Partial update: only fields explicitly present in `changes` are
    /// applied.
    pub async fn patch(
        &self,
        id: u64,
        changes: DestinationChanges,
        expected: Option<&Fingerprint>,
        ctx: &RequestContext,
    ) -> CatalogResult<VersionedDestination> {
        info!("patching destination {} (request: '{}')", id, ctx.request_id);
        self.apply_update(id, changes, expected).await
    }

    // Replace and patch share one merge: the compare and the apply happen
    // under a single write-lock acquisition.
    async fn apply_update(
        &self,
        id: u64,
        changes: DestinationChanges,
        expected: Option<&Fingerprint>,
    ) -> CatalogResult<VersionedDestination> {
        let mut state = self.state.write().await;

        let record = state
            .records
            .get_mut(&id)
            .ok_or(CatalogError::NotFound { id })?;

        if let Some(mismatch) = stale_token(expected, record) {
            return Err(CatalogError::PreconditionFailed(mismatch));
        }

        changes.apply_to(record);
        let updated = record.clone();
        drop(state);

        self.events
            .publish(ChangeEvent::updated(DestinationSummary::of(&updated)));

        Ok(VersionedDestination::new(updated))
    }

    /// Remove a record. Absent ids report [`CatalogError::NotFound`] —
    /// including on a repeated delete of the same id: the second call
    /// signals "absent", not "success".
    pub async fn delete(
        &self,
        id: u64,
        expected: Option<&Fingerprint>,
        ctx: &RequestContext,
    ) -> CatalogResult<()> {
        info!("deleting destination {} (request: '{}')", id, ctx.request_id);

        let mut state = self.state.write().await;

        let record = state
            .records
            .get(&id)
            .ok_or(CatalogError::NotFound { id })?;

        if let Some(mismatch) = stale_token(expected, record) {
            return Err(CatalogError::PreconditionFailed(mismatch));
        }

        let removed = state
            .records
            .remove(&id)
            .ok_or(CatalogError::NotFound { id })?;
        drop(state);

        self.events
            .publish(ChangeEvent::deleted(DestinationSummary::tombstone(&removed)));

        Ok(())
    }

    /// Drop every record without resetting the id counter. Test helper.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        let remaining = state.records.len();
        state.records.clear();
        if remaining > 0 {
            warn!("cleared {} destinations from the catalog", remaining);
        }
    }
}

// If-Match evaluation against the record's current content.
fn stale_token(
    expected: Option<&Fingerprint>,
    record: &Destination,
) -> Option<FingerprintMismatch> {
    let expected = expected?;
    let current = Fingerprint::of(record);

    match Precondition::IfMatch(expected).check(&current) {
        Verdict::Failed => Some(FingerprintMismatch {
            expected: expected.clone(),
            current,
        }),
        _ => None,
    }
}

fn seed_records() -> Vec<Destination> {
    vec![
        Destination {
            id: 1,
            name: "Paris".into(),
            country: "France".into(),
            price_per_day: 150.0,
            activities: vec![
                "Tour Eiffel".into(),
                "Louvre".into(),
                "Champs-Élysées".into(),
            ],
        },
        Destination {
            id: 2,
            name: "Tokyo".into(),
            country: "Japan".into(),
            price_per_day: 180.0,
            activities: vec![
                "Mont Fuji".into(),
                "Shibuya".into(),
                "Temple Senso-ji".into(),
            ],
        },
        Destination {
            id: 3,
            name: "New York".into(),
            country: "USA".into(),
            price_per_day: 200.0,
            activities: vec![
                "Statue de la Liberté".into(),
                "Central Park".into(),
                "Times Square".into(),
            ],
        },
        Destination {
            id: 4,
            name: "Barcelona".into(),
            country: "Spain".into(),
            price_per_day: 130.0,
            activities: vec![
                "Sagrada Familia".into(),
                "Park Güell".into(),
                "Las Ramblas".into(),
            ],
        },
    ]
}
