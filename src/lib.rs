//! Consistency and notification core for a travel destination catalog.
//!
//! Several protocol surfaces (REST, GraphQL, RPC) can serve one shared
//! catalog; this crate is the part they share: the authoritative in-memory
//! store, content fingerprints for cache validation and optimistic
//! concurrency, duplicate-conflict detection on the natural key,
//! hypermedia action synthesis, and a fan-out bus that pushes mutation
//! events to long-lived subscribers. Routing and payload marshalling stay
//! in the adapters.
//!
//! # Core Components
//!
//! - [`DestinationStore`] — id-keyed arena behind a reader/writer lock
//! - [`Fingerprint`] / [`EntityTag`] — deterministic content tokens
//! - [`DestinationView`] / [`CollectionView`] — link-decorated
//!   representations
//! - [`EventBus`] / [`Subscription`] — mutation fan-out with heartbeats
//!
//! # Quick Start
//!
//! ```rust
//! use travel_catalog::{DestinationDraft, DestinationStore, RequestContext};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = DestinationStore::seeded();
//! let ctx = RequestContext::with_generated_id();
//!
//! let _updates = store.events().subscribe();
//! let rome = store
//!     .create(DestinationDraft::new("Rome", "Italy", 140.0), &ctx)
//!     .await?;
//! assert_eq!(rome.id(), 5);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod error;
pub mod events;
pub mod hypermedia;
pub mod store;

// Re-export the types adapters touch on every request.
pub use catalog::context::RequestContext;
pub use catalog::destination::{
    Destination, DestinationChanges, DestinationDraft, DestinationSummary, ListFilter,
};
pub use catalog::fingerprint::{ContentDigest, EntityTag, Fingerprint, TokenError};
pub use catalog::versioned::VersionedDestination;
pub use error::{CatalogError, CatalogResult, ValidationError};
pub use events::{
    ChangeEvent, ChangeKind, EventBus, EventFrame, FanoutReport, FrameKind, Subscription,
};
pub use hypermedia::{
    ActionDescriptor, CollectionView, CrudOperation, DestinationView, LinkRelation, LinkSet,
    LinkTarget, recovery_links,
};
pub use store::conditional::{CacheValidation, FingerprintMismatch, Precondition, Verdict};
pub use store::{CollectionSnapshot, DestinationStore};
