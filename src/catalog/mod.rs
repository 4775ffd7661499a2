//! Domain model: the destination record, its input types, and the content
//! fingerprint machinery shared by every protocol surface.
//!
//! # Key Components
//!
//! * [`Destination`] — the catalog record with a typed schema
//! * [`DestinationDraft`] / [`DestinationChanges`] — create and update
//!   inputs where field presence is explicit
//! * [`Fingerprint`] / [`EntityTag`] — content digests in raw and HTTP
//!   wire form
//! * [`VersionedDestination`] — a record paired with its current token
//! * [`RequestContext`] — per-request tracing id

pub mod context;
pub mod destination;
pub mod fingerprint;
pub mod versioned;

pub use context::RequestContext;
pub use destination::{
    Destination, DestinationChanges, DestinationDraft, DestinationSummary, DraftFields, ListFilter,
};
pub use fingerprint::{ContentDigest, EntityTag, Fingerprint, TokenError};
pub use versioned::VersionedDestination;
