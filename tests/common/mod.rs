//! Shared fixtures for integration tests.

use travel_catalog::{DestinationDraft, DestinationStore, RequestContext};

/// Initialize test logging once; repeated calls are harmless.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A catalog pre-populated with the four demonstration records.
pub fn seeded_store() -> DestinationStore {
    init_logging();
    DestinationStore::seeded()
}

pub fn ctx() -> RequestContext {
    RequestContext::with_generated_id()
}

/// The draft used by the end-to-end scenarios.
pub fn rome_draft() -> DestinationDraft {
    DestinationDraft::new("Rome", "Italy", 140.0).with_activities(["Colosseum"])
}
