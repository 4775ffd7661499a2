//! A destination paired with the fingerprint of its current content.

use super::destination::Destination;
use super::fingerprint::{ContentDigest, Fingerprint};
use serde::{Deserialize, Serialize};

/// A record together with its content fingerprint.
///
/// The fingerprint is computed from the record on construction and
/// recomputed whenever the record is swapped, so it always reflects the
/// content being handed out. Adapters attach the token to outgoing
/// responses and accept it back as a precondition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionedDestination {
    destination: Destination,
    fingerprint: Fingerprint,
}

impl VersionedDestination {
    /// Pair a record with its freshly computed fingerprint.
    pub fn new(destination: Destination) -> Self {
        let fingerprint = Fingerprint::of(&destination);
        Self {
            destination,
            fingerprint,
        }
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn id(&self) -> u64 {
        self.destination.id
    }

    /// Discard the fingerprint and keep the record.
    pub fn into_destination(self) -> Destination {
        self.destination
    }

    /// Whether the stored fingerprint equals `token`, in either format.
    pub fn matches<F>(&self, token: &ContentDigest<F>) -> bool {
        self.fingerprint == *token
    }

    /// Swap in new record content and recompute the fingerprint.
    pub fn replace(&mut self, destination: Destination) {
        self.fingerprint = Fingerprint::of(&destination);
        self.destination = destination;
    }
}
