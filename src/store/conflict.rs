//! Natural-key duplicate detection.
//!
//! The `(name, country)` pair is the business key of a destination.
//! Comparison is case-insensitive on both fields. The check runs on create
//! only — updates may legitimately converge on another record's key, a
//! deliberate property of this catalog (see DESIGN.md).

use crate::catalog::destination::Destination;

/// Scan live records for one already holding the candidate natural key.
///
/// Returns the id of the pre-existing record, or `None` when the key is
/// free.
pub fn detect_duplicate<'a, I>(name: &str, country: &str, records: I) -> Option<u64>
where
    I: IntoIterator<Item = &'a Destination>,
{
    let name = name.to_lowercase();
    let country = country.to_lowercase();

    records
        .into_iter()
        .find(|record| {
            record.name.to_lowercase() == name && record.country.to_lowercase() == country
        })
        .map(|record| record.id)
}
