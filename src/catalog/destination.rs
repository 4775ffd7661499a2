//! The destination record schema and its input types.
//!
//! The record is a fixed struct rather than free-form JSON so that "field
//! present vs. absent" is a first-class, checkable concept: create input
//! ([`DestinationDraft`]) keeps required fields optional until validation,
//! and partial updates ([`DestinationChanges`]) carry only the fields the
//! caller actually supplied.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// A travel destination record.
///
/// `id` is unique and immutable once assigned; the store allocates ids from
/// a monotonically increasing counter and never reuses one, even after
/// deletion. The `(name, country)` pair is the natural key checked for
/// duplicates at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub id: u64,
    pub name: String,
    pub country: String,
    pub price_per_day: f64,
    pub activities: Vec<String>,
}

/// Create input: required fields stay optional until [`validate`] runs.
///
/// [`validate`]: DestinationDraft::validate
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DestinationDraft {
    pub name: Option<String>,
    pub country: Option<String>,
    pub price_per_day: Option<f64>,
    pub activities: Option<Vec<String>>,
}

impl DestinationDraft {
    /// Draft with all required fields present and no activities.
    pub fn new(
        name: impl Into<String>,
        country: impl Into<String>,
        price_per_day: f64,
    ) -> Self {
        Self {
            name: Some(name.into()),
            country: Some(country.into()),
            price_per_day: Some(price_per_day),
            activities: None,
        }
    }

    /// Attach an activity list to the draft.
    pub fn with_activities<I, S>(mut self, activities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.activities = Some(activities.into_iter().map(Into::into).collect());
        self
    }

    /// Check required fields and build the record body (without an id).
    ///
    /// `name`, `country` and `pricePerDay` must be present; an absent
    /// activity list defaults to empty.
    pub fn validate(self) -> Result<DraftFields, ValidationError> {
        let name = require(self.name, "name")?;
        let country = require(self.country, "country")?;
        let price_per_day = self
            .price_per_day
            .ok_or(ValidationError::MissingRequiredField {
                field: "pricePerDay",
            })?;

        Ok(DraftFields {
            name,
            country,
            price_per_day,
            activities: self.activities.unwrap_or_default(),
        })
    }
}

fn require(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    match value {
        None => Err(ValidationError::MissingRequiredField { field }),
        Some(s) if s.trim().is_empty() => Err(ValidationError::EmptyField { field }),
        Some(s) => Ok(s),
    }
}

/// A validated draft: everything a [`Destination`] needs except the id,
/// which the store assigns on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftFields {
    pub name: String,
    pub country: String,
    pub price_per_day: f64,
    pub activities: Vec<String>,
}

impl DraftFields {
    pub(crate) fn into_destination(self, id: u64) -> Destination {
        Destination {
            id,
            name: self.name,
            country: self.country,
            price_per_day: self.price_per_day,
            activities: self.activities,
        }
    }
}

/// Partial update input. Only fields that are `Some` are applied; the rest
/// retain their stored values. Full replacement uses the same merge:
/// a replace with absent fields keeps them as well.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DestinationChanges {
    pub name: Option<String>,
    pub country: Option<String>,
    pub price_per_day: Option<f64>,
    pub activities: Option<Vec<String>>,
}

impl DestinationChanges {
    /// Change only the daily price.
    pub fn price(price_per_day: f64) -> Self {
        Self {
            price_per_day: Some(price_per_day),
            ..Self::default()
        }
    }

    /// True when no field is present.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.country.is_none()
            && self.price_per_day.is_none()
            && self.activities.is_none()
    }

    pub(crate) fn apply_to(self, record: &mut Destination) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(country) = self.country {
            record.country = country;
        }
        if let Some(price) = self.price_per_day {
            record.price_per_day = price;
        }
        if let Some(activities) = self.activities {
            record.activities = activities;
        }
    }
}

/// Minimal record projection carried by change events.
///
/// Created/updated events include the country and price; deleted events
/// carry only the id and name of the removed record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationSummary {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub price_per_day: Option<f64>,
}

impl DestinationSummary {
    /// Projection for created/updated events.
    pub fn of(record: &Destination) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            country: Some(record.country.clone()),
            price_per_day: Some(record.price_per_day),
        }
    }

    /// Projection for deleted events.
    pub fn tombstone(record: &Destination) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            country: None,
            price_per_day: None,
        }
    }
}

/// Conjunctive listing filter. The country match is case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListFilter {
    pub country: Option<String>,
    pub max_price: Option<f64>,
}

impl ListFilter {
    /// Filter by country only.
    pub fn country(country: impl Into<String>) -> Self {
        Self {
            country: Some(country.into()),
            ..Self::default()
        }
    }

    /// Filter by maximum daily price only.
    pub fn max_price(max_price: f64) -> Self {
        Self {
            max_price: Some(max_price),
            ..Self::default()
        }
    }

    pub(crate) fn matches(&self, record: &Destination) -> bool {
        if let Some(country) = &self.country {
            if record.country.to_lowercase() != country.to_lowercase() {
                return false;
            }
        }
        if let Some(max_price) = self.max_price {
            if record.price_per_day > max_price {
                return false;
            }
        }
        true
    }
}
