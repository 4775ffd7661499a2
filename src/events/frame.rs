//! Domain events and the textual frames subscribers receive.

use crate::catalog::destination::DestinationSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

/// A committed catalog mutation, as published on the bus.
///
/// Constructed by the mutation that committed it; consumed once by each
/// subscriber registered at publish time. There is no durable log — late
/// subscribers never see it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub payload: DestinationSummary,
    pub timestamp: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn created(payload: DestinationSummary) -> Self {
        Self::now(ChangeKind::Created, payload)
    }

    pub fn updated(payload: DestinationSummary) -> Self {
        Self::now(ChangeKind::Updated, payload)
    }

    pub fn deleted(payload: DestinationSummary) -> Self {
        Self::now(ChangeKind::Deleted, payload)
    }

    fn now(kind: ChangeKind, payload: DestinationSummary) -> Self {
        Self {
            kind,
            payload,
            timestamp: Utc::now(),
        }
    }
}

/// Discriminator of a frame on the subscriber stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameKind {
    /// Sent once when the subscription is registered.
    Connected,
    /// Sent when the listen loop idles past its timeout.
    Heartbeat,
    Created,
    Updated,
    Deleted,
}

impl From<ChangeKind> for FrameKind {
    fn from(kind: ChangeKind) -> Self {
        match kind {
            ChangeKind::Created => FrameKind::Created,
            ChangeKind::Updated => FrameKind::Updated,
            ChangeKind::Deleted => FrameKind::Deleted,
        }
    }
}

/// One textual frame on a subscriber stream: `{"type": ..., "data": ...}`.
///
/// Lifecycle frames (`connected`, `heartbeat`) carry no data; domain
/// frames carry the minimal record projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventFrame {
    #[serde(rename = "type")]
    pub kind: FrameKind,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub data: Option<DestinationSummary>,
}

impl EventFrame {
    pub fn connected() -> Self {
        Self {
            kind: FrameKind::Connected,
            data: None,
        }
    }

    pub fn heartbeat() -> Self {
        Self {
            kind: FrameKind::Heartbeat,
            data: None,
        }
    }

    /// Render as a server-sent-events data line. Transport framing beyond
    /// this is the adapter's concern.
    pub fn to_sse(&self) -> String {
        let json = serde_json::to_string(self).expect("event frames serialize to JSON");
        format!("data: {}\n\n", json)
    }
}

impl From<ChangeEvent> for EventFrame {
    fn from(event: ChangeEvent) -> Self {
        Self {
            kind: event.kind.into(),
            data: Some(event.payload),
        }
    }
}
