//! Mutation fan-out: domain events, subscriber frames, and the broadcast
//! bus.
//!
//! ```text
//!                  ┌──────────────────────────────┐
//!                  │           EventBus           │
//!                  │   (registry of subscribers)  │
//!                  └──────────────────────────────┘
//!                     │            │           │
//!                     ▼            ▼           ▼
//!               bounded queue  bounded queue  bounded queue
//!               Subscription   Subscription   Subscription
//! ```
//!
//! Delivery is at-most-once per registered subscriber: publish never
//! blocks, never replays, and never fails the mutation that produced the
//! event.

mod bus;
mod frame;

pub use bus::{DEFAULT_QUEUE_DEPTH, EventBus, FanoutReport, Subscription};
pub use frame::{ChangeEvent, ChangeKind, EventFrame, FrameKind};
