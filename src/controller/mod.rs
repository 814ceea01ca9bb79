//! Controller subsystem for gamepad input
//!
//! 1. [`event_collector`] - gilrs events folded into a snapshot
//! 2. [`snapshot`] - Typed controls and the per-tick [`snapshot::InputSnapshot`]
//!
//! # Architecture
//!
//! ```text
//! Gamepad ──► EventCollector ──► SnapshotState ──► InputMapper
//!             (gilrs events)     (per tick)
//! ```

pub mod event_collector;
pub mod snapshot;
