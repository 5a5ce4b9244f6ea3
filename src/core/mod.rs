//! Core automaton types.
//!
//! This module contains the building blocks the execution engine works with:
//! - State functions and their registered identities via `StateFn`
//! - Per-state statistics via `StateStats` and `StatsAggregator`
//!
//! Nothing in this module performs I/O; running states is the job of
//! [`crate::machine`].

mod state;
mod stats;

pub use state::{NextState, StateFn, StateFuture};
pub use stats::{StateStats, StatsAggregator};
