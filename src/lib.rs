//! Statefn: deterministic finite automata as chained state functions
//!
//! Each state of an automaton is an async function that performs the side
//! effects of that state and returns the next state to run, or `None` once the
//! automaton is done. A shared [`Machine`] drives the chain, measures time spent
//! in every state and lets callers wrap states in middleware.
//!
//! # Core Concepts
//!
//! - **State functions**: Named async callables via [`StateFn`]
//! - **Machine**: The sequential transition loop, usually spawned as a task
//! - **Transformers**: Middleware applied to each state right before it runs
//! - **Statistics**: Per-state entry counts and timings, streamed and reported
//! - **Channels**: Unbuffered handoff channels closed by the machine on completion
//!
//! # Example
//!
//! ```rust
//! use statefn::core::StateFuture;
//! use statefn::{next_state, state_fn, Machine};
//!
//! #[derive(Default)]
//! struct Loop {
//!     count: u32,
//! }
//!
//! fn looping(l: &mut Loop) -> StateFuture<'_, Loop> {
//!     Box::pin(async move {
//!         l.count += 1;
//!         if l.count == 3 {
//!             None
//!         } else {
//!             next_state!(looping)
//!         }
//!     })
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let machine: Machine<Loop, ()> = Machine::new();
//! let mut ctx = Loop::default();
//! let report = machine.run(state_fn!(looping), &mut ctx, None, None).await;
//!
//! assert_eq!(report.entry_count("looping"), 3);
//! # }
//! ```

pub mod builder;
pub mod channel;
pub mod core;
pub mod machine;

// Re-export commonly used types
pub use builder::MachineBuilder;
pub use channel::{ChannelError, Receiver, Sender};
pub use self::core::{NextState, StateFn, StateFuture, StateStats};
pub use machine::{Machine, RunReport, Transformer};
