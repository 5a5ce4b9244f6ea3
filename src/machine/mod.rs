//! The execution engine.
//!
//! This module drives chained state functions to completion:
//!
//! - **Machine**: Runs the transition loop and manages channel lifecycle
//! - **Transformers**: Middleware wrapping each state before it is invoked
//! - **Reports**: Final per-state statistics of a run
//!
//! The loop is sequential: exactly one state runs at a time. Concurrency comes
//! from launching `Machine::run` as its own task and talking to it through
//! channels held in the context.

mod report;
mod runner;
pub mod transform;

pub use report::RunReport;
pub use runner::Machine;
pub use transform::Transformer;
