//! Builder API for ergonomic machine construction.
//!
//! This module provides a fluent builder for configuring machines and macros
//! for registering state functions under stable names with minimal
//! boilerplate.

pub mod machine;
pub mod macros;

pub use machine::MachineBuilder;
