//! Command line interface module
//!
//! This module provides argument parsing and validation, the run context built
//! from them, and the runner that wires a mirror run together.

pub mod args;
pub mod operation_mode;
pub mod runner;

pub use args::Args;
pub use operation_mode::{RunContext, RunMode};
pub use runner::Runner;
