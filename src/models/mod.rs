//! Domain models
//!
//! Requests, results and records shared by the runner, the suite and the CLI.

pub mod benchmark;

pub use benchmark::*;
