//! HAMT Bench - Throughput harness for the HAMT workload program
//!
//! This library drives the externally built HAMT benchmark program through a
//! fixed command-line protocol and turns its output into a single throughput
//! value, in operations per second, for a benchmark-tracking framework.
//!
//! # Features
//!
//! - Deterministic command-line construction per (operation kind, scale)
//! - Wall-clock timeout with the child process killed on expiry
//! - Typed classification of timeouts, crashes and malformed output
//! - Named entry points discoverable by a tracking framework
//!
//! # Architecture
//!
//! - **Config**: environment-driven settings, passed explicitly
//! - **Benchmark**: invocation building, process execution, result parsing
//! - **Models**: requests, results and timestamped measurements

pub mod benchmark;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use benchmark::suite::{track_insert_10k, track_insert_1k, track_query_10k, track_query_1k};
pub use benchmark::BenchmarkRunner;
pub use config::Config;
pub use error::{BenchmarkError, HarnessResult};
pub use models::{BenchmarkRequest, BenchmarkResult, Measurement, OperationKind};
