//! Benchmark execution engine
//!
//! A measurement flows through three layers:
//!
//! 1. **Invocation** (`invocation.rs`): resolves the working directory and
//!    builds the exact command line for a request.
//! 2. **Process** (`process.rs`): the capability that runs one external
//!    process to completion or timeout.
//! 3. **Runner** (`runner.rs`): classifies the captured outcome into a
//!    throughput result or a typed failure.
//!
//! `suite.rs` binds the runner to the fixed set of named entry points.

pub mod invocation;
pub mod process;
pub mod runner;
pub mod suite;

pub use invocation::{Invocation, InvocationContext, ProgramLocator};
pub use process::{ExecutionOutcome, ProcessError, ProcessInvoker, SystemInvoker};
pub use runner::BenchmarkRunner;
pub use suite::{BenchmarkEntry, ENTRIES};
