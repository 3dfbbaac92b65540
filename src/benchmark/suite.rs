//! Benchmark entry points
//!
//! The fixed set of scenarios a tracking framework discovers by name. Each
//! entry binds the runner to one (operation kind, scale) pair and reports
//! in `ops/sec`. Entries add no logic of their own: any failure from the
//! runner reaches the caller unchanged.

use crate::config::Config;
use crate::constants::{SCALE_10K, SCALE_1K, THROUGHPUT_UNIT};
use crate::error::HarnessResult;
use crate::models::OperationKind;

use super::process::ProcessInvoker;
use super::runner::BenchmarkRunner;

/// One discoverable benchmark scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchmarkEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: OperationKind,
    pub scale: u64,
    pub unit: &'static str,
}

impl BenchmarkEntry {
    /// Run this scenario with the given runner
    pub fn run_with<P: ProcessInvoker>(&self, runner: &BenchmarkRunner<P>) -> HarnessResult<f64> {
        runner
            .run_blocking(self.kind, self.scale)
            .map(|result| result.ops_per_sec)
    }

    /// Run this scenario with a runner built from the process environment
    pub fn run(&self) -> HarnessResult<f64> {
        let config = Config::from_env()?;
        self.run_with(&BenchmarkRunner::from_config(&config))
    }
}

/// All benchmark scenarios, in reporting order
pub static ENTRIES: [BenchmarkEntry; 4] = [
    BenchmarkEntry {
        name: "track_insert_1k",
        description: "Insert 1,000 sequential integer keys",
        kind: OperationKind::Insert,
        scale: SCALE_1K,
        unit: THROUGHPUT_UNIT,
    },
    BenchmarkEntry {
        name: "track_insert_10k",
        description: "Insert 10,000 sequential integer keys",
        kind: OperationKind::Insert,
        scale: SCALE_10K,
        unit: THROUGHPUT_UNIT,
    },
    BenchmarkEntry {
        name: "track_query_1k",
        description: "Query 1,000 existing keys",
        kind: OperationKind::Query,
        scale: SCALE_1K,
        unit: THROUGHPUT_UNIT,
    },
    BenchmarkEntry {
        name: "track_query_10k",
        description: "Query 10,000 existing keys",
        kind: OperationKind::Query,
        scale: SCALE_10K,
        unit: THROUGHPUT_UNIT,
    },
];

/// Look up an entry by name
pub fn find(name: &str) -> Option<&'static BenchmarkEntry> {
    ENTRIES.iter().find(|entry| entry.name == name)
}

/// Insert 1,000 sequential integer keys
pub fn track_insert_1k() -> HarnessResult<f64> {
    ENTRIES[0].run()
}

/// Insert 10,000 sequential integer keys
pub fn track_insert_10k() -> HarnessResult<f64> {
    ENTRIES[1].run()
}

/// Query 1,000 existing keys
pub fn track_query_1k() -> HarnessResult<f64> {
    ENTRIES[2].run()
}

/// Query 10,000 existing keys
pub fn track_query_10k() -> HarnessResult<f64> {
    ENTRIES[3].run()
}
