//! Harness-wide constants
//!
//! Defaults for the invocation protocol and the benchmark suite.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// REPORTING
// =============================================================================

/// Unit attached to every reported throughput value
pub const THROUGHPUT_UNIT: &str = "ops/sec";

// =============================================================================
// INVOCATION DEFAULTS
// =============================================================================

/// Default wall-clock bound for one workload run, in seconds
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 300;

/// Default command prefix that reaches the workload runtime
pub const DEFAULT_LAUNCHER: &str = "pixi run mojo";

/// Runtime subcommand that executes a workload source file
pub const RUNTIME_RUN_SUBCOMMAND: &str = "run";

/// Default flag that adds a module search path
pub const DEFAULT_PATH_FLAG: &str = "-I";

/// Default module search path, relative to the project root
pub const DEFAULT_SEARCH_PATH: &str = "src/mojo";

/// Default workload entry file, relative to the project root
pub const DEFAULT_WORKLOAD_ENTRY: &str = "benchmarks/mojo/bench_numbers.mojo";

/// Number of ancestors between this crate's manifest directory and the
/// project root (`<root>/benchmarks/rust`)
pub const PROJECT_ROOT_ANCESTOR_DEPTH: usize = 2;

/// Default log filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "info";

// =============================================================================
// ENVIRONMENT VARIABLES
// =============================================================================

pub mod env_vars {
    pub const PROJECT_ROOT: &str = "HARNESS_PROJECT_ROOT";
    pub const TIMEOUT_SECONDS: &str = "HARNESS_TIMEOUT_SECONDS";
    pub const LAUNCHER: &str = "HARNESS_LAUNCHER";
    pub const PATH_FLAG: &str = "HARNESS_PATH_FLAG";
    pub const SEARCH_PATH: &str = "HARNESS_SEARCH_PATH";
    pub const WORKLOAD_ENTRY: &str = "HARNESS_WORKLOAD_ENTRY";
    pub const RUST_LOG: &str = "RUST_LOG";
}

// =============================================================================
// SUITE SCALES
// =============================================================================

/// Small-scale scenario item count
pub const SCALE_1K: u64 = 1_000;

/// Large-scale scenario item count
pub const SCALE_10K: u64 = 10_000;
