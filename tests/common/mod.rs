//! Shared helpers for the integration suites.
//!
//! A stub workload is a shell script launched as `sh <script>`, so it
//! receives the same arguments the real runtime would:
//! `run -I <search> <entry> <kind> <scale>`.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use hamt_bench::benchmark::{BenchmarkRunner, InvocationContext, ProgramLocator};
use tempfile::TempDir;

pub struct Workload {
    root: TempDir,
    script: PathBuf,
}

impl Workload {
    pub fn new(body: &str) -> Self {
        let root = tempfile::tempdir().unwrap();
        let script = root.path().join("bench_stub.sh");
        fs::write(&script, format!("#!/bin/sh\n{}\n", body)).unwrap();
        Self { root, script }
    }

    pub fn runner(&self, timeout: Duration) -> BenchmarkRunner {
        BenchmarkRunner::new(InvocationContext::new(
            self.root.path(),
            timeout,
            ProgramLocator {
                launcher: vec!["sh".into(), self.script.to_string_lossy().into_owned()],
                path_flag: "-I".into(),
                search_path: PathBuf::from("src/mojo"),
                entry_path: PathBuf::from("benchmarks/mojo/bench_numbers.mojo"),
            },
        ))
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }
}

/// Children (live or zombie) of the calling thread.
///
/// Scoped to the thread so tests running in parallel don't see each other's
/// workloads.
#[cfg(target_os = "linux")]
pub fn thread_children() -> Vec<u32> {
    fs::read_to_string("/proc/thread-self/children")
        .unwrap()
        .split_whitespace()
        .map(|pid| pid.parse().unwrap())
        .collect()
}

/// Number of file descriptors open in this process
#[cfg(target_os = "linux")]
pub fn open_descriptors() -> usize {
    fs::read_dir("/proc/self/fd").unwrap().count()
}
