//! HAMT Bench - Command-line entry point
//!
//! Lists and runs the named benchmark entry points. Measurements are written
//! to stdout as JSON lines; logs go to stderr.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hamt_bench::{
    benchmark::{suite, BenchmarkEntry, BenchmarkRunner, ENTRIES},
    Config, Measurement, OperationKind,
};

#[derive(Debug, Parser)]
#[command(name = "hamt-bench", version, about = "Run HAMT throughput benchmarks")]
struct Cli {
    /// Project root the workload runs in (overrides HARNESS_PROJECT_ROOT)
    #[arg(long, global = true)]
    project_root: Option<PathBuf>,

    /// Timeout per workload run, in seconds (overrides HARNESS_TIMEOUT_SECONDS)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_seconds: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the available benchmark entry points
    List {
        /// Print entries as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Run entry points by name (all of them when none are given)
    Run { names: Vec<String> },
    /// Run a single ad-hoc measurement
    Measure { kind: OperationKind, scale: u64 },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let dotenv = hamt_bench::config::load_dotenv();
    let mut config = Config::from_env().context("Failed to load configuration from environment")?;
    if let Some(root) = cli.project_root {
        // A root typed on the command line is relative to the invoking shell
        config.invocation.project_root = std::path::absolute(&root)
            .with_context(|| format!("Invalid project root: {}", root.display()))?;
    }
    if let Some(secs) = cli.timeout_seconds {
        config.invocation.timeout_seconds = secs;
    }

    // Initialize tracing; stdout is reserved for measurements
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    match cli.command {
        Commands::List { json } => list(json),
        Commands::Run { names } => {
            let entries = select(&names)?;
            let runner = BenchmarkRunner::from_config(&config);
            tracing::info!(
                count = entries.len(),
                root = %config.invocation.project_root.display(),
                "Running benchmarks"
            );

            for entry in entries {
                let value = entry
                    .run_with(&runner)
                    .with_context(|| format!("Benchmark {} failed", entry.name))?;
                let result = hamt_bench::BenchmarkResult::new(value);
                println!("{}", Measurement::record(entry.name, result).to_json_line()?);
            }
            Ok(())
        }
        Commands::Measure { kind, scale } => {
            let runner = BenchmarkRunner::from_config(&config);
            let result = runner
                .run_blocking(kind, scale)
                .with_context(|| format!("Measurement {} at scale {} failed", kind, scale))?;
            println!("{}", result.ops_per_sec);
            Ok(())
        }
    }
}

fn list(json: bool) -> anyhow::Result<()> {
    for entry in &ENTRIES {
        if json {
            let line = serde_json::json!({
                "name": entry.name,
                "kind": entry.kind,
                "scale": entry.scale,
                "unit": entry.unit,
                "description": entry.description,
            });
            println!("{}", line);
        } else {
            println!("{:<18} {:<8} {}", entry.name, entry.unit, entry.description);
        }
    }
    Ok(())
}

fn select(names: &[String]) -> anyhow::Result<Vec<&'static BenchmarkEntry>> {
    if names.is_empty() {
        return Ok(ENTRIES.iter().collect());
    }

    let mut selected = Vec::with_capacity(names.len());
    for name in names {
        match suite::find(name) {
            Some(entry) => selected.push(entry),
            None => bail!("Unknown benchmark: {}", name),
        }
    }
    Ok(selected)
}
