//! Benchmark request and result models

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::THROUGHPUT_UNIT;
use crate::error::BenchmarkError;

/// Kind of workload action being measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Insert sequential integer keys
    Insert,
    /// Look up keys that were inserted beforehand
    Query,
}

impl OperationKind {
    /// All operation kinds, in suite order
    pub const ALL: [OperationKind; 2] = [OperationKind::Insert, OperationKind::Query];

    /// Token passed to the workload program on its command line
    pub fn as_arg(&self) -> &'static str {
        match self {
            OperationKind::Insert => "insert",
            OperationKind::Query => "query",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_arg())
    }
}

impl FromStr for OperationKind {
    type Err = BenchmarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "insert" => Ok(OperationKind::Insert),
            "query" => Ok(OperationKind::Query),
            other => Err(BenchmarkError::InvalidRequest(format!(
                "unknown operation kind '{}', expected 'insert' or 'query'",
                other
            ))),
        }
    }
}

/// A validated request for one measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BenchmarkRequest {
    kind: OperationKind,
    scale: u64,
}

impl BenchmarkRequest {
    /// Create a request; the scale must be positive
    pub fn new(kind: OperationKind, scale: u64) -> Result<Self, BenchmarkError> {
        if scale == 0 {
            return Err(BenchmarkError::InvalidRequest(format!(
                "scale for {} must be greater than zero",
                kind
            )));
        }
        Ok(Self { kind, scale })
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn scale(&self) -> u64 {
        self.scale
    }
}

/// Throughput reported by one workload run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BenchmarkResult {
    /// Operations per second
    pub ops_per_sec: f64,
    /// Reporting unit, always `ops/sec`
    pub unit: &'static str,
}

impl BenchmarkResult {
    /// Build a result from workload stdout.
    ///
    /// Surrounding whitespace is ignored; the remainder must be exactly one
    /// finite, non-negative decimal number.
    pub fn parse(stdout: &str) -> Option<Self> {
        let value: f64 = stdout.trim().parse().ok()?;
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        Some(Self::new(value))
    }

    pub fn new(ops_per_sec: f64) -> Self {
        Self {
            ops_per_sec,
            unit: THROUGHPUT_UNIT,
        }
    }

    pub fn value(&self) -> f64 {
        self.ops_per_sec
    }
}

impl fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ops_per_sec, self.unit)
    }
}

/// Timestamped record of one entry-point run, handed to the tracking framework
#[derive(Debug, Clone, Serialize)]
pub struct Measurement {
    pub run_id: Uuid,
    pub benchmark: String,
    pub value: f64,
    pub unit: String,
    pub recorded_at: DateTime<Utc>,
}

impl Measurement {
    pub fn record(benchmark: &str, result: BenchmarkResult) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            benchmark: benchmark.to_string(),
            value: result.ops_per_sec,
            unit: result.unit.to_string(),
            recorded_at: Utc::now(),
        }
    }

    /// Serialize as a single JSON line
    pub fn to_json_line(&self) -> Result<String, BenchmarkError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_kind_tokens() {
        assert_eq!(OperationKind::Insert.as_arg(), "insert");
        assert_eq!(OperationKind::Query.as_arg(), "query");
        assert_eq!("Insert".parse::<OperationKind>().unwrap(), OperationKind::Insert);
        assert_eq!(" query ".parse::<OperationKind>().unwrap(), OperationKind::Query);
        assert!(matches!(
            "delete".parse::<OperationKind>(),
            Err(BenchmarkError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_request_rejects_zero_scale() {
        assert!(BenchmarkRequest::new(OperationKind::Insert, 0).is_err());

        let request = BenchmarkRequest::new(OperationKind::Query, 10).unwrap();
        assert_eq!(request.kind(), OperationKind::Query);
        assert_eq!(request.scale(), 10);
    }

    #[test]
    fn test_parse_throughput() {
        assert_eq!(BenchmarkResult::parse("987654.3").unwrap().value(), 987654.3);
        assert_eq!(BenchmarkResult::parse("  4321.0  \n").unwrap().value(), 4321.0);
        assert_eq!(BenchmarkResult::parse("0").unwrap().value(), 0.0);
        assert_eq!(BenchmarkResult::parse("1e3").unwrap().value(), 1000.0);
        assert_eq!(BenchmarkResult::parse("12").unwrap().unit, "ops/sec");
    }

    #[test]
    fn test_parse_rejects_malformed_output() {
        assert!(BenchmarkResult::parse("not-a-number").is_none());
        assert!(BenchmarkResult::parse("").is_none());
        assert!(BenchmarkResult::parse("1.0\n2.0").is_none());
        assert!(BenchmarkResult::parse("1.0 ops/sec").is_none());
        assert!(BenchmarkResult::parse("-5.0").is_none());
        assert!(BenchmarkResult::parse("NaN").is_none());
        assert!(BenchmarkResult::parse("inf").is_none());
    }

    #[test]
    fn test_measurement_json_line() {
        let measurement = Measurement::record("track_insert_1k", BenchmarkResult::new(1500.5));
        let line = measurement.to_json_line().unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();

        assert_eq!(value["benchmark"], "track_insert_1k");
        assert_eq!(value["value"], 1500.5);
        assert_eq!(value["unit"], "ops/sec");
        assert!(value["recorded_at"].is_string());
        assert!(!line.contains('\n'));
    }
}
