//! Strategy results and the comparison report

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use super::stats::StatSummary;

/// Measured result for one strategy run
#[derive(Clone, Debug, Serialize)]
pub struct StrategyResult {
    /// Human-readable strategy name
    pub strategy: String,
    /// When the run finished
    pub timestamp: DateTime<Utc>,
    /// Query text that was benchmarked
    pub query: String,
    /// Iterations executed
    pub iterations: u32,
    /// Connection establishment / pool acquisition timings
    pub connection: StatSummary,
    /// Query execution timings
    pub query_execution: StatSummary,
    /// Whole-iteration timings
    pub total: StatSummary,
}

/// Why an improvement figure could not be computed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UndefinedReason {
    /// Baseline mean or median is zero; the ratio has no meaning
    ZeroBaseline,
    /// One of the sample sets is empty
    InsufficientSamples,
}

impl UndefinedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            UndefinedReason::ZeroBaseline => "undefined (zero baseline)",
            UndefinedReason::InsufficientSamples => "undefined (insufficient samples)",
        }
    }
}

/// Percentage reduction relative to the uncached baseline, or a sentinel
/// when the figure is undefined
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Improvement {
    Percent(f64),
    Undefined(UndefinedReason),
}

impl Improvement {
    /// Numeric value, if defined
    pub fn as_percent(&self) -> Option<f64> {
        match self {
            Improvement::Percent(v) => Some(*v),
            Improvement::Undefined(_) => None,
        }
    }
}

// Serializes as a JSON number, or as the sentinel string when undefined,
// so downstream consumers never see inf/NaN.
impl Serialize for Improvement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Improvement::Percent(v) => serializer.serialize_f64(*v),
            Improvement::Undefined(reason) => serializer.serialize_str(reason.as_str()),
        }
    }
}

/// `(baseline − candidate) / baseline × 100`, guarded
fn improvement(baseline: f64, candidate: f64, samples: usize) -> Improvement {
    if samples == 0 {
        return Improvement::Undefined(UndefinedReason::InsufficientSamples);
    }
    if baseline == 0.0 {
        return Improvement::Undefined(UndefinedReason::ZeroBaseline);
    }
    Improvement::Percent((baseline - candidate) / baseline * 100.0)
}

/// Mean and median improvement for one phase
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ImprovementPair {
    pub mean: Improvement,
    pub median: Improvement,
}

impl ImprovementPair {
    fn between(baseline: &StatSummary, candidate: &StatSummary) -> Self {
        let samples = baseline.count.min(candidate.count);
        Self {
            mean: improvement(baseline.mean, candidate.mean, samples),
            median: improvement(baseline.median, candidate.median, samples),
        }
    }
}

/// Improvement metrics for connection and total time
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ImprovementSummary {
    pub connection_time: ImprovementPair,
    pub total_time: ImprovementPair,
}

/// Pairs both strategy results with derived improvement metrics
#[derive(Clone, Debug, Serialize)]
pub struct ComparisonReport {
    pub timestamp: DateTime<Utc>,
    pub iterations: u32,
    pub new_connections: StrategyResult,
    pub connection_pool: StrategyResult,
    pub improvement: ImprovementSummary,
}

impl ComparisonReport {
    /// Derive the improvement metrics from a finished pair of runs
    pub fn new(new_connections: StrategyResult, connection_pool: StrategyResult) -> Self {
        let improvement = ImprovementSummary {
            connection_time: ImprovementPair::between(
                &new_connections.connection,
                &connection_pool.connection,
            ),
            total_time: ImprovementPair::between(&new_connections.total, &connection_pool.total),
        };

        Self {
            timestamp: Utc::now(),
            iterations: new_connections.iterations,
            new_connections,
            connection_pool,
            improvement,
        }
    }
}
