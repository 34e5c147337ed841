//! Connection-strategy benchmarking
//!
//! Core of the tool: the timed-phase recorder, statistics reduction,
//! the runner that executes both strategies, and the comparison report.

mod recorder;
mod report;
mod runner;
mod stats;

pub use recorder::{Phase, PhaseRecorder};
pub use report::{ComparisonReport, Improvement, StrategyResult, UndefinedReason};
pub use runner::{BenchmarkRunner, Strategy};
pub use stats::StatSummary;
