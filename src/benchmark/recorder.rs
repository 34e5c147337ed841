//! Timed-phase recording
//!
//! One recorder serves both strategies so their measurements cannot
//! drift apart structurally.

use std::fmt;
use std::time::Duration;

use super::stats::StatSummary;

/// A timing category within one iteration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Connect,
    Query,
    Total,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Connect => "connect",
            Phase::Query => "query",
            Phase::Total => "total",
        };
        write!(f, "{name}")
    }
}

/// Ordered per-phase samples for one strategy run
#[derive(Debug, Default)]
pub struct PhaseRecorder {
    connect: Vec<Duration>,
    query: Vec<Duration>,
    total: Vec<Duration>,
}

impl PhaseRecorder {
    /// Create a recorder sized for the expected iteration count
    pub fn with_capacity(iterations: usize) -> Self {
        Self {
            connect: Vec::with_capacity(iterations),
            query: Vec::with_capacity(iterations),
            total: Vec::with_capacity(iterations),
        }
    }

    /// Record one elapsed-duration sample for a phase
    pub fn record(&mut self, phase: Phase, elapsed: Duration) {
        match phase {
            Phase::Connect => self.connect.push(elapsed),
            Phase::Query => self.query.push(elapsed),
            Phase::Total => self.total.push(elapsed),
        }
    }

    /// Number of fully completed iterations
    pub fn completed(&self) -> usize {
        self.total.len()
    }

    /// Consume the samples into per-phase summaries
    pub fn finish(self) -> PhaseSummaries {
        PhaseSummaries {
            connection: StatSummary::from_durations(&self.connect),
            query_execution: StatSummary::from_durations(&self.query),
            total: StatSummary::from_durations(&self.total),
        }
    }
}

/// The three per-phase summaries of one strategy run
#[derive(Clone, Debug)]
pub struct PhaseSummaries {
    pub connection: StatSummary,
    pub query_execution: StatSummary,
    pub total: StatSummary,
}
