//! Error taxonomy for the benchmark
//!
//! All failures propagate to the top level; nothing is retried or
//! averaged over. A benchmark that hides failures produces misleading
//! numbers.

use std::fmt;

use thiserror::Error;

/// Store-level operation errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("connect failed: {0}")]
    Connect(String),

    #[error("pool acquire failed: {0}")]
    Acquire(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("close failed: {0}")]
    Close(String),
}

/// The step of an iteration that failed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Connect,
    Query,
    Cleanup,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Connect => "connect",
            Stage::Query => "query",
            Stage::Cleanup => "cleanup",
        };
        write!(f, "{name}")
    }
}

/// Benchmark errors
#[derive(Error, Debug)]
pub enum BenchError {
    /// Malformed or missing connection parameters, bad sizing bounds,
    /// invalid preconditions. Fatal, no retry.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Pool or direct-connection establishment failure at startup.
    #[error("connection error: {0}")]
    Connection(#[source] StoreError),

    /// A failure mid-iteration. Aborts the whole run; iterations are
    /// numbered from 1.
    #[error("iteration {iteration} failed during {stage}: {source}")]
    StrategyExecution {
        iteration: usize,
        stage: Stage,
        #[source]
        source: StoreError,
    },
}
