//! Benchmark execution engine
//!
//! Runs both connection strategies through one measurement path. The
//! loop is strictly sequential: overlapping iterations would contaminate
//! the timings with scheduling noise.

use std::fmt;

use chrono::Utc;
use tokio::time::Instant;
use tracing::{debug, info};

use super::recorder::{Phase, PhaseRecorder};
use super::report::{ComparisonReport, StrategyResult};
use crate::config::{EndpointDescriptor, PoolSizing};
use crate::error::{BenchError, Stage, StoreError};
use crate::store::{PgStore, Store, StoreConnection};

/// Connection strategy under measurement
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// A brand-new physical connection per query
    Uncached,
    /// Reuse connections from the bounded pool
    Pooled,
}

impl Strategy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "uncached" | "new" | "new-connections" => Some(Strategy::Uncached),
            "pooled" | "pool" => Some(Strategy::Pooled),
            _ => None,
        }
    }

    /// Strategy name used in reports
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Uncached => "New Connection Per Query",
            Strategy::Pooled => "Connection Pool",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Benchmark runner
///
/// Owns the store (and through it the pool) for its whole lifetime; no
/// module-level state.
pub struct BenchmarkRunner<S: Store> {
    store: S,
}

impl BenchmarkRunner<PgStore> {
    /// Create a runner against a PostgreSQL endpoint, eagerly
    /// establishing the connection pool
    pub async fn connect(
        endpoint: &EndpointDescriptor,
        sizing: PoolSizing,
    ) -> Result<Self, BenchError> {
        let store = PgStore::connect(endpoint, sizing).await?;
        Ok(Self::new(store))
    }
}

impl<S: Store> BenchmarkRunner<S> {
    /// Create a runner over an already-established store
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Run one strategy for `iterations` repetitions of `query`.
    ///
    /// Aborts on the first failure: a result averaged over fewer than
    /// the requested samples would silently misrepresent the strategy.
    pub async fn run_strategy(
        &self,
        strategy: Strategy,
        query: &str,
        iterations: u32,
    ) -> Result<StrategyResult, BenchError> {
        if iterations == 0 {
            return Err(BenchError::Configuration(
                "iterations must be at least 1".to_string(),
            ));
        }
        if query.trim().is_empty() {
            return Err(BenchError::Configuration(
                "query must not be empty".to_string(),
            ));
        }

        info!("running {} strategy ({} iterations)", strategy, iterations);

        let mut recorder = PhaseRecorder::with_capacity(iterations as usize);
        for iteration in 1..=iterations {
            self.run_iteration(strategy, query, iteration, &mut recorder)
                .await?;
        }

        let completed = recorder.completed();
        let summaries = recorder.finish();
        info!(
            "{} complete ({} iterations): {}",
            strategy,
            completed,
            summaries.total.format_summary()
        );

        Ok(StrategyResult {
            strategy: strategy.name().to_string(),
            timestamp: Utc::now(),
            query: query.to_string(),
            iterations,
            connection: summaries.connection,
            query_execution: summaries.query_execution,
            total: summaries.total,
        })
    }

    /// One measured iteration: connect/acquire, query, total, cleanup
    async fn run_iteration(
        &self,
        strategy: Strategy,
        query: &str,
        iteration: u32,
        recorder: &mut PhaseRecorder,
    ) -> Result<(), BenchError> {
        let fail = |stage, source| BenchError::StrategyExecution {
            iteration: iteration as usize,
            stage,
            source,
        };

        let started = Instant::now();

        let mut conn = match strategy {
            Strategy::Uncached => self.store.acquire_new().await,
            Strategy::Pooled => self.store.acquire().await,
        }
        .map_err(|e| fail(Stage::Connect, e))?;
        recorder.record(Phase::Connect, started.elapsed());

        let query_started = Instant::now();
        let rows = match conn.fetch_all(query).await {
            Ok(rows) => rows,
            Err(e) => {
                // The query failure wins over any cleanup failure
                let _ = self.dispose(strategy, conn).await;
                return Err(fail(Stage::Query, e));
            }
        };
        recorder.record(Phase::Query, query_started.elapsed());
        recorder.record(Phase::Total, started.elapsed());

        debug!("iteration {iteration}: {rows} rows");

        self.dispose(strategy, conn)
            .await
            .map_err(|e| fail(Stage::Cleanup, e))
    }

    /// Close a direct connection or return a pooled one
    async fn dispose(&self, strategy: Strategy, conn: S::Conn) -> Result<(), StoreError> {
        match strategy {
            Strategy::Uncached => self.store.close(conn).await,
            Strategy::Pooled => self.store.release(conn).await,
        }
    }

    /// Run both strategies in sequence (uncached first) and derive the
    /// comparison report
    pub async fn compare(&self, query: &str, iterations: u32) -> Result<ComparisonReport, BenchError> {
        let uncached = self.run_strategy(Strategy::Uncached, query, iterations).await?;
        let pooled = self.run_strategy(Strategy::Pooled, query, iterations).await?;
        Ok(ComparisonReport::new(uncached, pooled))
    }

    /// Release all pooled connections. Idempotent.
    pub async fn shutdown(&self) {
        self.store.close_all().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::time::sleep;

    const CONNECT_DELAY: Duration = Duration::from_millis(10);
    const ACQUIRE_DELAY: Duration = Duration::from_micros(100);
    const QUERY_DELAY: Duration = Duration::from_millis(1);

    #[derive(Default)]
    struct MockStore {
        fail_connect_at: Option<u32>,
        fail_query: bool,
        fail_cleanup: bool,
        connects: AtomicU32,
        acquires: AtomicU32,
        releases: AtomicU32,
        closes: AtomicU32,
        close_all_calls: AtomicU32,
    }

    struct MockConn {
        fail_query: bool,
    }

    #[async_trait]
    impl StoreConnection for MockConn {
        async fn fetch_all(&mut self, _query: &str) -> Result<u64, StoreError> {
            sleep(QUERY_DELAY).await;
            if self.fail_query {
                return Err(StoreError::Query("relation does not exist".to_string()));
            }
            Ok(100)
        }
    }

    #[async_trait]
    impl Store for MockStore {
        type Conn = MockConn;

        async fn acquire_new(&self) -> Result<MockConn, StoreError> {
            let n = self.connects.fetch_add(1, Ordering::SeqCst) + 1;
            sleep(CONNECT_DELAY).await;
            if self.fail_connect_at == Some(n) {
                return Err(StoreError::Connect("connection refused".to_string()));
            }
            Ok(MockConn {
                fail_query: self.fail_query,
            })
        }

        async fn acquire(&self) -> Result<MockConn, StoreError> {
            self.acquires.fetch_add(1, Ordering::SeqCst);
            sleep(ACQUIRE_DELAY).await;
            Ok(MockConn {
                fail_query: self.fail_query,
            })
        }

        async fn release(&self, conn: MockConn) -> Result<(), StoreError> {
            drop(conn);
            self.releases.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn close(&self, conn: MockConn) -> Result<(), StoreError> {
            drop(conn);
            self.closes.fetch_add(1, Ordering::SeqCst);
            if self.fail_cleanup {
                return Err(StoreError::Close("socket already gone".to_string()));
            }
            Ok(())
        }

        async fn close_all(&self) {
            self.close_all_calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    // Paused clock: sleeps advance virtual time exactly, so every
    // sample is deterministic down to the float representation.
    #[tokio::test(start_paused = true)]
    async fn test_compare_end_to_end() {
        let runner = BenchmarkRunner::new(MockStore::default());
        let report = runner
            .compare("SELECT * FROM agents LIMIT 100", 50)
            .await
            .expect("compare");

        for result in [&report.new_connections, &report.connection_pool] {
            assert_eq!(result.connection.count, 50);
            assert_eq!(result.query_execution.count, 50);
            assert_eq!(result.total.count, 50);
            assert!(result.connection.min >= 0.0);
            assert!(result.total.min >= 0.0);
        }

        assert!((report.new_connections.connection.mean - 10.0).abs() < 1e-9);
        assert!((report.new_connections.total.mean - 11.0).abs() < 1e-9);
        assert!((report.connection_pool.connection.mean - 0.1).abs() < 1e-9);
        assert_eq!(report.new_connections.connection.stddev, 0.0);

        let conn_mean = report
            .improvement
            .connection_time
            .mean
            .as_percent()
            .expect("defined");
        assert!((conn_mean - 99.0).abs() < 1e-6);

        let total_mean = report
            .improvement
            .total_time
            .mean
            .as_percent()
            .expect("defined");
        assert!((total_mean - 90.0).abs() < 1e-6);

        assert_eq!(report.iterations, 50);
        assert_eq!(runner.store.connects.load(Ordering::SeqCst), 50);
        assert_eq!(runner.store.closes.load(Ordering::SeqCst), 50);
        assert_eq!(runner.store.acquires.load(Ordering::SeqCst), 50);
        assert_eq!(runner.store.releases.load(Ordering::SeqCst), 50);
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_failure_aborts_run() {
        let store = MockStore {
            fail_connect_at: Some(37),
            ..Default::default()
        };
        let runner = BenchmarkRunner::new(store);

        let err = runner
            .run_strategy(Strategy::Uncached, "SELECT 1", 100)
            .await
            .unwrap_err();

        match err {
            BenchError::StrategyExecution {
                iteration, stage, ..
            } => {
                assert_eq!(iteration, 37);
                assert_eq!(stage, Stage::Connect);
            }
            other => panic!("unexpected error: {other}"),
        }

        // The run aborted; no connection past the failing iteration
        assert_eq!(runner.store.connects.load(Ordering::SeqCst), 37);
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_failure_wins_over_cleanup_failure() {
        let store = MockStore {
            fail_query: true,
            fail_cleanup: true,
            ..Default::default()
        };
        let runner = BenchmarkRunner::new(store);

        let err = runner
            .run_strategy(Strategy::Uncached, "SELECT nope", 5)
            .await
            .unwrap_err();

        match err {
            BenchError::StrategyExecution {
                iteration, stage, ..
            } => {
                assert_eq!(iteration, 1);
                assert_eq!(stage, Stage::Query);
            }
            other => panic!("unexpected error: {other}"),
        }

        // Cleanup was still attempted
        assert_eq!(runner.store.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_only_failure_is_surfaced() {
        let store = MockStore {
            fail_cleanup: true,
            ..Default::default()
        };
        let runner = BenchmarkRunner::new(store);

        let err = runner
            .run_strategy(Strategy::Uncached, "SELECT 1", 5)
            .await
            .unwrap_err();

        match err {
            BenchError::StrategyExecution {
                iteration, stage, ..
            } => {
                assert_eq!(iteration, 1);
                assert_eq!(stage, Stage::Cleanup);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_pooled_strategy_never_opens_direct_connections() {
        let runner = BenchmarkRunner::new(MockStore::default());
        runner
            .run_strategy(Strategy::Pooled, "SELECT 1", 8)
            .await
            .expect("run");

        assert_eq!(runner.store.acquires.load(Ordering::SeqCst), 8);
        assert_eq!(runner.store.releases.load(Ordering::SeqCst), 8);
        assert_eq!(runner.store.connects.load(Ordering::SeqCst), 0);
        assert_eq!(runner.store.closes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_preconditions() {
        let runner = BenchmarkRunner::new(MockStore::default());

        let err = runner
            .run_strategy(Strategy::Uncached, "SELECT 1", 0)
            .await
            .unwrap_err();
        assert!(matches!(err, BenchError::Configuration(_)));

        let err = runner
            .run_strategy(Strategy::Uncached, "   ", 10)
            .await
            .unwrap_err();
        assert!(matches!(err, BenchError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_shutdown_is_idempotent() {
        let runner = BenchmarkRunner::new(MockStore::default());
        runner.shutdown().await;
        runner.shutdown().await;
        // Both calls complete without error; the store treats repeats
        // as no-ops
        assert_eq!(runner.store.close_all_calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!(Strategy::from_str("uncached"), Some(Strategy::Uncached));
        assert_eq!(Strategy::from_str("POOLED"), Some(Strategy::Pooled));
        assert_eq!(Strategy::from_str("pool"), Some(Strategy::Pooled));
        assert_eq!(Strategy::from_str("both"), None);
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(Strategy::Uncached.name(), "New Connection Per Query");
        assert_eq!(Strategy::Pooled.name(), "Connection Pool");
    }
}
