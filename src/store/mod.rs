//! Data-store access layer
//!
//! Defines the capability set the benchmark depends on: opening fresh
//! connections, acquiring/releasing pooled ones, and draining query
//! results. Any store implementing these traits is substitutable.

mod postgres;

pub use postgres::{PgConn, PgStore};

use async_trait::async_trait;

use crate::error::StoreError;

/// Connection provider for a data store.
///
/// `acquire_new` bypasses the pool and opens a brand-new physical
/// connection; `acquire` blocks until a pooled slot is free.
#[async_trait]
pub trait Store: Send + Sync {
    type Conn: StoreConnection;

    /// Open a brand-new physical connection, bypassing the pool
    async fn acquire_new(&self) -> Result<Self::Conn, StoreError>;

    /// Acquire a connection from the pool, blocking until one is available
    async fn acquire(&self) -> Result<Self::Conn, StoreError>;

    /// Return a pooled connection to the pool
    async fn release(&self, conn: Self::Conn) -> Result<(), StoreError>;

    /// Close a direct connection
    async fn close(&self, conn: Self::Conn) -> Result<(), StoreError>;

    /// Close every pooled connection. Idempotent.
    async fn close_all(&self);
}

/// A live connection that can execute queries
#[async_trait]
pub trait StoreConnection: Send {
    /// Execute a query and fully drain its result set, returning the
    /// number of rows produced
    async fn fetch_all(&mut self, query: &str) -> Result<u64, StoreError>;
}
