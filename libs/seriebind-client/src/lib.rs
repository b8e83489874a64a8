//! Session plumbing between the binding engine and external query/write
//! collaborators.
//!
//! The transport itself is out of scope: backends implement [`QueryExecutor`]
//! and [`PointWriter`], and a [`Session`] — an explicitly passed handle, not
//! process-wide state — drives decode and encode against them.

pub mod error;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use seriebind::{Bind, Point, Record, Series, from_series, to_point};

pub use error::ClientError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

// ═══════════════════════════════════════════════════════════════
//  Collaborator traits
// ═══════════════════════════════════════════════════════════════

/// Executes a query command against a database and returns the raw series.
pub trait QueryExecutor: Send + Sync {
    fn query(&self, database: &str, command: &str) -> BoxFuture<'_, Result<Vec<Series>, ClientError>>;
}

/// Transmits encoded points to a database.
pub trait PointWriter: Send + Sync {
    fn write(&self, database: &str, points: Vec<Point>) -> BoxFuture<'_, Result<(), ClientError>>;
}

// ═══════════════════════════════════════════════════════════════
//  Session
// ═══════════════════════════════════════════════════════════════

/// One database session over a pair of collaborators.
pub struct Session {
    executor: Arc<dyn QueryExecutor>,
    writer: Arc<dyn PointWriter>,
    database: String,
}

impl Session {
    pub fn new(
        executor: Arc<dyn QueryExecutor>,
        writer: Arc<dyn PointWriter>,
        database: impl Into<String>,
    ) -> Self {
        Self { executor, writer, database: database.into() }
    }

    /// Run `command` and return the raw series untouched.
    pub async fn query_raw(&self, command: &str) -> Result<Vec<Series>, ClientError> {
        tracing::debug!(database = %self.database, command, "executing query");
        self.executor.query(&self.database, command).await
    }

    /// Run `command` and bind the first series of the result into `dst`.
    /// An empty result leaves the destination untouched.
    pub async fn query_into<T: Bind>(
        &self,
        command: &str,
        dst: &mut T,
        select: &[String],
    ) -> Result<(), ClientError> {
        let series = self.query_raw(command).await?;
        match series.first() {
            Some(series) => Ok(from_series(dst, series, select)?),
            None => Ok(()),
        }
    }

    /// Encode one record and hand it to the write collaborator.
    pub async fn insert<R: Record>(&self, record: &R) -> Result<(), ClientError> {
        let point = to_point(record).ok_or(ClientError::NotAPoint)?;
        self.write_points(vec![point]).await
    }

    pub async fn write_points(&self, points: Vec<Point>) -> Result<(), ClientError> {
        tracing::debug!(database = %self.database, points = points.len(), "writing points");
        self.writer.write(&self.database, points).await
    }
}
