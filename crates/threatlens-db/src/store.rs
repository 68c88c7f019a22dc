//! The analysis log contract.

use async_trait::async_trait;
use threatlens_common::AnalysisRecord;
use threatlens_security::Role;

use crate::error::Result;
use crate::schema::LogEntry;

/// Append/list/delete store for analysis records.
///
/// No transactional isolation is promised between concurrent writers.
#[async_trait]
pub trait AnalysisLog: Send + Sync {
    /// Persist the full record; returns the assigned id.
    async fn append(&self, record: &AnalysisRecord) -> Result<i64>;

    /// Newest first. Callers below the top tier get summary rows
    /// (`id`, `analysis`, `timestamp` only).
    async fn list_recent(&self, limit: usize, role: Role) -> Result<Vec<LogEntry>>;

    /// Deleting an unknown id is not an error.
    async fn delete_one(&self, id: i64) -> Result<()>;

    async fn delete_all(&self) -> Result<()>;
}
