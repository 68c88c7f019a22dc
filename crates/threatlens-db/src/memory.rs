//! In-process analysis log.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use threatlens_common::AnalysisRecord;
use threatlens_security::Role;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::Result;
use crate::schema::{LogEntry, NewLogEntry};
use crate::store::AnalysisLog;

/// Rows kept in insertion order; ids increase monotonically from 1.
pub struct MemoryLog {
    rows: RwLock<Vec<LogEntry>>,
    next_id: AtomicI64,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self { rows: RwLock::new(Vec::new()), next_id: AtomicI64::new(1) }
    }

    /// Insert a prepared row as-is.
    pub async fn append_entry(&self, entry: NewLogEntry) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.rows.write().await.push(entry.with_id(id));
        id
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

impl Default for MemoryLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnalysisLog for MemoryLog {
    async fn append(&self, record: &AnalysisRecord) -> Result<i64> {
        let entry = NewLogEntry::from_record(record)?;
        let id = self.append_entry(entry).await;
        debug!(id, "Analysis appended to memory log");
        Ok(id)
    }

    async fn list_recent(&self, limit: usize, role: Role) -> Result<Vec<LogEntry>> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .map(|e| if role.is_top_tier() { e } else { e.into_summary() })
            .collect())
    }

    async fn delete_one(&self, id: i64) -> Result<()> {
        self.rows.write().await.retain(|e| e.id != id);
        Ok(())
    }

    async fn delete_all(&self) -> Result<()> {
        self.rows.write().await.clear();
        Ok(())
    }
}
