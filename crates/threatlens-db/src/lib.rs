//! ThreatLens analysis log.
//!
//! A minimal append/list/delete store for full analysis records. Only
//! top-tier analyses are written; listings are projected per role.
//!
//! Backends:
//!   MemoryLog:   in-process, used by tests and the default config
//!   SupabaseLog: Supabase (PostgREST) `logs` table
//!
//! # Example
//!
//! ```rust,no_run
//! use threatlens_db::{AnalysisLog, MemoryLog};
//! use threatlens_security::Role;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let log = MemoryLog::new();
//!     for entry in log.list_recent(5, Role::Operative).await? {
//!         println!("{} {}", entry.id, entry.analysis);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod memory;
pub mod schema;
pub mod store;
pub mod supabase;

pub use error::{DbError, Result};
pub use memory::MemoryLog;
pub use schema::{render_entry, LogEntry, NewLogEntry, RenderedLogEntry, StoredEntities, UNREADABLE_ENTITIES};
pub use store::AnalysisLog;
pub use supabase::SupabaseLog;
