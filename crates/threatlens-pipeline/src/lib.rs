//! threatlens-pipeline: Request-scoped orchestration of a threat analysis.
//!
//! A request runs entity extraction and risk classification concurrently,
//! merges both into one record, filters it through the disclosure policy for
//! the requester's role, and persists it only for the top tier.
//!
//! Capability handles are shared process-wide through [`capabilities`], with
//! an explicit init / install / teardown lifecycle.

pub mod capabilities;
pub mod context;
pub mod error;
pub mod pipeline;

pub use capabilities::{global, init_global, install_global, shutdown_global, Capabilities};
pub use context::AnalysisRequest;
pub use error::{PipelineError, Result};
pub use pipeline::{AnalysisOutcome, AnalysisPipeline};
