//! threatlens-common: Shared analysis types used across all ThreatLens crates.

pub mod entities;

pub use entities::{AnalysisRecord, Entity, RiskAssessment, RiskLevel};
