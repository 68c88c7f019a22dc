//! Shared testing utilities for the ThreatLens workspace.
//!
//! Stub capabilities are deterministic: the same text always produces the
//! same spans and scores, which is what the extractor and classifier tests
//! rely on.

pub mod fixtures;
mod stubs;

pub use stubs::{FailingClassifier, FailingRecognizer, StubClassifier, StubRecognizer};
