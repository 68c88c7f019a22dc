//! Canonical report texts and matching stub setups.

use crate::{StubClassifier, StubRecognizer};

pub const DELHI_REPORT: &str = "AK-47 was seen near Delhi. Everything else is normal.";
pub const DELHI_FIRST_SENTENCE: &str = "AK-47 was seen near Delhi";
pub const DELHI_SECOND_SENTENCE: &str = "Everything else is normal";

/// Recognizes "AK-47" (as MISC) and "Delhi" (as LOC).
pub fn delhi_recognizer() -> StubRecognizer {
    StubRecognizer::new(&[("AK-47", "MISC"), ("Delhi", "LOC")])
}

/// Document-level "critical threat"; sentence scores 0.91 and 0.12.
pub fn delhi_classifier() -> StubClassifier {
    StubClassifier::new()
        .with_response(DELHI_REPORT, &[
            ("critical threat", 0.72),
            ("suspicious activity", 0.20),
            ("benign communication", 0.08),
        ])
        .with_response(DELHI_FIRST_SENTENCE, &[
            ("critical threat", 0.91),
            ("suspicious activity", 0.06),
            ("benign communication", 0.03),
        ])
        .with_response(DELHI_SECOND_SENTENCE, &[
            ("benign communication", 0.80),
            ("critical threat", 0.12),
            ("suspicious activity", 0.08),
        ])
}
