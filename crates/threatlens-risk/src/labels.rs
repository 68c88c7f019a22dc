//! Candidate labels and the label → risk level mapping.

use threatlens_common::RiskLevel;

/// The fixed candidate set offered to the zero-shot model, for the whole
/// document and for every evidence sentence alike.
pub const CANDIDATE_LABELS: [&str; 3] = [
    "critical threat",
    "suspicious activity",
    "benign communication",
];

/// Case-sensitive substring test, checked in priority order.
/// Total: every label maps to exactly one level.
pub fn risk_level_for_label(label: &str) -> RiskLevel {
    if label.contains("critical") {
        RiskLevel::Critical
    } else if label.contains("suspicious") {
        RiskLevel::Suspicious
    } else {
        RiskLevel::Benign
    }
}
