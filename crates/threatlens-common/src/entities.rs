//! Core analysis types shared by the extractor, classifier, disclosure
//! policy and the analysis log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A named entity: the span text as it appeared in the document plus its label.
///
/// Serialized as a two-element array `["AK-47", "WEAPON"]`, which is the shape
/// the analysis log stores in its `entities` column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct Entity {
    pub text: String,
    pub label: String,
}

impl Entity {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self { text: text.into(), label: label.into() }
    }
}

impl From<(String, String)> for Entity {
    fn from((text, label): (String, String)) -> Self {
        Self { text, label }
    }
}

impl From<Entity> for (String, String) {
    fn from(e: Entity) -> Self {
        (e.text, e.label)
    }
}

// ---------------------------------------------------------------------------
// Risk
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Critical,
    Suspicious,
    Benign,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Critical   => "Critical",
            RiskLevel::Suspicious => "Suspicious",
            RiskLevel::Benign     => "Benign",
        }
    }

    /// Fixed human-readable description attached to every assessment.
    pub fn description(&self) -> &'static str {
        match self {
            RiskLevel::Critical   => "High threat detected",
            RiskLevel::Suspicious => "Requires further review",
            RiskLevel::Benign     => "Low threat potential",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document-level risk decision with the sentence that best supports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    pub description: String,
    pub evidence: String,
}

impl RiskAssessment {
    pub fn new(risk_level: RiskLevel, evidence: impl Into<String>) -> Self {
        Self {
            risk_level,
            description: risk_level.description().to_string(),
            evidence: evidence.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Analysis record
// ---------------------------------------------------------------------------

/// The full, undisclosed result of one analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub text: String,
    pub risk_level: RiskLevel,
    pub description: String,
    pub evidence: String,
    pub entities: Vec<Entity>,
    pub timestamp: DateTime<Utc>,
}

impl AnalysisRecord {
    pub fn new(text: impl Into<String>, assessment: RiskAssessment, entities: Vec<Entity>) -> Self {
        Self {
            text: text.into(),
            risk_level: assessment.risk_level,
            description: assessment.description,
            evidence: assessment.evidence,
            entities,
            timestamp: Utc::now(),
        }
    }
}
