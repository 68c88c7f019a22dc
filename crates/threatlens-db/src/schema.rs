//! Rows of the `logs` table and their read-side rendering.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use threatlens_common::{AnalysisRecord, Entity};
use tracing::warn;

use crate::error::Result;

/// Shown in place of stored entity data that no longer decodes.
pub const UNREADABLE_ENTITIES: &str = "[unreadable entity data]";

/// Columns visible to callers below the top tier.
pub const SUMMARY_COLUMNS: &str = "id,analysis,timestamp";

/// A stored row. `text` and `entities` are absent in summary projections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    #[serde(default)]
    pub text: Option<String>,
    /// Risk level as stored, e.g. `"Critical"`.
    pub analysis: String,
    /// Normally a string holding `[[text, label], ...]`. Kept as raw JSON so
    /// a row written in any other shape still loads.
    #[serde(default)]
    pub entities: Option<Value>,
    pub timestamp: String,
}

impl LogEntry {
    /// Drop the columns reserved for the top tier.
    pub fn into_summary(self) -> Self {
        Self { text: None, entities: None, ..self }
    }
}

/// A row about to be inserted; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewLogEntry {
    pub text: String,
    pub analysis: String,
    pub entities: String,
    pub timestamp: String,
}

impl NewLogEntry {
    pub fn from_record(record: &AnalysisRecord) -> Result<Self> {
        Ok(Self {
            text: record.text.clone(),
            analysis: record.risk_level.as_str().to_string(),
            entities: serde_json::to_string(&record.entities)?,
            timestamp: record.timestamp.to_rfc3339(),
        })
    }

    pub fn with_id(self, id: i64) -> LogEntry {
        LogEntry {
            id,
            text: Some(self.text),
            analysis: self.analysis,
            entities: Some(Value::String(self.entities)),
            timestamp: self.timestamp,
        }
    }
}

/// Decoded entity column, or a placeholder when the stored JSON is unreadable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StoredEntities {
    Decoded(Vec<Entity>),
    Unreadable(&'static str),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedLogEntry {
    pub id: i64,
    pub analysis: String,
    pub timestamp: String,
    pub text: Option<String>,
    pub entities: Option<StoredEntities>,
}

/// Render a stored row for display. Entity decode failures are not fatal.
pub fn render_entry(entry: LogEntry) -> RenderedLogEntry {
    let LogEntry { id, text, analysis, entities, timestamp } = entry;
    let entities = entities.map(|raw| match decode_entities(raw) {
        Ok(decoded) => StoredEntities::Decoded(decoded),
        Err(e) => {
            warn!(id, error = %e, "Stored entities could not be decoded");
            StoredEntities::Unreadable(UNREADABLE_ENTITIES)
        }
    });

    RenderedLogEntry { id, analysis, timestamp, text, entities }
}

/// A string column holds encoded JSON; an array is taken as-is.
fn decode_entities(raw: Value) -> serde_json::Result<Vec<Entity>> {
    match raw {
        Value::String(encoded) => serde_json::from_str(&encoded),
        other => serde_json::from_value(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use threatlens_common::{RiskAssessment, RiskLevel};

    fn entry(entities: Option<&str>) -> LogEntry {
        LogEntry {
            id: 7,
            text: Some("Ghost moving to grid nine.".to_string()),
            analysis: "Suspicious".to_string(),
            entities: entities.map(|raw| Value::String(raw.to_string())),
            timestamp: "2026-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_record_encodes_entities_as_pairs() {
        let record = AnalysisRecord::new(
            "Ghost moving.",
            RiskAssessment::new(RiskLevel::Suspicious, "Ghost moving"),
            vec![Entity::new("Ghost", "CALLSIGN")],
        );
        let row = NewLogEntry::from_record(&record).unwrap();
        assert_eq!(row.analysis, "Suspicious");
        assert_eq!(row.entities, r#"[["Ghost","CALLSIGN"]]"#);
    }

    #[test]
    fn test_render_decodes_entities() {
        let rendered = render_entry(entry(Some(r#"[["Ghost","CALLSIGN"]]"#)));
        assert_eq!(
            rendered.entities,
            Some(StoredEntities::Decoded(vec![Entity::new("Ghost", "CALLSIGN")]))
        );
    }

    #[test]
    fn test_render_substitutes_placeholder_for_bad_json() {
        let rendered = render_entry(entry(Some("{not json")));
        assert_eq!(rendered.entities, Some(StoredEntities::Unreadable(UNREADABLE_ENTITIES)));
        assert_eq!(rendered.text.as_deref(), Some("Ghost moving to grid nine."));
    }

    #[test]
    fn test_placeholder_serializes_as_string() {
        let rendered = render_entry(entry(Some("[1, 2]")));
        let json = serde_json::to_value(&rendered).unwrap();
        assert_eq!(json["entities"], UNREADABLE_ENTITIES);
    }

    #[test]
    fn test_render_accepts_array_column() {
        let mut row = entry(None);
        row.entities = Some(serde_json::json!([["Ghost", "CALLSIGN"]]));
        assert_eq!(
            render_entry(row).entities,
            Some(StoredEntities::Decoded(vec![Entity::new("Ghost", "CALLSIGN")]))
        );
    }

    #[test]
    fn test_render_substitutes_placeholder_for_non_string_column() {
        for raw in [serde_json::json!(42), serde_json::json!({"Ghost": "CALLSIGN"}), serde_json::json!(true)] {
            let mut row = entry(None);
            row.entities = Some(raw);
            assert_eq!(render_entry(row).entities, Some(StoredEntities::Unreadable(UNREADABLE_ENTITIES)));
        }
    }

    #[test]
    fn test_summary_drops_reserved_columns() {
        let summary = entry(Some("[]")).into_summary();
        assert_eq!(summary.text, None);
        assert_eq!(summary.entities, None);
        assert_eq!(summary.analysis, "Suspicious");
        assert!(render_entry(summary).entities.is_none());
    }
}
