//! The analysis request flow.

use std::sync::Arc;

use serde::Serialize;
use threatlens_common::{AnalysisRecord, RiskLevel};
use threatlens_db::{render_entry, AnalysisLog, RenderedLogEntry};
use threatlens_ner::{EntityExtractor, EntityRecognizer};
use threatlens_risk::{RiskClassifier, ZeroShotClassifier};
use threatlens_security::{DisclosurePolicy, DisclosureView, RiskDetails, Role};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::capabilities::Capabilities;
use crate::context::AnalysisRequest;
use crate::error::{PipelineError, Result};

/// What the requester gets back. The risk level is visible at every
/// clearance; everything else goes through the disclosure view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOutcome {
    pub request_id: Uuid,
    pub risk_level: RiskLevel,
    pub view: DisclosureView,
    /// Id of the persisted record; only set for top-tier requests with a log.
    pub log_id: Option<i64>,
}

pub struct AnalysisPipeline {
    extractor: EntityExtractor,
    classifier: RiskClassifier,
    log: Option<Arc<dyn AnalysisLog>>,
}

impl AnalysisPipeline {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>, classifier: Arc<dyn ZeroShotClassifier>) -> Self {
        Self {
            extractor: EntityExtractor::new(recognizer),
            classifier: RiskClassifier::new(classifier),
            log: None,
        }
    }

    pub fn from_capabilities(caps: &Capabilities) -> Self {
        Self::new(Arc::clone(&caps.recognizer), Arc::clone(&caps.classifier))
    }

    pub fn with_log(mut self, log: Arc<dyn AnalysisLog>) -> Self {
        self.log = Some(log);
        self
    }

    pub fn with_evidence_concurrency(mut self, n: usize) -> Self {
        self.classifier = self.classifier.with_evidence_concurrency(n);
        self
    }

    /// Extract, classify, disclose and (top tier only) persist.
    ///
    /// A failure of either capability fails the whole request and nothing
    /// is written.
    #[instrument(
        skip(self, request),
        fields(request_id = %request.request_id, role = %request.role, bytes = request.text.len())
    )]
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisOutcome> {
        let (entities, assessment) = tokio::try_join!(
            async { self.extractor.extract(&request.text).await.map_err(PipelineError::from) },
            async { self.classifier.classify(&request.text).await.map_err(PipelineError::from) },
        )?;

        let details = RiskDetails {
            description: assessment.description.clone(),
            evidence: assessment.evidence.clone(),
        };
        let view = DisclosurePolicy::disclose(request.role, &request.text, &entities, &details);
        let risk_level = assessment.risk_level;
        let entity_count = entities.len();
        let record = AnalysisRecord::new(request.text.clone(), assessment, entities);

        let log_id = match &self.log {
            Some(log) if request.role.is_top_tier() => Some(log.append(&record).await?),
            _ => None,
        };

        info!(
            risk_level = %risk_level,
            entities = entity_count,
            persisted = log_id.is_some(),
            "Analysis complete"
        );

        Ok(AnalysisOutcome { request_id: request.request_id, risk_level, view, log_id })
    }

    /// Most recent log entries, newest first, projected for `role`.
    pub async fn history(&self, role: Role, limit: usize) -> Result<Vec<RenderedLogEntry>> {
        let Some(log) = &self.log else {
            return Ok(Vec::new());
        };
        let rows = log.list_recent(limit, role).await?;
        debug!(rows = rows.len(), role = %role, "History fetched");
        Ok(rows.into_iter().map(render_entry).collect())
    }

    pub async fn delete_log(&self, role: Role, id: i64) -> Result<()> {
        require_top_tier(role, "delete log entries")?;
        if let Some(log) = &self.log {
            log.delete_one(id).await?;
        }
        Ok(())
    }

    pub async fn clear_log(&self, role: Role) -> Result<()> {
        require_top_tier(role, "clear the log")?;
        if let Some(log) = &self.log {
            log.delete_all().await?;
        }
        Ok(())
    }
}

fn require_top_tier(role: Role, action: &str) -> Result<()> {
    if role.is_top_tier() {
        Ok(())
    } else {
        Err(PipelineError::Forbidden(format!("{role} may not {action}")))
    }
}
