//! Document-level risk classification.

use std::sync::Arc;

use threatlens_common::RiskAssessment;
use tracing::info;

use crate::backend::{ClassifierError, ZeroShotClassifier};
use crate::evidence::select_evidence;
use crate::labels::{risk_level_for_label, CANDIDATE_LABELS};
use crate::Result;

pub struct RiskClassifier {
    backend: Arc<dyn ZeroShotClassifier>,
    evidence_concurrency: usize,
}

impl RiskClassifier {
    pub fn new(backend: Arc<dyn ZeroShotClassifier>) -> Self {
        Self { backend, evidence_concurrency: 1 }
    }

    /// Allow up to `n` evidence re-scoring calls in flight (minimum 1).
    pub fn with_evidence_concurrency(mut self, n: usize) -> Self {
        self.evidence_concurrency = n.max(1);
        self
    }

    /// Classify the whole text once, map the winning label to a risk level,
    /// then attribute evidence. Costs 1 + (qualifying sentences) calls when
    /// the text has two or more sentences.
    pub async fn classify(&self, text: &str) -> Result<RiskAssessment> {
        let result = self.backend.classify(text, &CANDIDATE_LABELS).await?;
        let top_label = result
            .top_label()
            .ok_or_else(|| ClassifierError::InvalidResponse("classifier returned no labels".to_string()))?
            .to_string();

        let risk_level = risk_level_for_label(&top_label);
        let evidence = select_evidence(
            self.backend.as_ref(),
            text,
            &top_label,
            self.evidence_concurrency,
        )
        .await?;

        info!(
            model = self.backend.model_id(),
            top_label = %top_label,
            risk_level = %risk_level,
            "Risk assessed"
        );

        Ok(RiskAssessment::new(risk_level, evidence))
    }
}
