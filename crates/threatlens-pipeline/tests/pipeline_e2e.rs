//! End-to-end analysis flow against stub capabilities and the memory log.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use threatlens_common::{Entity, RiskLevel};
use threatlens_db::{AnalysisLog, MemoryLog, StoredEntities};
use threatlens_pipeline::{AnalysisPipeline, AnalysisRequest, PipelineError};
use threatlens_security::{DisclosurePolicy, RiskDetails, Role};
use threatlens_test_utils::fixtures::{
    delhi_classifier, delhi_recognizer, DELHI_FIRST_SENTENCE, DELHI_REPORT,
};
use threatlens_test_utils::{FailingClassifier, FailingRecognizer, StubClassifier, StubRecognizer};

fn delhi_pipeline(log: &Arc<MemoryLog>) -> AnalysisPipeline {
    AnalysisPipeline::new(Arc::new(delhi_recognizer()), Arc::new(delhi_classifier()))
        .with_log(log.clone())
}

fn delhi_entities() -> Vec<Entity> {
    vec![Entity::new("AK-47", "MISC"), Entity::new("Delhi", "LOC")]
}

#[tokio::test]
async fn test_operative_gets_full_view_and_record_is_logged() {
    let log = Arc::new(MemoryLog::new());
    let pipeline = delhi_pipeline(&log);
    let request = AnalysisRequest::new("Operative", DELHI_REPORT);

    let outcome = pipeline.analyze(&request).await.unwrap();

    assert_eq!(outcome.request_id, request.request_id);
    assert_eq!(outcome.risk_level, RiskLevel::Critical);
    assert_eq!(outcome.view.content.as_deref(), Some(DELHI_REPORT));
    assert_eq!(outcome.view.entity_count, Some(2));
    assert_eq!(outcome.view.entities, delhi_entities());
    assert_eq!(
        outcome.view.risk_details,
        Some(RiskDetails {
            description: "High threat detected".to_string(),
            evidence: DELHI_FIRST_SENTENCE.to_string(),
        })
    );

    let rows = log.list_recent(10, Role::Operative).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(Some(rows[0].id), outcome.log_id);
    assert_eq!(rows[0].analysis, "Critical");
    assert_eq!(rows[0].text.as_deref(), Some(DELHI_REPORT));
    assert_eq!(
        rows[0].entities.as_ref().and_then(|v| v.as_str()),
        Some(r#"[["AK-47","MISC"],["Delhi","LOC"]]"#)
    );
}

#[tokio::test]
async fn test_only_the_top_tier_is_persisted() {
    let log = Arc::new(MemoryLog::new());
    let pipeline = delhi_pipeline(&log);

    for name in ["Observer", "Analyst", "Commander", "Administrator", "operative"] {
        let outcome = pipeline.analyze(&AnalysisRequest::new(name, DELHI_REPORT)).await.unwrap();
        assert_eq!(outcome.log_id, None, "{name}");
    }
    assert!(log.is_empty().await);

    pipeline.analyze(&AnalysisRequest::new("Operative", DELHI_REPORT)).await.unwrap();
    assert_eq!(log.len().await, 1);
}

#[tokio::test]
async fn test_view_matches_disclosure_policy_for_every_role() {
    let log = Arc::new(MemoryLog::new());
    let pipeline = delhi_pipeline(&log);
    let details = RiskDetails {
        description: "High threat detected".to_string(),
        evidence: DELHI_FIRST_SENTENCE.to_string(),
    };

    for role in Role::ALL {
        let outcome = pipeline.analyze(&AnalysisRequest::with_role(role, DELHI_REPORT)).await.unwrap();
        let expected = DisclosurePolicy::disclose(role, DELHI_REPORT, &delhi_entities(), &details);
        assert_eq!(outcome.view, expected);
        // The level itself is never redacted.
        assert_eq!(outcome.risk_level, RiskLevel::Critical);
    }
}

#[tokio::test]
async fn test_unknown_role_is_treated_as_observer() {
    let pipeline = AnalysisPipeline::new(Arc::new(delhi_recognizer()), Arc::new(delhi_classifier()));
    let outcome = pipeline.analyze(&AnalysisRequest::new("root", DELHI_REPORT)).await.unwrap();
    assert_eq!(outcome.view.role, Role::Observer);
    assert_eq!(outcome.view.content, None);
    assert_eq!(outcome.view.entity_count, None);
    assert!(outcome.view.entities.is_empty());
    assert_eq!(outcome.view.risk_details, None);
}

#[tokio::test]
async fn test_recognizer_failure_aborts_without_persisting() {
    let log = Arc::new(MemoryLog::new());
    let pipeline = AnalysisPipeline::new(Arc::new(FailingRecognizer), Arc::new(delhi_classifier()))
        .with_log(log.clone());

    let err = pipeline.analyze(&AnalysisRequest::new("Operative", DELHI_REPORT)).await.unwrap_err();
    assert!(matches!(err, PipelineError::Recognition(_)));
    assert!(log.is_empty().await);
}

#[tokio::test]
async fn test_classifier_failure_aborts_without_persisting() {
    let log = Arc::new(MemoryLog::new());
    let pipeline = AnalysisPipeline::new(Arc::new(delhi_recognizer()), Arc::new(FailingClassifier))
        .with_log(log.clone());

    let err = pipeline.analyze(&AnalysisRequest::new("Operative", DELHI_REPORT)).await.unwrap_err();
    assert!(matches!(err, PipelineError::Classification(_)));
    assert!(log.is_empty().await);
}

#[tokio::test]
async fn test_empty_text_still_gets_a_risk_level() {
    let recognizer = Arc::new(StubRecognizer::new(&[("Delhi", "LOC")]));
    let pipeline = AnalysisPipeline::new(recognizer.clone(), Arc::new(StubClassifier::new()));

    let outcome = pipeline.analyze(&AnalysisRequest::new("Operative", "")).await.unwrap();
    assert_eq!(outcome.risk_level, RiskLevel::Benign);
    assert_eq!(outcome.view.entity_count, Some(0));
    assert_eq!(
        outcome.view.risk_details.map(|d| d.evidence),
        Some("No evidence available".to_string())
    );
    assert_eq!(recognizer.call_count(), 0);
}

#[tokio::test]
async fn test_concurrent_evidence_gives_the_sequential_answer() {
    let text = "Convoy departed at noon. Shots fired near the bridge. Area secured afterwards.";
    let classifier = || {
        StubClassifier::new()
            .with_response(text, &[("critical threat", 0.8), ("benign communication", 0.2)])
            .with_response("Convoy departed at noon", &[("critical threat", 0.30)])
            .with_response("Shots fired near the bridge", &[("critical threat", 0.85)])
            .with_response("Area secured afterwards", &[("critical threat", 0.10)])
            .with_delay("Shots fired near the bridge", Duration::from_millis(30))
    };

    let sequential = AnalysisPipeline::new(Arc::new(StubRecognizer::new(&[])), Arc::new(classifier()))
        .analyze(&AnalysisRequest::new("Operative", text))
        .await
        .unwrap();

    let stub = Arc::new(classifier());
    let concurrent = AnalysisPipeline::new(Arc::new(StubRecognizer::new(&[])), stub.clone())
        .with_evidence_concurrency(3)
        .analyze(&AnalysisRequest::new("Operative", text))
        .await
        .unwrap();

    assert_eq!(concurrent.view.risk_details, sequential.view.risk_details);
    assert_eq!(
        concurrent.view.risk_details.map(|d| d.evidence).as_deref(),
        Some("Shots fired near the bridge")
    );
    assert!(stub.peak_in_flight() > 1);
}

#[tokio::test]
async fn test_history_is_projected_per_role() {
    let log = Arc::new(MemoryLog::new());
    let pipeline = delhi_pipeline(&log);
    pipeline.analyze(&AnalysisRequest::new("Operative", DELHI_REPORT)).await.unwrap();

    let full = pipeline.history(Role::Operative, 5).await.unwrap();
    assert_eq!(full.len(), 1);
    assert_eq!(full[0].text.as_deref(), Some(DELHI_REPORT));
    assert_eq!(full[0].entities, Some(StoredEntities::Decoded(delhi_entities())));

    let summary = pipeline.history(Role::Analyst, 5).await.unwrap();
    assert_eq!(summary[0].analysis, "Critical");
    assert_eq!(summary[0].text, None);
    assert_eq!(summary[0].entities, None);
}

#[tokio::test]
async fn test_deletes_require_the_top_tier() {
    let log = Arc::new(MemoryLog::new());
    let pipeline = delhi_pipeline(&log);
    let id = pipeline
        .analyze(&AnalysisRequest::new("Operative", DELHI_REPORT))
        .await
        .unwrap()
        .log_id
        .unwrap();

    for role in [Role::Observer, Role::Analyst, Role::Commander] {
        assert!(matches!(pipeline.delete_log(role, id).await, Err(PipelineError::Forbidden(_))));
        assert!(matches!(pipeline.clear_log(role).await, Err(PipelineError::Forbidden(_))));
    }
    assert_eq!(log.len().await, 1);

    pipeline.delete_log(Role::Operative, id).await.unwrap();
    assert!(log.is_empty().await);

    pipeline.analyze(&AnalysisRequest::new("Operative", DELHI_REPORT)).await.unwrap();
    pipeline.analyze(&AnalysisRequest::new("Operative", DELHI_REPORT)).await.unwrap();
    pipeline.clear_log(Role::Operative).await.unwrap();
    assert!(log.is_empty().await);
}

#[tokio::test]
async fn test_without_a_log_history_is_empty_and_deletes_are_noops() {
    let pipeline = AnalysisPipeline::new(Arc::new(delhi_recognizer()), Arc::new(delhi_classifier()));
    let outcome = pipeline.analyze(&AnalysisRequest::new("Operative", DELHI_REPORT)).await.unwrap();
    assert_eq!(outcome.log_id, None);
    assert!(pipeline.history(Role::Operative, 5).await.unwrap().is_empty());
    pipeline.delete_log(Role::Operative, 1).await.unwrap();
    pipeline.clear_log(Role::Operative).await.unwrap();
}

#[tokio::test]
async fn test_outcome_serializes_with_redacted_nulls() {
    let pipeline = AnalysisPipeline::new(Arc::new(delhi_recognizer()), Arc::new(delhi_classifier()));
    let outcome = pipeline.analyze(&AnalysisRequest::new("Commander", DELHI_REPORT)).await.unwrap();
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["risk_level"], "Critical");
    assert_eq!(json["view"]["entities"], serde_json::json!([["AK-47", "MISC"], ["Delhi", "LOC"]]));
    assert!(json["view"]["risk_details"].is_null());
    assert!(json["log_id"].is_null());
}
