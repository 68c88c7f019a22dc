//! Zero-shot classification capability and its HTTP backend.
//!
//! The HTTP backend speaks the Hugging Face inference format for
//! `zero-shot-classification` models. Responses are converted into
//! [`ClassificationResult`] at this boundary.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Classifier API error [{status}]: {message}")]
    Api { status: u16, message: String },
    #[error("Invalid classifier response: {0}")]
    InvalidResponse(String),
    #[error("Classifier unavailable: {0}")]
    Unavailable(String),
}

// ── Result ────────────────────────────────────────────────────────────────────

/// Ranked labels with parallel confidence scores, best first.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    labels: Vec<String>,
    scores: Vec<f32>,
}

impl ClassificationResult {
    pub fn new(labels: Vec<String>, scores: Vec<f32>) -> Result<Self, ClassifierError> {
        if labels.len() != scores.len() {
            return Err(ClassifierError::InvalidResponse(format!(
                "{} labels but {} scores",
                labels.len(),
                scores.len()
            )));
        }
        Ok(Self { labels, scores })
    }

    /// Build from unordered pairs; ranks them best first (stable on ties).
    pub fn from_pairs<L: Into<String>>(pairs: impl IntoIterator<Item = (L, f32)>) -> Self {
        let mut pairs: Vec<(String, f32)> = pairs.into_iter().map(|(l, s)| (l.into(), s)).collect();
        pairs.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        let (labels, scores) = pairs.into_iter().unzip();
        Self { labels, scores }
    }

    pub fn labels(&self) -> &[String] { &self.labels }
    pub fn scores(&self) -> &[f32] { &self.scores }

    /// Highest-scoring label; the earliest one wins a tie.
    pub fn top_label(&self) -> Option<&str> {
        let mut best: Option<(usize, f32)> = None;
        for (i, &score) in self.scores.iter().enumerate() {
            if best.map_or(true, |(_, b)| score > b) {
                best = Some((i, score));
            }
        }
        best.map(|(i, _)| self.labels[i].as_str())
    }

    /// Score assigned to `label`, if the result contains it.
    pub fn score_for(&self, label: &str) -> Option<f32> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|i| self.scores[i])
    }
}

// ── Trait ─────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait ZeroShotClassifier: Send + Sync {
    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[&str],
    ) -> Result<ClassificationResult, ClassifierError>;
    fn model_id(&self) -> &str;
}

// ── HTTP backend ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct WireResult {
    labels: Vec<String>,
    scores: Vec<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireResponse {
    One(WireResult),
    Batch(Vec<WireResult>),
}

pub struct HttpZeroShotClassifier {
    pub base_url: String,
    pub model: String,
    api_key: Option<SecretString>,
    client: reqwest::Client,
}

impl HttpZeroShotClassifier {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_api_key(mut self, key: Option<SecretString>) -> Self {
        self.api_key = key;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}", self.base_url.trim_end_matches('/'), self.model)
    }
}

#[async_trait]
impl ZeroShotClassifier for HttpZeroShotClassifier {
    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[&str],
    ) -> Result<ClassificationResult, ClassifierError> {
        let body = serde_json::json!({
            "inputs": text,
            "parameters": { "candidate_labels": candidate_labels },
        });

        let mut req = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key.expose_secret());
        }

        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let json: serde_json::Value = resp.json().await?;
        if status >= 400 {
            let message = json["error"]
                .as_str()
                .or_else(|| json["error"]["message"].as_str())
                .unwrap_or("unknown API error")
                .to_string();
            return Err(ClassifierError::Api { status, message });
        }

        let result = parse_result(json)?;
        debug!(model = %self.model, top = ?result.top_label(), "Zero-shot classification complete");
        Ok(result)
    }

    fn model_id(&self) -> &str { &self.model }
}

fn parse_result(json: serde_json::Value) -> Result<ClassificationResult, ClassifierError> {
    let wire = match serde_json::from_value::<WireResponse>(json)? {
        WireResponse::One(r) => r,
        WireResponse::Batch(mut batch) => {
            if batch.is_empty() {
                return Err(ClassifierError::InvalidResponse("empty batch".to_string()));
            }
            batch.swap_remove(0)
        }
    };
    ClassificationResult::new(wire.labels, wire.scores)
}
