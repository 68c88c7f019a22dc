//! Entity recognition capability and its HTTP backend.
//!
//! The HTTP backend speaks the Hugging Face inference format for
//! token-classification models with `aggregation_strategy = "simple"`.
//! The JSON payload is converted into [`RecognizedSpan`] right here and never
//! travels further.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

use crate::{NerError, Result};

/// One span reported by the recognizer: the surface text and its group label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizedSpan {
    pub text: String,
    pub group: String,
}

impl RecognizedSpan {
    pub fn new(text: impl Into<String>, group: impl Into<String>) -> Self {
        Self { text: text.into(), group: group.into() }
    }
}

#[async_trait]
pub trait EntityRecognizer: Send + Sync {
    /// Spans in document order. Must be deterministic for a given text.
    async fn recognize(&self, text: &str) -> Result<Vec<RecognizedSpan>>;
    fn model_id(&self) -> &str;
}

// ── HTTP backend ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct WireSpan {
    #[serde(alias = "entity")]
    entity_group: String,
    word: String,
}

pub struct HttpRecognizer {
    pub base_url: String,
    pub model: String,
    api_key: Option<SecretString>,
    client: reqwest::Client,
}

impl HttpRecognizer {
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
impl EntityRecognizer for HttpRecognizer {
    async fn recognize(&self, text: &str) -> Result<Vec<RecognizedSpan>> {
        let body = serde_json::json!({
            "inputs": text,
            "parameters": { "aggregation_strategy": "simple" },
        });

        let mut req = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key.expose_secret());
        }

        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let json: serde_json::Value = resp.json().await?;
        if status >= 400 {
            return Err(NerError::Api { status, message: api_error_message(&json) });
        }

        let spans = parse_spans(json)?;
        debug!(model = %self.model, spans = spans.len(), "Recognizer returned spans");
        Ok(spans)
    }

    fn model_id(&self) -> &str { &self.model }
}

fn api_error_message(json: &serde_json::Value) -> String {
    json["error"]
        .as_str()
        .or_else(|| json["error"]["message"].as_str())
        .or_else(|| json["message"].as_str())
        .unwrap_or("unknown API error")
        .to_string()
}

fn parse_spans(json: serde_json::Value) -> Result<Vec<RecognizedSpan>> {
    let wire: Vec<WireSpan> = serde_json::from_value(json)?;
    Ok(wire
        .into_iter()
        .map(|w| RecognizedSpan { text: w.word, group: w.entity_group })
        .collect())
}
