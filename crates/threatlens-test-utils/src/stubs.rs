use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use threatlens_ner::{EntityRecognizer, NerError, RecognizedSpan};
use threatlens_risk::{ClassificationResult, ClassifierError, ZeroShotClassifier};

// ── Recognition ──────────────────────────────────────────────────────────────

/// Reports every case-sensitive occurrence of its lexicon words, in text order.
pub struct StubRecognizer {
    lexicon: Vec<(String, String)>,
    calls: AtomicUsize,
}

impl StubRecognizer {
    pub fn new(lexicon: &[(&str, &str)]) -> Self {
        Self {
            lexicon: lexicon.iter().map(|(w, g)| (w.to_string(), g.to_string())).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EntityRecognizer for StubRecognizer {
    async fn recognize(&self, text: &str) -> Result<Vec<RecognizedSpan>, NerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut found: Vec<(usize, RecognizedSpan)> = Vec::new();
        for (word, group) in &self.lexicon {
            for (pos, m) in text.match_indices(word.as_str()) {
                found.push((pos, RecognizedSpan::new(m, group.as_str())));
            }
        }
        found.sort_by_key(|(pos, _)| *pos);
        Ok(found.into_iter().map(|(_, span)| span).collect())
    }

    fn model_id(&self) -> &str { "stub-ner" }
}

pub struct FailingRecognizer;

#[async_trait]
impl EntityRecognizer for FailingRecognizer {
    async fn recognize(&self, _text: &str) -> Result<Vec<RecognizedSpan>, NerError> {
        Err(NerError::Unavailable("stub recognizer is down".to_string()))
    }

    fn model_id(&self) -> &str { "failing-ner" }
}

// ── Classification ───────────────────────────────────────────────────────────

/// Answers from a per-text table, falling back to a default score set.
///
/// Texts are matched exactly; evidence sentences arrive trimmed and without
/// their terminating punctuation.
pub struct StubClassifier {
    default: Vec<(String, f32)>,
    responses: HashMap<String, Vec<(String, f32)>>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

fn owned(scores: &[(&str, f32)]) -> Vec<(String, f32)> {
    scores.iter().map(|(l, s)| (l.to_string(), *s)).collect()
}

impl StubClassifier {
    /// Defaults to a confident "benign communication".
    pub fn new() -> Self {
        Self {
            default: owned(&[
                ("benign communication", 0.80),
                ("suspicious activity", 0.15),
                ("critical threat", 0.05),
            ]),
            responses: HashMap::new(),
            delays: HashMap::new(),
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_default(mut self, scores: &[(&str, f32)]) -> Self {
        self.default = owned(scores);
        self
    }

    pub fn with_response(mut self, text: &str, scores: &[(&str, f32)]) -> Self {
        self.responses.insert(text.to_string(), owned(scores));
        self
    }

    /// Delay the answer for `text`, to shuffle completion order.
    pub fn with_delay(mut self, text: &str, delay: Duration) -> Self {
        self.delays.insert(text.to_string(), delay);
        self
    }

    /// Every text classified so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("stub call log poisoned").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }

    /// Highest number of overlapping `classify` calls observed.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

impl Default for StubClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ZeroShotClassifier for StubClassifier {
    async fn classify(
        &self,
        text: &str,
        _candidate_labels: &[&str],
    ) -> Result<ClassificationResult, ClassifierError> {
        self.calls.lock().expect("stub call log poisoned").push(text.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(text) {
            tokio::time::sleep(*delay).await;
        } else {
            tokio::task::yield_now().await;
        }

        let scores = self.responses.get(text).unwrap_or(&self.default);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(ClassificationResult::from_pairs(scores.iter().map(|(l, s)| (l.as_str(), *s))))
    }

    fn model_id(&self) -> &str { "stub-zero-shot" }
}

pub struct FailingClassifier;

#[async_trait]
impl ZeroShotClassifier for FailingClassifier {
    async fn classify(
        &self,
        _text: &str,
        _candidate_labels: &[&str],
    ) -> Result<ClassificationResult, ClassifierError> {
        Err(ClassifierError::Unavailable("stub classifier is down".to_string()))
    }

    fn model_id(&self) -> &str { "failing-zero-shot" }
}
