//! Entity extraction: model spans + pattern rules + label corrections.

use std::collections::HashSet;
use std::sync::Arc;

use threatlens_common::Entity;
use tracing::debug;

use crate::corrections::corrected_label;
use crate::patterns::{custom_patterns, CustomPattern};
use crate::recognizer::EntityRecognizer;
use crate::Result;

/// Merges recognizer output, pattern matches and corrections into one
/// deduplicated entity list.
///
/// Ordering: recognizer spans first (in recognizer order), then pattern
/// matches in pattern-declaration order. No two entities share span text
/// case-insensitively; the first one inserted wins.
pub struct EntityExtractor {
    recognizer: Arc<dyn EntityRecognizer>,
    patterns: &'static [CustomPattern],
}

impl EntityExtractor {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self { recognizer, patterns: custom_patterns() }
    }

    pub async fn extract(&self, text: &str) -> Result<Vec<Entity>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let spans = self.recognizer.recognize(text).await?;

        let mut merged = MergedEntities::with_capacity(spans.len());
        for span in spans {
            merged.push(span.text, span.group);
        }
        let from_model = merged.entities.len();

        for pattern in self.patterns {
            for m in pattern.regex.find_iter(text) {
                merged.push(m.as_str().to_string(), pattern.label.to_string());
            }
        }
        let from_patterns = merged.entities.len() - from_model;

        let mut entities = merged.entities;
        let mut corrected = 0usize;
        for entity in entities.iter_mut() {
            if let Some(label) = corrected_label(&entity.text) {
                if entity.label != label {
                    entity.label = label.to_string();
                    corrected += 1;
                }
            }
        }

        debug!(
            model = self.recognizer.model_id(),
            from_model,
            from_patterns,
            corrected,
            "Entities extracted"
        );

        Ok(entities)
    }
}

/// Insertion-ordered entity list keyed by lowercased span text.
struct MergedEntities {
    entities: Vec<Entity>,
    seen: HashSet<String>,
}

impl MergedEntities {
    fn with_capacity(n: usize) -> Self {
        Self { entities: Vec::with_capacity(n), seen: HashSet::with_capacity(n) }
    }

    fn push(&mut self, text: String, label: String) {
        if text.trim().is_empty() {
            return;
        }
        if self.seen.insert(text.to_lowercase()) {
            self.entities.push(Entity { text, label });
        }
    }
}
