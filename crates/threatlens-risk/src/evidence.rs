//! Evidence selection: which sentence best supports the document-level label.
//!
//! Every sentence long enough to carry meaning is classified on its own and
//! scored against the label that won for the whole document. The sentence
//! with the strictly highest score is kept; earlier sentences win ties.

use std::sync::OnceLock;

use futures_util::stream::{self, StreamExt, TryStreamExt};
use regex::Regex;
use tracing::debug;

use crate::backend::ZeroShotClassifier;
use crate::labels::CANDIDATE_LABELS;
use crate::Result;

pub const NO_EVIDENCE: &str = "No evidence available";

/// Sentences shorter than this (in characters, after trimming) are not re-scored.
pub const MIN_EVIDENCE_CHARS: usize = 10;

fn sentence_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+").expect("static sentence pattern compiles"))
}

/// Split on runs of `.`, `!`, `?`, trimming and dropping empty fragments.
pub fn split_sentences(text: &str) -> Vec<&str> {
    sentence_break()
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Pick the evidence sentence for `top_label`.
///
/// Up to one classification call per qualifying sentence. At most
/// `concurrency` calls are in flight; results are consumed in sentence order
/// regardless of completion order, so the outcome does not depend on it.
pub async fn select_evidence(
    classifier: &dyn ZeroShotClassifier,
    text: &str,
    top_label: &str,
    concurrency: usize,
) -> Result<String> {
    let sentences = split_sentences(text);

    let first = match sentences.as_slice() {
        [] => return Ok(NO_EVIDENCE.to_string()),
        [only] => return Ok((*only).to_string()),
        [first, ..] => *first,
    };

    let candidates: Vec<&str> = sentences
        .iter()
        .copied()
        .filter(|s| s.chars().count() >= MIN_EVIDENCE_CHARS)
        .collect();

    let scores: Vec<Option<f32>> = stream::iter(candidates.iter().copied())
        .map(|sentence| async move {
            classifier
                .classify(sentence, &CANDIDATE_LABELS)
                .await
                .map(|result| result.score_for(top_label))
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    let mut best: Option<(&str, f32)> = None;
    for (&sentence, score) in candidates.iter().zip(scores) {
        let Some(score) = score.filter(|s| !s.is_nan()) else {
            continue;
        };
        if best.map_or(true, |(_, max)| score > max) {
            best = Some((sentence, score));
        }
    }

    debug!(
        sentences = sentences.len(),
        rescored = candidates.len(),
        best_score = ?best.map(|(_, s)| s),
        "Evidence selected"
    );

    Ok(best.map_or(first, |(s, _)| s).to_string())
}
