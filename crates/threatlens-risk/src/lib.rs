//! threatlens-risk: Zero-shot risk classification with evidence attribution.
//!
//! `backend` wraps the external classification capability, `labels` maps the
//! winning label to a [`RiskLevel`](threatlens_common::RiskLevel), and
//! `evidence` re-scores individual sentences to pick the most probative one.

pub mod backend;
pub mod classifier;
pub mod evidence;
pub mod labels;

pub use backend::{ClassificationResult, ClassifierError, HttpZeroShotClassifier, ZeroShotClassifier};
pub use classifier::RiskClassifier;
pub use evidence::{select_evidence, split_sentences, MIN_EVIDENCE_CHARS, NO_EVIDENCE};
pub use labels::{risk_level_for_label, CANDIDATE_LABELS};

pub type Result<T> = std::result::Result<T, ClassifierError>;
