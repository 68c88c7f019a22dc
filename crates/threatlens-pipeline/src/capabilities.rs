//! Process-wide capability handles.
//!
//! The recognizer and classifier are expensive to set up and safe to share,
//! so one set lives in a global slot. `init_global` builds the HTTP backends
//! on first use; `install_global` swaps in any implementation (tests);
//! `shutdown_global` empties the slot.

use std::sync::{Arc, RwLock};

use secrecy::{ExposeSecret, SecretString};
use threatlens_config::Config;
use threatlens_ner::{EntityRecognizer, HttpRecognizer};
use threatlens_risk::{HttpZeroShotClassifier, ZeroShotClassifier};
use tracing::info;

use crate::error::{PipelineError, Result};

static GLOBAL: RwLock<Option<Arc<Capabilities>>> = RwLock::new(None);

/// The two external analysis capabilities.
pub struct Capabilities {
    pub recognizer: Arc<dyn EntityRecognizer>,
    pub classifier: Arc<dyn ZeroShotClassifier>,
}

impl std::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capabilities")
            .field("recognizer", &self.recognizer.model_id())
            .field("classifier", &self.classifier.model_id())
            .finish()
    }
}

impl Capabilities {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>, classifier: Arc<dyn ZeroShotClassifier>) -> Self {
        Self { recognizer, classifier }
    }

    /// HTTP inference backends as configured.
    pub fn from_config(config: &Config) -> Self {
        let recognizer = HttpRecognizer::new(&config.recognizer.base_url, &config.recognizer.model)
            .with_api_key(copy_secret(&config.recognizer.api_key));
        let classifier = HttpZeroShotClassifier::new(&config.classifier.base_url, &config.classifier.model)
            .with_api_key(copy_secret(&config.classifier.api_key));
        Self::new(Arc::new(recognizer), Arc::new(classifier))
    }
}

fn copy_secret(key: &Option<SecretString>) -> Option<SecretString> {
    key.as_ref().map(|k| SecretString::from(k.expose_secret().to_string()))
}

fn poisoned<T>(_: T) -> PipelineError {
    PipelineError::CapabilitiesUnavailable("capability slot lock poisoned".to_string())
}

/// Return the installed capabilities, building them from `config` if the
/// slot is empty. Later calls ignore `config`.
pub fn init_global(config: &Config) -> Result<Arc<Capabilities>> {
    let mut slot = GLOBAL.write().map_err(poisoned)?;
    if let Some(existing) = slot.as_ref() {
        return Ok(Arc::clone(existing));
    }
    let caps = Arc::new(Capabilities::from_config(config));
    info!(
        recognizer = caps.recognizer.model_id(),
        classifier = caps.classifier.model_id(),
        "Capabilities initialised"
    );
    *slot = Some(Arc::clone(&caps));
    Ok(caps)
}

/// Replace whatever is installed.
pub fn install_global(caps: Capabilities) -> Result<Arc<Capabilities>> {
    let caps = Arc::new(caps);
    *GLOBAL.write().map_err(poisoned)? = Some(Arc::clone(&caps));
    Ok(caps)
}

pub fn global() -> Result<Arc<Capabilities>> {
    GLOBAL
        .read()
        .map_err(poisoned)?
        .clone()
        .ok_or_else(|| PipelineError::CapabilitiesUnavailable("capabilities not initialised".to_string()))
}

/// Empty the slot. Handles already cloned out stay valid until dropped.
/// Returns whether anything was installed.
pub fn shutdown_global() -> Result<bool> {
    let previous = GLOBAL.write().map_err(poisoned)?.take();
    if previous.is_some() {
        info!("Capabilities shut down");
    }
    Ok(previous.is_some())
}
