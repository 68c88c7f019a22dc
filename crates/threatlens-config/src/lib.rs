//! Configuration loading for ThreatLens.
//! Reads threatlens.toml from the current directory or the path in the
//! THREATLENS_CONFIG env var. A `.env` file is honoured for secrets.

use std::path::Path;

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::debug;

pub const CONFIG_ENV: &str = "THREATLENS_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "threatlens.toml";

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub recognizer: RecognizerConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Deserialize)]
pub struct RecognizerConfig {
    #[serde(default = "default_inference_url")]
    pub base_url: String,
    #[serde(default = "default_ner_model")]
    pub model: String,
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub api_key: Option<SecretString>,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self { base_url: default_inference_url(), model: default_ner_model(), api_key: None }
    }
}

#[derive(Debug, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_inference_url")]
    pub base_url: String,
    #[serde(default = "default_zero_shot_model")]
    pub model: String,
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub api_key: Option<SecretString>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self { base_url: default_inference_url(), model: default_zero_shot_model(), api_key: None }
    }
}

fn default_inference_url()   -> String { "https://api-inference.huggingface.co".to_string() }
fn default_ner_model()       -> String { "Davlan/xlm-roberta-base-ner-hrl".to_string() }
fn default_zero_shot_model() -> String { "joeddav/xlm-roberta-large-xnli".to_string() }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Supabase,
}

#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub api_key: Option<SecretString>,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            url: None,
            api_key: None,
            table: default_table(),
            history_limit: default_history_limit(),
        }
    }
}

fn default_table()         -> String { "logs".to_string() }
fn default_history_limit() -> usize  { 5 }

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Number of evidence re-scoring calls allowed in flight. 1 = sequential.
    #[serde(default = "default_evidence_concurrency")]
    pub evidence_concurrency: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { evidence_concurrency: default_evidence_concurrency() }
    }
}

fn default_evidence_concurrency() -> usize { 1 }

fn deserialize_secret<'de, D>(deserializer: D) -> std::result::Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()).map(SecretString::from))
}

#[cfg(test)]
mod tests;

impl Config {
    /// Load configuration from threatlens.toml.
    /// Checks THREATLENS_CONFIG env var first, then current directory.
    /// A missing file is not an error: defaults apply.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let path = std::env::var(CONFIG_ENV)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = if Path::new(&path).exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|source| ConfigError::Read { path: path.clone(), source })?;
            Self::from_toml_str(&content)?
        } else {
            debug!(path = %path, "Config file not found, using defaults");
            Self::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Environment variables win over the file:
    /// SUPABASE_URL / SUPABASE_KEY for storage,
    /// THREATLENS_INFERENCE_API_KEY for both capabilities when no key is set.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty("SUPABASE_URL") {
            self.storage.url = Some(url);
        }
        if let Some(key) = non_empty("SUPABASE_KEY") {
            self.storage.api_key = Some(SecretString::from(key));
        }
        if let Some(key) = non_empty("THREATLENS_INFERENCE_API_KEY") {
            if self.recognizer.api_key.is_none() {
                self.recognizer.api_key = Some(SecretString::from(key.clone()));
            }
            if self.classifier.api_key.is_none() {
                self.classifier.api_key = Some(SecretString::from(key));
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.analysis.evidence_concurrency == 0 {
            return Err(ConfigError::Invalid(
                "analysis.evidence_concurrency must be at least 1".to_string(),
            ));
        }
        if self.storage.history_limit == 0 {
            return Err(ConfigError::Invalid(
                "storage.history_limit must be at least 1".to_string(),
            ));
        }
        if self.storage.backend == StorageBackend::Supabase {
            if self.storage.url.is_none() {
                return Err(ConfigError::Invalid(
                    "storage.backend = \"supabase\" requires storage.url or SUPABASE_URL".to_string(),
                ));
            }
            if self.storage.api_key.is_none() {
                return Err(ConfigError::Invalid(
                    "storage.backend = \"supabase\" requires storage.api_key or SUPABASE_KEY".to_string(),
                ));
            }
        }
        Ok(())
    }
}
