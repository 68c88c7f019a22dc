use super::*;
use secrecy::ExposeSecret;
use std::collections::HashMap;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_empty_file_yields_defaults() {
    let config = Config::from_toml_str("").unwrap();
    assert_eq!(config.recognizer.model, "Davlan/xlm-roberta-base-ner-hrl");
    assert_eq!(config.classifier.model, "joeddav/xlm-roberta-large-xnli");
    assert_eq!(config.storage.backend, StorageBackend::Memory);
    assert_eq!(config.storage.table, "logs");
    assert_eq!(config.storage.history_limit, 5);
    assert_eq!(config.analysis.evidence_concurrency, 1);
    assert!(config.validate().is_ok());
}

#[test]
fn test_sections_override_defaults() {
    let config = Config::from_toml_str(
        r#"
        [classifier]
        base_url = "http://localhost:8080"
        model = "facebook/bart-large-mnli"

        [storage]
        backend = "supabase"
        url = "https://example.supabase.co"
        api_key = "service-key"
        history_limit = 20

        [analysis]
        evidence_concurrency = 4
        "#,
    )
    .unwrap();

    assert_eq!(config.classifier.base_url, "http://localhost:8080");
    assert_eq!(config.classifier.model, "facebook/bart-large-mnli");
    assert_eq!(config.recognizer.base_url, "https://api-inference.huggingface.co");
    assert_eq!(config.storage.backend, StorageBackend::Supabase);
    assert_eq!(config.storage.history_limit, 20);
    assert_eq!(
        config.storage.api_key.as_ref().map(|k| k.expose_secret().to_string()),
        Some("service-key".to_string())
    );
    assert_eq!(config.analysis.evidence_concurrency, 4);
    assert!(config.validate().is_ok());
}

#[test]
fn test_unknown_backend_is_a_parse_error() {
    let err = Config::from_toml_str("[storage]\nbackend = \"mongo\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_supabase_requires_url_and_key() {
    let config = Config::from_toml_str("[storage]\nbackend = \"supabase\"\n").unwrap();
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_env_supplies_supabase_credentials() {
    let mut config = Config::from_toml_str("[storage]\nbackend = \"supabase\"\n").unwrap();
    config.apply_env_overrides(env(&[
        ("SUPABASE_URL", "https://env.supabase.co"),
        ("SUPABASE_KEY", "env-key"),
    ]));
    assert_eq!(config.storage.url.as_deref(), Some("https://env.supabase.co"));
    assert!(config.validate().is_ok());
}

#[test]
fn test_inference_key_does_not_replace_file_key() {
    let mut config = Config::from_toml_str("[recognizer]\napi_key = \"from-file\"\n").unwrap();
    config.apply_env_overrides(env(&[("THREATLENS_INFERENCE_API_KEY", "from-env")]));
    assert_eq!(
        config.recognizer.api_key.as_ref().map(|k| k.expose_secret().to_string()),
        Some("from-file".to_string())
    );
    assert_eq!(
        config.classifier.api_key.as_ref().map(|k| k.expose_secret().to_string()),
        Some("from-env".to_string())
    );
}

#[test]
fn test_zero_concurrency_rejected() {
    let config = Config::from_toml_str("[analysis]\nevidence_concurrency = 0\n").unwrap();
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_empty_secret_treated_as_absent() {
    let config = Config::from_toml_str("[classifier]\napi_key = \"\"\n").unwrap();
    assert!(config.classifier.api_key.is_none());
}
