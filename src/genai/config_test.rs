use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn from_vars_applies_defaults() {
    let cfg = GenConfig::from_vars(lookup_from(&[("GEMINI_API_KEY", "secret")])).unwrap();
    assert_eq!(cfg.api_key, "secret");
    assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    assert_eq!(cfg.text_model, DEFAULT_TEXT_MODEL);
    assert_eq!(cfg.suggest_model, DEFAULT_SUGGEST_MODEL);
    assert_eq!(cfg.image_model, DEFAULT_IMAGE_MODEL);
    assert_eq!(
        cfg.timeouts,
        GenTimeouts { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    );
}

#[test]
fn from_vars_parses_overrides() {
    let cfg = GenConfig::from_vars(lookup_from(&[
        ("GEMINI_API_KEY", "k"),
        ("GEMINI_BASE_URL", "https://example.test/v1beta/"),
        ("GEMINI_TEXT_MODEL", "gemini-x"),
        ("GEMINI_SUGGEST_MODEL", "gemini-y"),
        ("GEMINI_IMAGE_MODEL", "imagen-z"),
        ("GENAI_REQUEST_TIMEOUT_SECS", "42"),
        ("GENAI_CONNECT_TIMEOUT_SECS", "7"),
    ]))
    .unwrap();
    assert_eq!(cfg.base_url, "https://example.test/v1beta");
    assert_eq!(cfg.text_model, "gemini-x");
    assert_eq!(cfg.suggest_model, "gemini-y");
    assert_eq!(cfg.image_model, "imagen-z");
    assert_eq!(cfg.timeouts, GenTimeouts { request_secs: 42, connect_secs: 7 });
}

#[test]
fn from_vars_missing_api_key_errors() {
    let err = GenConfig::from_vars(lookup_from(&[])).unwrap_err();
    assert!(matches!(err, GenError::MissingApiKey { ref var } if var == "GEMINI_API_KEY"));
}

#[test]
fn from_vars_bad_timeout_errors() {
    let err = GenConfig::from_vars(lookup_from(&[
        ("GEMINI_API_KEY", "k"),
        ("GENAI_REQUEST_TIMEOUT_SECS", "soon"),
    ]))
    .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("GENAI_REQUEST_TIMEOUT_SECS"));
    assert!(matches!(err, GenError::ConfigParse(_)));
}
