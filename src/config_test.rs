use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn from_lookup_defaults_when_unset() {
    let cfg = SessionConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(cfg, SessionConfig::default());
    assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(cfg.login_path, "/login");
    assert_eq!(cfg.timeouts.request(), Duration::from_secs(30));
    assert_eq!(cfg.timeouts.connect(), Duration::from_secs(10));
}

#[test]
fn from_lookup_parses_overrides() {
    let cfg = SessionConfig::from_lookup(lookup_from(&[
        ("QUIZ_API_BASE_URL", "https://quiz.example.test/api/"),
        ("QUIZ_SESSION_DIR", "/tmp/quiz"),
        ("QUIZ_LOGIN_PATH", "/auth/login"),
        ("QUIZ_REQUEST_TIMEOUT_SECS", "42"),
        ("QUIZ_CONNECT_TIMEOUT_SECS", "7"),
    ]))
    .unwrap();
    assert_eq!(cfg.api_base_url, "https://quiz.example.test/api");
    assert_eq!(cfg.session_dir, PathBuf::from("/tmp/quiz"));
    assert_eq!(cfg.login_path, "/auth/login");
    assert_eq!(cfg.timeouts, Timeouts { request_secs: 42, connect_secs: 7 });
}

#[test]
fn from_lookup_bad_timeout_falls_back_to_default() {
    let cfg = SessionConfig::from_lookup(lookup_from(&[("QUIZ_REQUEST_TIMEOUT_SECS", "soon")])).unwrap();
    assert_eq!(cfg.timeouts.request_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
}

#[test]
fn from_lookup_relative_login_path_errors() {
    let err = SessionConfig::from_lookup(lookup_from(&[("QUIZ_LOGIN_PATH", "login")])).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidLoginPath(ref p) if p == "login"));
    assert_eq!(err.error_code(), "E_CONFIG_LOGIN_PATH");
}

#[test]
fn normalize_base_url_trims_whitespace_and_slashes() {
    assert_eq!(normalize_base_url("  http://h/api//  "), "http://h/api");
    assert_eq!(normalize_base_url("http://h"), "http://h");
}
