use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_point_at_local_service() {
    let settings = resolve_settings(None, env_from(&[])).expect("settings");
    assert_eq!(settings, Settings::default());
    assert_eq!(
        settings.data_service_config().expect("config").endpoint(),
        "http://127.0.0.1:5000"
    );
}

#[test]
fn file_values_override_defaults() {
    let settings = resolve_settings(
        Some("endpoint = \"https://series.example.com/\"\nrequest_timeout_seconds = 5\n"),
        env_from(&[]),
    )
    .expect("settings");

    assert_eq!(settings.endpoint, "https://series.example.com/");
    let config = settings.data_service_config().expect("config");
    assert_eq!(config.endpoint(), "https://series.example.com");
    assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
}

#[test]
fn app_prefixed_env_wins_over_file_and_plain_env() {
    let settings = resolve_settings(
        Some("endpoint = \"http://from-file:5000\""),
        env_from(&[
            ("DATA_SERVICE_URL", "http://from-env:5000"),
            ("APP__ENDPOINT", "http://from-app-env:5000"),
        ]),
    )
    .expect("settings");
    assert_eq!(settings.endpoint, "http://from-app-env:5000");
}

#[test]
fn zero_timeout_disables_request_timeout() {
    let settings = resolve_settings(None, env_from(&[("APP__REQUEST_TIMEOUT_SECONDS", "0")]))
        .expect("settings");
    assert_eq!(
        settings.data_service_config().expect("config").request_timeout(),
        None
    );
}

#[test]
fn malformed_file_is_an_error() {
    assert!(resolve_settings(Some("endpoint = ["), env_from(&[])).is_err());
}

#[test]
fn explicit_missing_config_file_is_an_error() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let missing = env::temp_dir().join(format!("series_browser_missing_{suffix}.toml"));

    let err = load_settings(Some(&missing)).expect_err("missing file");
    assert!(err.to_string().contains("failed to read config file"));
}

#[test]
fn explicit_config_file_is_loaded() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("series_browser_config_{suffix}.toml"));
    fs::write(&path, "request_timeout_seconds = 7\n").expect("write config");

    let settings = load_settings(Some(&path)).expect("settings");
    assert_eq!(settings.request_timeout_seconds, 7);

    fs::remove_file(path).expect("cleanup");
}
