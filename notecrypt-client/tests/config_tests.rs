use notecrypt_client::{ClientConfig, ClientError, UnlockContention};
use serial_test::serial;

const ENV_VARS: [&str; 5] = [
    "NOTECRYPT_API_BASE_URL",
    "NOTECRYPT_COOKIE_NAME",
    "NOTECRYPT_TIMEOUT_SECS",
    "NOTECRYPT_KDF_ITERATIONS",
    "NOTECRYPT_UNLOCK_CONTENTION",
];

fn clear_env() {
    for var in ENV_VARS {
        // SAFETY: env-touching tests are serialized with #[serial].
        unsafe { std::env::remove_var(var) };
    }
}

fn set_env(key: &str, value: &str) {
    // SAFETY: env-touching tests are serialized with #[serial].
    unsafe { std::env::set_var(key, value) };
}

#[test]
fn default_api_base_url() {
    let config = ClientConfig::default();
    assert_eq!(config.api_base_url, "http://127.0.0.1:8000/notes/api");
}

#[test]
fn default_cookie_name() {
    assert_eq!(ClientConfig::default().session_cookie_name, "notes_key");
}

#[test]
fn default_timeout() {
    assert_eq!(ClientConfig::default().request_timeout_secs, 30);
}

#[test]
fn default_kdf_iterations() {
    let config = ClientConfig::default();
    assert_eq!(config.kdf_iterations, 200_000);
    assert_eq!(config.kdf_params().iterations, 200_000);
}

#[test]
fn default_contention_waits() {
    assert_eq!(ClientConfig::default().unlock_contention, UnlockContention::Wait);
}

#[test]
fn default_is_valid() {
    assert!(ClientConfig::default().validate().is_ok());
}

#[test]
fn serialization_roundtrip() {
    let config = ClientConfig {
        unlock_contention: UnlockContention::Reject,
        kdf_iterations: 5_000,
        ..ClientConfig::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"reject\""));

    let deserialized: ClientConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized.api_base_url, config.api_base_url);
    assert_eq!(deserialized.session_cookie_name, config.session_cookie_name);
    assert_eq!(deserialized.request_timeout_secs, config.request_timeout_secs);
    assert_eq!(deserialized.kdf_iterations, 5_000);
    assert_eq!(deserialized.unlock_contention, UnlockContention::Reject);
}

#[test]
fn validate_rejects_blank_url() {
    let config = ClientConfig {
        api_base_url: String::new(),
        ..ClientConfig::default()
    };
    assert!(matches!(config.validate(), Err(ClientError::Config(_))));
}

#[test]
fn validate_rejects_blank_cookie_name() {
    let config = ClientConfig {
        session_cookie_name: " ".into(),
        ..ClientConfig::default()
    };
    assert!(matches!(config.validate(), Err(ClientError::Config(_))));
}

#[test]
fn validate_rejects_zero_iterations() {
    let config = ClientConfig {
        kdf_iterations: 0,
        ..ClientConfig::default()
    };
    assert!(matches!(config.validate(), Err(ClientError::Config(_))));
}

#[test]
fn contention_parses_case_insensitively() {
    assert_eq!("wait".parse::<UnlockContention>().unwrap(), UnlockContention::Wait);
    assert_eq!(" Reject ".parse::<UnlockContention>().unwrap(), UnlockContention::Reject);
    assert!(matches!(
        "queue".parse::<UnlockContention>(),
        Err(ClientError::Config(_))
    ));
}

#[test]
#[serial]
fn from_env_without_vars_is_default() {
    clear_env();
    let config = ClientConfig::from_env().unwrap();
    let default = ClientConfig::default();
    assert_eq!(config.api_base_url, default.api_base_url);
    assert_eq!(config.kdf_iterations, default.kdf_iterations);
    assert_eq!(config.unlock_contention, default.unlock_contention);
}

#[test]
#[serial]
fn from_env_overrides_every_field() {
    clear_env();
    set_env("NOTECRYPT_API_BASE_URL", "https://notes.example.org/api/");
    set_env("NOTECRYPT_COOKIE_NAME", "sid");
    set_env("NOTECRYPT_TIMEOUT_SECS", "5");
    set_env("NOTECRYPT_KDF_ITERATIONS", "300000");
    set_env("NOTECRYPT_UNLOCK_CONTENTION", "reject");

    let config = ClientConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.api_base_url, "https://notes.example.org/api/");
    assert_eq!(config.session_cookie_name, "sid");
    assert_eq!(config.request_timeout_secs, 5);
    assert_eq!(config.kdf_iterations, 300_000);
    assert_eq!(config.unlock_contention, UnlockContention::Reject);
}

#[test]
#[serial]
fn from_env_rejects_non_numeric_iterations() {
    clear_env();
    set_env("NOTECRYPT_KDF_ITERATIONS", "lots");
    let result = ClientConfig::from_env();
    clear_env();

    match result {
        Err(ClientError::Config(msg)) => assert!(msg.contains("NOTECRYPT_KDF_ITERATIONS")),
        other => panic!("expected Config error, got {other:?}"),
    }
}

#[test]
#[serial]
fn from_env_rejects_zero_iterations() {
    clear_env();
    set_env("NOTECRYPT_KDF_ITERATIONS", "0");
    let result = ClientConfig::from_env();
    clear_env();

    assert!(matches!(result, Err(ClientError::Config(_))));
}

#[test]
#[serial]
fn from_env_rejects_unknown_contention() {
    clear_env();
    set_env("NOTECRYPT_UNLOCK_CONTENTION", "sometimes");
    let result = ClientConfig::from_env();
    clear_env();

    assert!(matches!(result, Err(ClientError::Config(_))));
}
