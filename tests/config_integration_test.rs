//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables should be run with --test-threads=1
//! to avoid interference between tests.

use ipsgen::adapters::enrichment::build_enricher;
use ipsgen::config::{load_config, load_config_or_default};
use ipsgen::domain::{ResourceCounts, ResourceKind};
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    for var in [
        "IPSGEN_APPLICATION_LOG_LEVEL",
        "IPSGEN_GENERATION_LOCALE",
        "IPSGEN_GENERATION_SEED",
        "IPSGEN_GENERATION_OUTPUT_DIR",
        "IPSGEN_GENERATION_BUNDLES",
        "IPSGEN_GENERATION_REFERENCE_TIME",
        "IPSGEN_LLM_ENABLED",
        "IPSGEN_LLM_ENDPOINT",
        "IPSGEN_LLM_API_KEY",
        "IPSGEN_LLM_DEPLOYMENT",
        "AZURE_OPENAI_ENDPOINT",
        "AZURE_OPENAI_API_KEY",
        "AZURE_OPENAI_DEPLOYMENT_NAME",
        "AZURE_OPENAI_API_VERSION",
        "TEST_IPSGEN_API_KEY",
        "TEST_IPSGEN_LOG_DIR",
    ] {
        std::env::remove_var(var);
    }
}

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    let toml_content = r#"
[application]
log_level = "debug"

[generation]
locale = "en_IE"
seed = 42
output_dir = "/tmp/ips"
pretty = false
bundles = 3

[generation.counts]
conditions = 4
procedures = 0

[llm]
enabled = true
endpoint = "https://example.openai.azure.com"
api_key = "test-key-12345"
deployment = "gpt-4o-mini"
api_version = "2024-06-01"
timeout_seconds = 10
temperature = 0.2
max_tokens = 80

[logging]
local_enabled = true
local_path = "/tmp/ipsgen-logs"
local_rotation = "hourly"
"#;

    let temp_file = write_config(toml_content);
    let config = load_config(temp_file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.generation.locale().unwrap().code, "en_IE");
    assert_eq!(config.generation.seed, Some(42));
    assert_eq!(config.generation.output_dir, "/tmp/ips");
    assert!(!config.generation.pretty);
    assert_eq!(config.generation.bundles, 3);

    let counts = config.generation.resource_counts().unwrap();
    assert_eq!(
        counts,
        ResourceCounts::default()
            .with(ResourceKind::Condition, 4)
            .with(ResourceKind::Procedure, 0)
    );

    assert!(config.llm.enabled);
    assert!(config.llm.is_complete());
    assert_eq!(
        config.llm.api_key.as_ref().unwrap().expose_secret().as_ref(),
        "test-key-12345"
    );
    assert_eq!(config.llm.api_version, "2024-06-01");
    assert_eq!(config.llm.max_tokens, 80);

    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_load_minimal_config_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config("[generation]\nlocale = \"en_US\"\n");
    let config = load_config(temp_file.path()).unwrap();

    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.generation.seed, None);
    assert_eq!(config.generation.bundles, 1);
    assert!(config.generation.pretty);
    assert_eq!(
        config.generation.resource_counts().unwrap(),
        ResourceCounts::default()
    );
    assert!(!config.llm.enabled);
    assert_eq!(config.llm.api_version, "2024-02-01");
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_missing_file_is_error_but_default_loader_is_not() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let err = load_config("does/not/exist/ipsgen.toml").unwrap_err();
    assert!(err.is_configuration());

    let config = load_config_or_default("does/not/exist/ipsgen.toml").unwrap();
    assert_eq!(config.generation.locale, "en_US");
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_IPSGEN_API_KEY", "substituted-key");

    let temp_file = write_config(
        r#"
[llm]
enabled = true
endpoint = "https://example.openai.azure.com"
api_key = "${TEST_IPSGEN_API_KEY}"
deployment = "notes"
"#,
    );
    let config = load_config(temp_file.path()).unwrap();
    assert_eq!(
        config.llm.api_key.as_ref().unwrap().expose_secret().as_ref(),
        "substituted-key"
    );

    cleanup_env_vars();
}

#[test]
fn test_missing_substitution_variable_is_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[logging]
# local_path = "${COMMENTED_OUT_IS_FINE}"
local_path = "${TEST_IPSGEN_LOG_DIR}"
"#,
    );
    let err = load_config(temp_file.path()).unwrap_err();
    assert!(err.is_configuration());
    let message = err.to_string();
    assert!(message.contains("TEST_IPSGEN_LOG_DIR"));
    assert!(!message.contains("COMMENTED_OUT_IS_FINE"));
}

#[test]
fn test_unset_credential_variable_disables_enrichment() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[generation]
locale = "en_IE"

[llm]
enabled = true
endpoint = "https://example.openai.azure.com"
api_key = "${TEST_IPSGEN_API_KEY}"
deployment = "notes"
"#,
    );
    let config = load_config_or_default(temp_file.path()).unwrap();

    assert!(config.llm.enabled);
    assert!(!config.llm.is_complete());
    assert_eq!(config.llm.missing_values(), vec!["api_key"]);

    let enricher = build_enricher(&config.llm, config.generation.locale().unwrap());
    assert!(!enricher.is_enabled());
}

#[test]
fn test_env_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("IPSGEN_APPLICATION_LOG_LEVEL", "warn");
    std::env::set_var("IPSGEN_GENERATION_LOCALE", "en_IE");
    std::env::set_var("IPSGEN_GENERATION_SEED", "7");
    std::env::set_var("IPSGEN_GENERATION_BUNDLES", "4");
    std::env::set_var("IPSGEN_GENERATION_REFERENCE_TIME", "2024-11-05T14:00:00Z");

    let temp_file = write_config("[generation]\nlocale = \"en_US\"\nbundles = 1\n");
    let config = load_config(temp_file.path()).unwrap();

    assert_eq!(config.application.log_level, "warn");
    assert_eq!(config.generation.locale, "en_IE");
    assert_eq!(config.generation.seed, Some(7));
    assert_eq!(config.generation.bundles, 4);
    assert_eq!(
        config.generation.reference_time().unwrap().unwrap().to_rfc3339(),
        "2024-11-05T14:00:00+00:00"
    );

    cleanup_env_vars();
}

#[test]
fn test_azure_variables_complete_enrichment() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("AZURE_OPENAI_ENDPOINT", "https://from-env.openai.azure.com");
    std::env::set_var("AZURE_OPENAI_API_KEY", "env-key");
    std::env::set_var("AZURE_OPENAI_DEPLOYMENT_NAME", "env-deployment");
    std::env::set_var("IPSGEN_LLM_DEPLOYMENT", "preferred-deployment");

    let temp_file = write_config("[llm]\nenabled = true\n");
    let config = load_config(temp_file.path()).unwrap();

    assert!(config.llm.is_complete());
    assert_eq!(
        config.llm.endpoint.as_deref(),
        Some("https://from-env.openai.azure.com")
    );
    assert_eq!(config.llm.deployment.as_deref(), Some("preferred-deployment"));

    cleanup_env_vars();
}

#[test]
fn test_validation_errors() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let cases = [
        "[application]\nlog_level = \"verbose\"\n",
        "[generation]\nlocale = \"fr_FR\"\n",
        "[generation]\nbundles = 0\n",
        "[generation.counts]\nconditions = -1\n",
        "[generation.counts]\nvitals = 2\n",
        "[generation.counts]\nallergies = 10001\n",
        "[generation]\nreference_time = \"2024-13-01\"\n",
        "[llm]\nendpoint = \"not a url\"\n",
        "[llm]\ntemperature = 3.5\n",
        "[logging]\nlocal_rotation = \"weekly\"\n",
    ];

    for content in cases {
        let temp_file = write_config(content);
        let err = load_config(temp_file.path()).unwrap_err();
        assert!(err.is_configuration(), "{content}");
    }
}

#[test]
fn test_invalid_toml_is_configuration_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config("[generation\nlocale = ");
    let err = load_config(temp_file.path()).unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("Failed to parse TOML"));
}
