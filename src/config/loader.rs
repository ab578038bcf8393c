//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::IpsGenConfig;
use super::secret::secret_string_opt;
use crate::domain::errors::IpsError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "ipsgen.toml";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into IpsGenConfig
/// 4. Applies environment variable overrides
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns a configuration error if the file cannot be read or parsed, a
/// referenced variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use ipsgen::config::load_config;
///
/// let config = load_config("ipsgen.toml").expect("Failed to load config");
/// println!("locale: {}", config.generation.locale);
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<IpsGenConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(IpsError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        IpsError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: IpsGenConfig = toml::from_str(&contents)
        .map_err(|e| IpsError::Configuration(format!("Failed to parse TOML: {e}")))?;

    finish(&mut config)?;
    Ok(config)
}

/// Loads the file when it exists, otherwise defaults plus environment
///
/// The configuration file is optional: every setting has a default and the
/// enrichment credentials usually come from the environment.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<IpsGenConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(path = %path.display(), "No configuration file, using defaults");
    let mut config = IpsGenConfig::default();
    finish(&mut config)?;
    Ok(config)
}

fn finish(config: &mut IpsGenConfig) -> Result<()> {
    apply_env_overrides(config);
    config.validate().map_err(|e| {
        IpsError::Configuration(format!("Configuration validation failed: {e}"))
    })
}

/// Sections whose values may be left unset
///
/// An unset `${VAR}` in these sections becomes an empty value, so a missing
/// enrichment credential disables enrichment instead of failing the load.
const OPTIONAL_SECTIONS: &[&str] = &["llm"];

fn is_optional_section(section: &str) -> bool {
    OPTIONAL_SECTIONS
        .iter()
        .any(|s| section == *s || section.strip_prefix(s).is_some_and(|rest| rest.starts_with('.')))
}

/// Table name of a `[section]` or `[[section]]` header line
fn section_header(line: &str) -> Option<&str> {
    let header = line.trim().strip_prefix('[')?;
    let header = header.trim_start_matches('[');
    header.split(']').next().map(str::trim)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set, except
/// in [`OPTIONAL_SECTIONS`] where it is replaced by an empty string
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| IpsError::Other(format!("invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    let mut section = String::new();

    for line in input.lines() {
        // Placeholders in comments are documentation, not references
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }
        if let Some(header) = section_header(line) {
            section = header.to_string();
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&cap[0], &value);
                }
                Err(_) if is_optional_section(&section) => {
                    tracing::warn!(
                        variable = var_name,
                        section = %section,
                        "Environment variable not set, leaving the value empty"
                    );
                    processed_line = processed_line.replace(&cap[0], "");
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(IpsError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Applies environment variable overrides
///
/// `IPSGEN_<SECTION>_<KEY>` for general settings; the enrichment service
/// also honours the conventional `AZURE_OPENAI_*` variables, with the
/// `IPSGEN_LLM_*` form taking precedence.
fn apply_env_overrides(config: &mut IpsGenConfig) {
    // Application overrides
    if let Some(val) = env_value("IPSGEN_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Generation overrides
    if let Some(val) = env_value("IPSGEN_GENERATION_LOCALE") {
        config.generation.locale = val;
    }
    if let Some(val) = env_value("IPSGEN_GENERATION_SEED") {
        if let Ok(seed) = val.parse() {
            config.generation.seed = Some(seed);
        }
    }
    if let Some(val) = env_value("IPSGEN_GENERATION_OUTPUT_DIR") {
        config.generation.output_dir = val;
    }
    if let Some(val) = env_value("IPSGEN_GENERATION_REFERENCE_TIME") {
        config.generation.reference_time = Some(val);
    }
    if let Some(val) = env_value("IPSGEN_GENERATION_BUNDLES") {
        if let Ok(bundles) = val.parse() {
            config.generation.bundles = bundles;
        }
    }

    // Enrichment overrides
    if let Some(val) = env_value("IPSGEN_LLM_ENABLED") {
        config.llm.enabled = val.parse().unwrap_or(false);
    }
    if let Some(val) = env_value("IPSGEN_LLM_ENDPOINT").or_else(|| env_value("AZURE_OPENAI_ENDPOINT")) {
        config.llm.endpoint = Some(val);
    }
    if let Some(key) = secret_string_opt(
        env_value("IPSGEN_LLM_API_KEY").or_else(|| env_value("AZURE_OPENAI_API_KEY")),
    ) {
        config.llm.api_key = Some(key);
    }
    if let Some(val) =
        env_value("IPSGEN_LLM_DEPLOYMENT").or_else(|| env_value("AZURE_OPENAI_DEPLOYMENT_NAME"))
    {
        config.llm.deployment = Some(val);
    }
    if let Some(val) =
        env_value("IPSGEN_LLM_API_VERSION").or_else(|| env_value("AZURE_OPENAI_API_VERSION"))
    {
        config.llm.api_version = val;
    }
    if let Some(val) = env_value("IPSGEN_LLM_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.llm.timeout_seconds = timeout;
        }
    }

    // Logging overrides
    if let Some(val) = env_value("IPSGEN_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Some(val) = env_value("IPSGEN_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = env_value("IPSGEN_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("IPSGEN_TEST_SUBST_VAR", "test_value");
        let input = "deployment = \"${IPSGEN_TEST_SUBST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "deployment = \"test_value\"");
        std::env::remove_var("IPSGEN_TEST_SUBST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("IPSGEN_TEST_MISSING_VAR");
        let input = "api_key = \"${IPSGEN_TEST_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("IPSGEN_TEST_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_unset_llm_value_is_empty() {
        std::env::remove_var("IPSGEN_TEST_UNSET_LLM_KEY");
        let input = "[generation]\nlocale = \"en_US\"\n\n[llm]\nenabled = true\napi_key = \"${IPSGEN_TEST_UNSET_LLM_KEY}\"";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.ends_with("api_key = \"\""));
    }

    #[test]
    fn test_substitute_unset_value_after_llm_section_is_error() {
        std::env::remove_var("IPSGEN_TEST_UNSET_LOG_PATH");
        let input = "[llm]\nenabled = false\n\n[logging]\nlocal_path = \"${IPSGEN_TEST_UNSET_LOG_PATH}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("IPSGEN_TEST_UNSET_LOG_PATH"));
    }

    #[test]
    fn test_section_header() {
        assert_eq!(section_header("[llm]"), Some("llm"));
        assert_eq!(section_header("  [generation.counts] # counts"), Some("generation.counts"));
        assert_eq!(section_header("api_key = \"[x]\""), None);
        assert!(is_optional_section("llm"));
        assert!(is_optional_section("llm.headers"));
        assert!(!is_optional_section("llmx"));
        assert!(!is_optional_section("logging"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        let input = "# api_key = \"${IPSGEN_TEST_COMMENTED_OUT}\"";
        assert_eq!(substitute_env_vars(input).unwrap(), input);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-ipsgen.toml");
        assert!(result.unwrap_err().is_configuration());
    }

    #[test]
    fn test_load_config_or_default_missing_file() {
        let config = load_config_or_default("nonexistent-ipsgen.toml").unwrap();
        assert_eq!(config.generation.bundles, 1);
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[generation]
locale = "en_IE"
seed = 42
pretty = false

[generation.counts]
conditions = 4
procedures = 0

[llm]
enabled = false
deployment = "gpt-4o-mini"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.generation.locale, "en_IE");
        assert_eq!(config.generation.seed, Some(42));
        assert!(!config.generation.pretty);

        let counts = config.generation.resource_counts().unwrap();
        assert_eq!(counts.conditions, 4);
        assert_eq!(counts.procedures, 0);
        assert_eq!(counts.allergies, 2);
    }

    #[test]
    fn test_load_config_invalid_counts() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[generation.counts]\nallergies = -3\n")
            .unwrap();
        temp_file.flush().unwrap();

        let err = load_config(temp_file.path()).unwrap_err();
        assert!(err.is_configuration());
    }
}
