//! Configuration management for IPSGen.
//!
//! TOML configuration with environment variable substitution, environment
//! overrides and validation. The file is optional; every setting has a
//! default.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ipsgen::config::load_config_or_default;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config_or_default("ipsgen.toml")?;
//!
//! println!("Locale: {}", config.generation.locale);
//! println!("Enrichment requested: {}", config.llm.enabled);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level
//! - [`GenerationConfig`] - locale, seed, output directory, bundle and resource counts
//! - [`LlmConfig`] - Azure OpenAI narrative enrichment
//! - [`LoggingConfig`] - JSON file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [generation]
//! locale = "en_IE"
//! seed = 42
//! output_dir = "./bundles"
//!
//! [generation.counts]
//! conditions = 3
//! procedures = 0
//!
//! [llm]
//! enabled = true
//! endpoint = "https://my-resource.openai.azure.com"
//! api_key = "${AZURE_OPENAI_API_KEY}"
//! deployment = "gpt-4o-mini"
//! ```
//!
//! # Environment Variables
//!
//! `IPSGEN_<SECTION>_<KEY>` overrides any file value. The enrichment
//! settings also read `AZURE_OPENAI_ENDPOINT`, `AZURE_OPENAI_API_KEY`,
//! `AZURE_OPENAI_DEPLOYMENT_NAME` and `AZURE_OPENAI_API_VERSION`.

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, load_config_or_default, DEFAULT_CONFIG_FILE};
pub use schema::{ApplicationConfig, GenerationConfig, IpsGenConfig, LlmConfig, LoggingConfig};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
