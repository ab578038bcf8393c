//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = crate::config::DEFAULT_CONFIG_FILE)]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing IPSGen configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. For narrative enrichment, create a .env file with:");
                println!("     - AZURE_OPENAI_ENDPOINT");
                println!("     - AZURE_OPENAI_API_KEY");
                println!("     - AZURE_OPENAI_DEPLOYMENT_NAME");
                println!("  3. Generate a bundle: ipsgen generate");
                println!("  4. Validate it: ipsgen validate ips_sample_*.json");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# IPSGen Configuration File
# Synthetic International Patient Summary generator

[application]
log_level = "info"

[generation]
locale = "en_US"  # en_US | en_IE
# seed = 42
output_dir = "."
pretty = true
bundles = 1

[generation.counts]
allergies = 2
medications = 3
conditions = 2
immunizations = 3
procedures = 1
observations = 2

[llm]
enabled = false
api_version = "2024-02-01"

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# IPSGen Configuration File
# Synthetic International Patient Summary generator
#
# Every setting has a default; this file is optional. Any value can be
# overridden with IPSGEN_<SECTION>_<KEY>, e.g. IPSGEN_GENERATION_LOCALE=en_IE.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Generation Settings
# ============================================================================
[generation]
# Locale: en_US (base tables) or en_IE (Irish demographics, PPS numbers,
# Eircodes and additional condition codes)
locale = "en_US"

# Seed for reproducible output; omit for fresh data on every run
# seed = 42

# Instant dates are generated relative to (RFC 3339, quoted); omit for now.
# With a seed this makes runs byte-identical, file names included.
# reference_time = "2024-11-05T14:00:00Z"

# Directory bundle files are written to
output_dir = "."

# Pretty-print JSON
pretty = true

# Bundles per run (files are numbered when more than one)
bundles = 1

# Records per resource kind; 0 omits the kind and its section
[generation.counts]
allergies = 2
medications = 3
conditions = 2
immunizations = 3
procedures = 1
observations = 2

# ============================================================================
# Narrative Enrichment (Azure OpenAI)
# ============================================================================
# Condition records get a one-sentence clinical note instead of the plain
# display text. When endpoint, key or deployment is missing, enrichment is
# silently disabled.
[llm]
enabled = false

# Endpoint of the Azure OpenAI resource (or AZURE_OPENAI_ENDPOINT)
# endpoint = "https://your-resource.openai.azure.com"

# API key (use an environment variable, or set AZURE_OPENAI_API_KEY); an
# unset variable leaves the key empty and enrichment disabled
# api_key = "${AZURE_OPENAI_API_KEY}"

# Deployment name (or AZURE_OPENAI_DEPLOYMENT_NAME)
# deployment = "gpt-4o-mini"

api_version = "2024-02-01"
timeout_seconds = 30
temperature = 0.7
max_tokens = 150

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable JSON file logging in addition to the console
local_enabled = false

# Log directory
local_path = "./logs"

# Log rotation (daily, hourly or never)
local_rotation = "daily"
"#
        .to_string()
    }
}
