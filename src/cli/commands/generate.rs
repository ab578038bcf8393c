//! Generate command implementation
//!
//! This module implements the `generate` command: compose one or more IPS
//! bundles and write each to a timestamped file (or stdout).

use crate::adapters::enrichment::build_enricher;
use crate::adapters::output::{BundleSink, FileSink, WriterSink};
use crate::cli::{exit_code, EXIT_CONFIGURATION};
use crate::config::{load_config_or_default, IpsGenConfig};
use crate::core::{BatchSummary, BundleComposer, BundleSummary};
use crate::domain::{ResourceCounts, ResourceKind};
use crate::facts::FactProvider;
use clap::Args;

/// Arguments for the generate command
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Locale code (en_US, en_IE)
    #[arg(long)]
    pub locale: Option<String>,

    /// Shortcut for --locale en_IE
    #[arg(long, conflicts_with = "locale")]
    pub irish: bool,

    /// Enable narrative enrichment (needs endpoint, key and deployment)
    #[arg(long)]
    pub llm: bool,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// RFC 3339 instant dates are generated relative to (default: now)
    #[arg(long, value_name = "RFC3339")]
    pub reference_time: Option<String>,

    /// Number of bundles to generate
    #[arg(short, long)]
    pub bundles: Option<usize>,

    /// Directory bundle files are written to
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Write bundles to stdout instead of files
    #[arg(long)]
    pub stdout: bool,

    /// Write compact JSON
    #[arg(long)]
    pub compact: bool,

    /// Number of AllergyIntolerance records
    #[arg(long)]
    pub allergies: Option<usize>,

    /// Number of MedicationStatement records
    #[arg(long)]
    pub medications: Option<usize>,

    /// Number of Condition records
    #[arg(long)]
    pub conditions: Option<usize>,

    /// Number of Immunization records
    #[arg(long)]
    pub immunizations: Option<usize>,

    /// Number of Procedure records
    #[arg(long)]
    pub procedures: Option<usize>,

    /// Number of Observation records
    #[arg(long)]
    pub observations: Option<usize>,
}

impl GenerateArgs {
    /// Applies CLI overrides to the loaded configuration
    pub fn apply_overrides(&self, config: &mut IpsGenConfig) {
        if self.irish {
            config.generation.locale = "en_IE".to_string();
        } else if let Some(locale) = &self.locale {
            config.generation.locale = locale.clone();
        }
        if self.llm {
            config.llm.enabled = true;
        }
        if let Some(seed) = self.seed {
            config.generation.seed = Some(seed);
        }
        if let Some(time) = &self.reference_time {
            config.generation.reference_time = Some(time.clone());
        }
        if let Some(bundles) = self.bundles {
            config.generation.bundles = bundles;
        }
        if let Some(dir) = &self.output_dir {
            config.generation.output_dir = dir.clone();
        }
        if self.compact {
            config.generation.pretty = false;
        }
    }

    /// Per-kind counts given on the command line
    pub fn count_overrides(&self) -> [(ResourceKind, Option<usize>); 6] {
        [
            (ResourceKind::Allergy, self.allergies),
            (ResourceKind::Medication, self.medications),
            (ResourceKind::Condition, self.conditions),
            (ResourceKind::Immunization, self.immunizations),
            (ResourceKind::Procedure, self.procedures),
            (ResourceKind::Observation, self.observations),
        ]
    }

    /// Counts from configuration with CLI overrides on top
    pub fn resolve_counts(&self, base: ResourceCounts) -> ResourceCounts {
        self.count_overrides()
            .into_iter()
            .fold(base, |counts, (kind, count)| match count {
                Some(count) => counts.with(kind, count),
                None => counts,
            })
    }

    /// Execute the generate command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting generate command");

        let mut config = match load_config_or_default(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("❌ {e}");
                return Ok(exit_code(&e));
            }
        };

        self.apply_overrides(&mut config);
        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("❌ Configuration validation failed: {e}");
            return Ok(EXIT_CONFIGURATION);
        }

        let resolved = config.generation.locale().and_then(|locale| {
            let counts = self.resolve_counts(config.generation.resource_counts()?);
            counts.validate()?;
            Ok((locale, counts, config.generation.reference_time()?))
        });
        let (locale, counts, reference_time) = match resolved {
            Ok(resolved) => resolved,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(exit_code(&e));
            }
        };

        let enricher = build_enricher(&config.llm, locale);
        if config.llm.enabled && !enricher.is_enabled() {
            eprintln!("⚠️  Narrative enrichment requested but not configured, using display text");
        }

        let generation = &config.generation;
        let mut facts = FactProvider::new(locale, generation.seed);
        if let Some(time) = reference_time {
            facts = facts.with_reference_time(time);
        }
        let mut composer = BundleComposer::new(facts, enricher);
        let mut sink: Box<dyn BundleSink> = if self.stdout {
            Box::new(WriterSink::new(std::io::stdout(), generation.pretty))
        } else {
            Box::new(
                FileSink::new(&generation.output_dir, generation.pretty)
                    .numbered(generation.bundles > 1),
            )
        };

        let mut batch = BatchSummary::new();
        for index in 0..generation.bundles {
            tracing::debug!(index = index + 1, total = generation.bundles, "Generating bundle");

            let bundle = match composer.generate_bundle(&counts).await {
                Ok(bundle) => bundle,
                Err(e) => {
                    crate::log_error_with_context!(e, "bundle generation");
                    eprintln!("❌ Bundle generation failed: {e}");
                    return Ok(exit_code(&e));
                }
            };

            let output = match sink.write(&bundle) {
                Ok(output) => output,
                Err(e) => {
                    crate::log_error_with_context!(e, "writing bundle");
                    eprintln!("❌ Failed to write bundle: {e}");
                    return Ok(exit_code(&e));
                }
            };

            let summary = BundleSummary::from_bundle(&bundle).with_output(output);
            summary.log_summary();
            // Keep stdout for the documents themselves
            if self.stdout {
                eprint!("{}", summary.format_summary());
            } else {
                println!("{}", summary.format_summary());
            }
            batch.add(summary);
        }

        batch.log_summary();
        Ok(0)
    }
}
