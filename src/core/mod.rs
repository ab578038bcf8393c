//! Core business logic for IPSGen.
//!
//! # Modules
//!
//! - [`generators`] - one generator per clinical resource kind, plus the patient
//! - [`composer`] - assembles a patient, its records and the Composition into a bundle
//! - [`validation`] - structural validation of bundles and saved documents
//! - [`summary`] - per-bundle and batch summaries
//!
//! # Generation Workflow
//!
//! 1. **Patient**: demographics and national identifier for the locale
//! 2. **Records**: for each kind in generation order, `counts[kind]` records
//!    referencing the patient
//! 3. **Header**: one Composition section per kind with at least one record
//! 4. **Assemble**: Composition, Patient, then the records grouped by kind
//! 5. **Validate**: the bundle's structural invariants are checked before it
//!    is returned
//!
//! # Example
//!
//! ```rust,no_run
//! use ipsgen::adapters::enrichment::build_enricher;
//! use ipsgen::config::load_config_or_default;
//! use ipsgen::core::{BundleComposer, BundleSummary};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config_or_default("ipsgen.toml")?;
//! let locale = config.generation.locale()?;
//! let enricher = build_enricher(&config.llm, locale);
//!
//! let mut composer = BundleComposer::for_locale(locale, config.generation.seed, enricher);
//! let bundle = composer
//!     .generate_bundle(&config.generation.resource_counts()?)
//!     .await?;
//!
//! println!("{}", BundleSummary::from_bundle(&bundle).format_summary());
//! # Ok(())
//! # }
//! ```

pub mod composer;
pub mod generators;
pub mod summary;
pub mod validation;

pub use composer::BundleComposer;
pub use generators::{GenerationOptions, ResourceGenerators};
pub use summary::{BatchSummary, BundleSummary};
pub use validation::{validate_bundle, validate_file, ValidationReport};
