// IPSGen - Synthetic International Patient Summary Generator
// Copyright (c) 2025 IPSGen Contributors
// Licensed under the MIT License

//! # IPSGen - Synthetic International Patient Summary Generator
//!
//! IPSGen produces synthetic HL7 FHIR R4 document bundles that follow the
//! International Patient Summary (IPS) profile, for testing and demos.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Generating** a patient and coded clinical records (allergies,
//!   medications, conditions, immunizations, procedures, observations)
//! - **Composing** them into a document bundle with a Composition header
//! - **Enriching** condition text with short AI-written clinical notes (optional)
//! - **Validating** generated or saved bundles
//!
//! ## Architecture
//!
//! IPSGen follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (generators, composer, validation, summaries)
//! - [`adapters`] - External integrations (Azure OpenAI, bundle output)
//! - [`domain`] - Core domain types and FHIR resource models
//! - [`terminology`] - Code tables and measurement profiles
//! - [`locale`] - Region descriptors (base and Ireland)
//! - [`facts`] - Seeded random facts (demographics, dates, identifiers)
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ipsgen::adapters::enrichment::NoopEnricher;
//! use ipsgen::core::BundleComposer;
//! use ipsgen::domain::ResourceCounts;
//! use ipsgen::locale::Locale;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut composer = BundleComposer::for_locale(Locale::ireland(), Some(42), Arc::new(NoopEnricher));
//!     let bundle = composer.generate_bundle(&ResourceCounts::default()).await?;
//!
//!     println!("{}", bundle.to_json_pretty()?);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! ### Locales
//!
//! A [`locale::Locale`] carries the demographic data, national identifier
//! scheme and code-table additions for a region. The Irish locale adds PPS
//! numbers, Eircodes, Irish counties and four extra condition codes.
//!
//! ### Reproducible Output
//!
//! Every random draw goes through one seeded generator, and dates are
//! relative to a fixed reference instant:
//!
//! ```rust
//! use ipsgen::adapters::enrichment::NoopEnricher;
//! use ipsgen::core::BundleComposer;
//! use ipsgen::domain::ResourceCounts;
//! use ipsgen::facts::FactProvider;
//! use ipsgen::locale::Locale;
//! use std::sync::Arc;
//!
//! # async fn example() -> ipsgen::domain::Result<()> {
//! let facts = FactProvider::seeded(Locale::base(), 7);
//! let now = facts.now();
//! let mut a = BundleComposer::new(facts, Arc::new(NoopEnricher));
//! let mut b = BundleComposer::new(
//!     FactProvider::seeded(Locale::base(), 7).with_reference_time(now),
//!     Arc::new(NoopEnricher),
//! );
//!
//! let counts = ResourceCounts::default();
//! assert_eq!(a.generate_bundle(&counts).await?, b.generate_bundle(&counts).await?);
//! # Ok(())
//! # }
//! ```
//!
//! ### Narrative Enrichment
//!
//! With `[llm] enabled = true` and an Azure OpenAI endpoint, key and
//! deployment, each Condition's `code.text` becomes a one-sentence note.
//! Any failure falls back to the display text; enrichment never fails a
//! bundle.
//!
//! ## Error Handling
//!
//! IPSGen uses the [`domain::IpsError`] type for all errors:
//!
//! ```rust,no_run
//! use ipsgen::domain::IpsError;
//!
//! fn example() -> Result<(), IpsError> {
//!     let config = ipsgen::config::load_config("ipsgen.toml")?;
//!     let _locale = config.generation.locale()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! IPSGen uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(locale = "en_IE", "Starting bundle generation");
//! warn!(service = "azure-openai", "Narrative enrichment failed, using display text");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod facts;
pub mod locale;
pub mod logging;
pub mod terminology;
