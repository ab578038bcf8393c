//! External system integrations for IPSGen.
//!
//! - [`enrichment`] - narrative enrichment (Azure OpenAI chat completions)
//! - [`output`] - where generated bundles are written
//!
//! # Design Pattern
//!
//! Adapters sit behind traits so the core never depends on a concrete
//! service. Generators hold an `Arc<dyn NarrativeEnricher>`; when enrichment
//! is disabled or misconfigured that is a [`enrichment::NoopEnricher`], so
//! the disabled and failing paths look the same to callers.
//!
//! ```rust
//! use ipsgen::adapters::output::{BundleSink, FileSink};
//!
//! let sink = FileSink::new("./bundles", true).numbered(true);
//! ```

pub mod enrichment;
pub mod output;
