//! Narrative enrichment
//!
//! Generators ask a [`NarrativeEnricher`] for a short clinical note and fall
//! back to the concept's display text when it returns `None`. A disabled
//! enricher and a failing one look the same to the caller: both return
//! `None`, and neither ever returns an error.
//!
//! ```rust
//! use ipsgen::adapters::enrichment::{build_enricher, NarrativeEnricher};
//! use ipsgen::config::LlmConfig;
//! use ipsgen::locale::Locale;
//!
//! # async fn example() {
//! // Requested but no endpoint/key/deployment: silently disabled
//! let config = LlmConfig { enabled: true, ..Default::default() };
//! let enricher = build_enricher(&config, Locale::base());
//! assert!(!enricher.is_enabled());
//! assert_eq!(enricher.enrich("Generate a note").await, None);
//! # }
//! ```

mod azure_openai;

pub use azure_openai::AzureOpenAiEnricher;

use crate::config::LlmConfig;
use crate::domain::EnrichmentError;
use crate::locale::Locale;
use async_trait::async_trait;
use std::sync::Arc;

/// Source of free-text clinical narratives
#[async_trait]
pub trait NarrativeEnricher: Send + Sync {
    /// Short name used in log events
    fn name(&self) -> &'static str;

    /// Whether this enricher calls out to a service at all
    fn is_enabled(&self) -> bool;

    /// One request to the service, at most once per call
    async fn request(&self, prompt: &str) -> Result<String, EnrichmentError>;

    /// Narrative text, or `None` on any failure
    ///
    /// Failures are logged here and never propagate.
    async fn enrich(&self, prompt: &str) -> Option<String> {
        match self.request(prompt).await {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    crate::log_enrichment_fallback!(self.name(), "empty narrative");
                    None
                } else {
                    Some(text.to_string())
                }
            }
            Err(e) => {
                crate::log_enrichment_fallback!(self.name(), e);
                None
            }
        }
    }
}

/// Enricher that never produces a narrative
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEnricher;

#[async_trait]
impl NarrativeEnricher for NoopEnricher {
    fn name(&self) -> &'static str {
        "disabled"
    }

    fn is_enabled(&self) -> bool {
        false
    }

    async fn request(&self, _prompt: &str) -> Result<String, EnrichmentError> {
        Err(EnrichmentError::NotConfigured(
            "narrative enrichment is disabled".to_string(),
        ))
    }

    async fn enrich(&self, _prompt: &str) -> Option<String> {
        None
    }
}

/// Builds the enricher for a run
///
/// Returns [`NoopEnricher`] unless enrichment is enabled and endpoint,
/// credential and deployment are all present. Construction failures are
/// logged and also degrade to [`NoopEnricher`].
pub fn build_enricher(config: &LlmConfig, locale: &Locale) -> Arc<dyn NarrativeEnricher> {
    if !config.enabled {
        tracing::debug!("Narrative enrichment disabled");
        return Arc::new(NoopEnricher);
    }

    let missing = config.missing_values();
    if !missing.is_empty() {
        tracing::warn!(
            missing = %missing.join(", "),
            "Narrative enrichment requested but not configured, continuing without it"
        );
        return Arc::new(NoopEnricher);
    }

    match AzureOpenAiEnricher::new(config, locale) {
        Ok(enricher) => {
            tracing::info!(
                deployment = enricher.deployment(),
                "Narrative enrichment enabled"
            );
            Arc::new(enricher)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Could not create enrichment client, continuing without it");
            Arc::new(NoopEnricher)
        }
    }
}
