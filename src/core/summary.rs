//! Bundle summary and reporting

use crate::core::validation::resource_type_counts;
use crate::domain::Bundle;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// What a generated bundle contains
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BundleSummary {
    /// Bundle id
    pub bundle_id: String,

    /// Bundle timestamp
    pub timestamp: DateTime<Utc>,

    /// Total number of entries, header and patient included
    pub total_entries: usize,

    /// Entries per `resourceType`
    pub resources: BTreeMap<String, usize>,

    /// Composition section titles in document order
    pub sections: Vec<String>,

    /// Where the bundle was written, if it was
    pub output: Option<PathBuf>,
}

impl BundleSummary {
    /// Summarises a bundle
    pub fn from_bundle(bundle: &Bundle) -> Self {
        Self {
            bundle_id: bundle.id.to_string(),
            timestamp: bundle.timestamp,
            total_entries: bundle.entry.len(),
            resources: resource_type_counts(bundle),
            sections: bundle
                .composition()
                .map(|c| c.section.iter().map(|s| s.title.clone()).collect())
                .unwrap_or_default(),
            output: None,
        }
    }

    /// Records where the bundle was written
    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            bundle_id = %self.bundle_id,
            total_entries = self.total_entries,
            sections = self.sections.len(),
            output = self.output.as_ref().map(|p| p.display().to_string()).unwrap_or_default(),
            "Bundle summary"
        );
    }

    /// Format the summary as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut summary = String::new();
        if let Some(output) = &self.output {
            summary.push_str(&format!("✅ IPS bundle written to {}\n", output.display()));
        }
        summary.push_str(&format!("  Bundle ID: {}\n", self.bundle_id));
        summary.push_str(&format!("  Timestamp: {}\n", self.timestamp.to_rfc3339()));
        summary.push_str(&format!("  Total entries: {}\n", self.total_entries));
        summary.push_str("  Resources:\n");
        for (resource_type, count) in &self.resources {
            summary.push_str(&format!("    • {resource_type}: {count}\n"));
        }
        if !self.sections.is_empty() {
            summary.push_str("  Sections:\n");
            for title in &self.sections {
                summary.push_str(&format!("    • {title}\n"));
            }
        }
        summary
    }
}

/// Totals across a batch of bundles
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub bundles: Vec<BundleSummary>,
}

impl BatchSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, summary: BundleSummary) {
        self.bundles.push(summary);
    }

    /// Entries across every bundle
    pub fn total_entries(&self) -> usize {
        self.bundles.iter().map(|b| b.total_entries).sum()
    }

    /// Log the batch totals
    pub fn log_summary(&self) {
        tracing::info!(
            bundles = self.bundles.len(),
            total_entries = self.total_entries(),
            "Generation completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::enrichment::NoopEnricher;
    use crate::core::BundleComposer;
    use crate::domain::{ResourceCounts, ResourceKind};
    use crate::locale::Locale;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_summary_counts() {
        let counts = ResourceCounts::none()
            .with(ResourceKind::Condition, 2)
            .with(ResourceKind::Immunization, 1);
        let bundle = BundleComposer::for_locale(Locale::base(), Some(3), Arc::new(NoopEnricher))
            .generate_bundle(&counts)
            .await
            .unwrap();

        let summary = BundleSummary::from_bundle(&bundle);
        assert_eq!(summary.total_entries, 5);
        assert_eq!(summary.resources.get("Condition"), Some(&2));
        assert_eq!(summary.resources.get("Immunization"), Some(&1));
        assert_eq!(summary.sections, vec!["Problem List", "History of Immunizations"]);

        let text = summary
            .with_output(Some(PathBuf::from("out/ips_sample.json")))
            .format_summary();
        assert!(text.contains("out/ips_sample.json"));
        assert!(text.contains("Total entries: 5"));
    }

    #[test]
    fn test_batch_totals() {
        let mut batch = BatchSummary::new();
        for entries in [4, 7] {
            batch.add(BundleSummary {
                bundle_id: "b".to_string(),
                timestamp: Utc::now(),
                total_entries: entries,
                resources: BTreeMap::new(),
                sections: Vec::new(),
                output: None,
            });
        }
        assert_eq!(batch.total_entries(), 11);
    }
}
