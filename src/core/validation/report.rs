//! Validation report structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Facts collected about a document while validating it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub bundle_id: Option<String>,
    pub bundle_type: Option<String>,
    pub timestamp: Option<String>,
    pub entry_count: Option<usize>,
    /// Entries per `resourceType`
    pub resources: BTreeMap<String, usize>,
    /// Composition section titles, in document order
    pub sections: Vec<String>,
    pub ips_profile: bool,
}

/// Result of validating one bundle file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub file: PathBuf,
    pub validated_at: DateTime<Utc>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub info: DocumentInfo,
}

impl ValidationReport {
    /// Empty report for `file`
    pub fn new(file: impl AsRef<Path>) -> Self {
        Self {
            file: file.as_ref().to_path_buf(),
            validated_at: Utc::now(),
            errors: Vec::new(),
            warnings: Vec::new(),
            info: DocumentInfo::default(),
        }
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Valid when no errors were recorded; warnings do not count
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Format the report as a human-readable string
    pub fn format_summary(&self) -> String {
        let rule = "=".repeat(70);
        let mut summary = String::new();
        summary.push_str(&format!("{rule}\n"));
        summary.push_str(&format!("IPS Validation Results: {}\n", self.file.display()));
        summary.push_str(&format!("{rule}\n"));

        if self.is_valid() {
            summary.push_str("\n✅ VALID - bundle is a well-formed IPS document\n");
        } else {
            summary.push_str("\n❌ INVALID - bundle has validation errors\n");
        }

        if !self.errors.is_empty() {
            summary.push_str("\n❌ Errors:\n");
            for error in &self.errors {
                summary.push_str(&format!("   - {error}\n"));
            }
        }

        if !self.warnings.is_empty() {
            summary.push_str("\n⚠️  Warnings:\n");
            for warning in &self.warnings {
                summary.push_str(&format!("   - {warning}\n"));
            }
        }

        let info = &self.info;
        if info.bundle_id.is_some() || info.entry_count.is_some() {
            summary.push_str("\nℹ️  Information:\n");
            if let Some(id) = &info.bundle_id {
                summary.push_str(&format!("   - bundle_id: {id}\n"));
            }
            if let Some(bundle_type) = &info.bundle_type {
                summary.push_str(&format!("   - bundle_type: {bundle_type}\n"));
            }
            if let Some(timestamp) = &info.timestamp {
                summary.push_str(&format!("   - timestamp: {timestamp}\n"));
            }
            if let Some(count) = info.entry_count {
                summary.push_str(&format!("   - entry_count: {count}\n"));
            }
            if !info.resources.is_empty() {
                summary.push_str("   - Resource counts:\n");
                for (resource_type, count) in &info.resources {
                    summary.push_str(&format!("     • {resource_type}: {count}\n"));
                }
            }
            if !info.sections.is_empty() {
                summary.push_str("   - Composition sections:\n");
                for section in &info.sections {
                    summary.push_str(&format!("     • {section}\n"));
                }
            }
            if info.ips_profile {
                summary.push_str("   - ips_profile: true\n");
            }
        }

        summary.push_str(&format!("\n{rule}\n"));
        summary
    }

    /// Log the report
    pub fn log_summary(&self) {
        if self.is_valid() {
            tracing::info!(
                file = %self.file.display(),
                warnings = self.warnings.len(),
                entries = self.info.entry_count.unwrap_or(0),
                "Bundle is valid"
            );
        } else {
            tracing::warn!(
                file = %self.file.display(),
                errors = self.errors.len(),
                first_error = self.errors.first().map(String::as_str).unwrap_or(""),
                "Bundle is invalid"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_do_not_invalidate() {
        let mut report = ValidationReport::new("bundle.json");
        report.warning("Bundle does not declare the IPS profile");
        assert!(report.is_valid());

        report.error("Bundle has no entries");
        assert!(!report.is_valid());
    }

    #[test]
    fn test_format_summary_lists_counts_and_sections() {
        let mut report = ValidationReport::new("ips_sample.json");
        report.info.bundle_id = Some("b-1".to_string());
        report.info.entry_count = Some(3);
        report.info.resources.insert("Condition".to_string(), 1);
        report.info.sections.push("Problem List".to_string());

        let text = report.format_summary();
        assert!(text.contains("VALID"));
        assert!(text.contains("• Condition: 1"));
        assert!(text.contains("• Problem List"));
        assert!(text.contains("entry_count: 3"));
    }
}
