//! Validation of saved bundle files
//!
//! Works in two passes. The first inspects the raw JSON the way any FHIR
//! consumer would (resource type, bundle type, entries, required resources,
//! sections, profile). When that finds no errors, the document is parsed into
//! the typed model and put through [`validate_bundle`].

use super::report::ValidationReport;
use super::structure::validate_bundle;
use crate::domain::{Bundle, IPS_BUNDLE_PROFILE};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Validates the bundle stored at `path`
///
/// Never fails: every problem, including an unreadable file, is recorded in
/// the returned report.
pub fn validate_file(path: impl AsRef<Path>) -> ValidationReport {
    let path = path.as_ref();
    let mut report = ValidationReport::new(path);

    if !path.exists() {
        report.error(format!("File not found: {}", path.display()));
        return report;
    }

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            report.error(format!("Failed to read file: {e}"));
            return report;
        }
    };

    validate_str(&contents, &mut report);
    report
}

/// Validates a JSON document into `report`
pub fn validate_str(contents: &str, report: &mut ValidationReport) {
    let document: Value = match serde_json::from_str(contents) {
        Ok(document) => document,
        Err(e) => {
            report.error(format!("Invalid JSON: {e}"));
            return;
        }
    };

    inspect_document(&document, report);
    if !report.is_valid() {
        return;
    }

    match serde_json::from_value::<Bundle>(document) {
        Ok(bundle) => {
            if let Err(e) = validate_bundle(&bundle) {
                report.error(e.to_string());
            }
        }
        Err(e) => report.error(format!("Bundle does not match the IPS document model: {e}")),
    }
}

fn resource_type(entry: &Value) -> Option<&str> {
    entry
        .get("resource")
        .and_then(|r| r.get("resourceType"))
        .and_then(Value::as_str)
}

fn inspect_document(document: &Value, report: &mut ValidationReport) {
    if document.get("resourceType").and_then(Value::as_str) != Some("Bundle") {
        report.error("Resource type is not 'Bundle'");
        return;
    }

    let text = |field: &str| document.get(field).and_then(Value::as_str).map(str::to_string);
    report.info.bundle_id = text("id");
    report.info.bundle_type = text("type");
    report.info.timestamp = text("timestamp");

    let bundle_type = report.info.bundle_type.clone().unwrap_or_default();
    if bundle_type != "document" {
        report.error(format!(
            "Bundle type should be 'document', got '{bundle_type}'"
        ));
        return;
    }

    let entries = match document.get("entry").and_then(Value::as_array) {
        Some(entries) if !entries.is_empty() => entries,
        _ => {
            report.error("Bundle has no entries");
            return;
        }
    };
    report.info.entry_count = Some(entries.len());

    if entries.first().and_then(resource_type) != Some("Composition") {
        report.warning("First entry should be a Composition resource");
    }

    let mut resources: BTreeMap<String, usize> = BTreeMap::new();
    for entry in entries {
        if let Some(resource_type) = resource_type(entry) {
            *resources.entry(resource_type.to_string()).or_insert(0) += 1;
        }
    }
    for required in ["Composition", "Patient"] {
        if !resources.contains_key(required) {
            report.error(format!("Missing required resource: {required}"));
        }
    }
    report.info.resources = resources;

    for entry in entries {
        if resource_type(entry) != Some("Composition") {
            continue;
        }
        let sections = entry
            .get("resource")
            .and_then(|r| r.get("section"))
            .and_then(Value::as_array)
            .filter(|sections| !sections.is_empty());
        match sections {
            Some(sections) => {
                report.info.sections = sections
                    .iter()
                    .filter_map(|s| s.get("title").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect();
            }
            None => report.warning("Composition has no sections"),
        }
    }

    match document
        .get("meta")
        .and_then(|m| m.get("profile"))
        .and_then(Value::as_array)
    {
        Some(profiles) if !profiles.is_empty() => {
            if profiles.iter().any(|p| p.as_str() == Some(IPS_BUNDLE_PROFILE)) {
                report.info.ips_profile = true;
            } else {
                report.warning("Bundle does not declare IPS profile");
            }
        }
        _ => report.warning("Bundle meta or profile not specified"),
    }
}
