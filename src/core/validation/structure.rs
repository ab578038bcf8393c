//! Structural validation of a composed bundle
//!
//! Checks the document shape the composer promises: header first, patient
//! second, clinical records grouped by kind, every record owned by the
//! patient and listed in exactly one matching section.

use crate::domain::{
    Bundle, ClinicalResource, IpsError, ResourceId, ResourceKind, Result,
    IPS_BUNDLE_PROFILE,
};
use crate::terminology::tables::PATIENT_SUMMARY_DOCUMENT;
use std::collections::{BTreeMap, HashSet};

fn invalid(reason: impl Into<String>) -> IpsError {
    IpsError::Validation(reason.into())
}

/// Validates a bundle end to end
///
/// # Errors
///
/// [`IpsError::InvalidResource`] when a single resource breaks its own
/// invariants, [`IpsError::Validation`] for document-level violations.
pub fn validate_bundle(bundle: &Bundle) -> Result<()> {
    if !bundle.meta.profile.iter().any(|p| p == IPS_BUNDLE_PROFILE) {
        return Err(invalid("bundle does not declare the IPS bundle profile"));
    }
    if bundle.identifier.value != bundle.id.full_url() {
        return Err(invalid("bundle identifier does not match the bundle id"));
    }

    let composition = bundle
        .composition()
        .ok_or_else(|| invalid("first entry must be a Composition"))?;
    let patient = bundle
        .patient()
        .ok_or_else(|| invalid("second entry must be a Patient"))?;
    patient.validate()?;

    let mut seen = HashSet::new();
    for entry in &bundle.entry {
        let id = entry.resource.id();
        if entry.full_url != id.full_url() {
            return Err(invalid(format!(
                "entry {} has fullUrl {}",
                id, entry.full_url
            )));
        }
        if !seen.insert(id) {
            return Err(invalid(format!("duplicate resource id {id}")));
        }
    }

    let patient_reference = patient.reference();
    if composition.subject != patient_reference {
        return Err(invalid("Composition.subject must reference the bundle's patient"));
    }
    if composition.author.is_empty() {
        return Err(invalid("Composition.author is empty"));
    }
    if !composition
        .document_type
        .primary()
        .is_some_and(|c| PATIENT_SUMMARY_DOCUMENT.matches(c))
    {
        return Err(invalid("Composition.type must be a patient summary document"));
    }

    let clinical = clinical_records(bundle)?;
    let mut last_kind = ResourceKind::Allergy;
    for resource in &clinical {
        resource.validate()?;
        if resource.patient_reference() != &patient_reference {
            return Err(IpsError::invalid_resource(
                resource.kind().resource_type(),
                resource.id().to_string(),
                format!(
                    "references {} instead of {}",
                    resource.patient_reference().reference, patient_reference.reference
                ),
            ));
        }
        if resource.kind() < last_kind {
            return Err(invalid(format!(
                "{} {} is out of generation order",
                resource.kind().resource_type(),
                resource.id()
            )));
        }
        last_kind = resource.kind();
    }

    check_sections(bundle, &clinical)
}

fn clinical_records(bundle: &Bundle) -> Result<Vec<ClinicalResource>> {
    bundle
        .clinical_entries()
        .map(|entry| {
            entry.resource.as_clinical().ok_or_else(|| {
                invalid(format!(
                    "unexpected {} after the patient entry",
                    entry.resource.resource_type()
                ))
            })
        })
        .collect()
}

/// Every section lists exactly the records of its kind, in order, and every
/// record sits in exactly one section
fn check_sections(bundle: &Bundle, clinical: &[ClinicalResource]) -> Result<()> {
    let mut expected: BTreeMap<ResourceKind, Vec<ResourceId>> = BTreeMap::new();
    for resource in clinical {
        expected.entry(resource.kind()).or_default().push(resource.id());
    }

    let composition = bundle
        .composition()
        .ok_or_else(|| invalid("first entry must be a Composition"))?;

    let mut listed: BTreeMap<ResourceKind, Vec<ResourceId>> = BTreeMap::new();
    for section in &composition.section {
        let code = section
            .code
            .primary()
            .map(|c| c.code.as_str())
            .unwrap_or_default();
        let kind = ResourceKind::from_section_code(code)
            .ok_or_else(|| invalid(format!("section '{}' has unknown code '{code}'", section.title)))?;
        if section.title != kind.section().title {
            return Err(invalid(format!(
                "section {code} is titled '{}' instead of '{}'",
                section.title,
                kind.section().title
            )));
        }
        if section.entry.is_empty() {
            return Err(invalid(format!("section '{}' is empty", section.title)));
        }
        if listed.contains_key(&kind) {
            return Err(invalid(format!("section '{}' appears twice", section.title)));
        }

        let mut ids = Vec::with_capacity(section.entry.len());
        for reference in &section.entry {
            let id = match reference.target() {
                Some((resource_type, id)) if resource_type == kind.resource_type() => id
                    .parse::<ResourceId>()
                    .map_err(|_| invalid(format!("section reference '{}' has a malformed id", reference.reference)))?,
                _ => {
                    return Err(invalid(format!(
                        "section '{}' lists '{}'",
                        section.title, reference.reference
                    )))
                }
            };
            ids.push(id);
        }
        listed.insert(kind, ids);
    }

    if listed != expected {
        return Err(invalid(
            "Composition sections do not list exactly the bundle's clinical records",
        ));
    }
    Ok(())
}

/// Counts entries per `resourceType`
pub fn resource_type_counts(bundle: &Bundle) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for entry in &bundle.entry {
        *counts
            .entry(entry.resource.resource_type().to_string())
            .or_insert(0) += 1;
    }
    counts
}
