//! FHIR resources that make up an IPS document
//!
//! Each clinical resource is created once by its generator, references the
//! bundle's patient and is never mutated afterwards. `validate` enforces the
//! structural contract every generator must uphold before a bundle is
//! returned.

use super::datatypes::{
    Address, CodeableConcept, ContactPoint, HumanName, Identifier, Meta, Quantity, Reference,
};
use super::errors::IpsError;
use super::ids::ResourceId;
use super::kind::ResourceKind;
use super::result::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Administrative gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];
}

/// Category of an allergy or intolerance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllergyCategory {
    Food,
    Medication,
    Environment,
    Biologic,
}

impl AllergyCategory {
    pub const ALL: [AllergyCategory; 4] = [
        AllergyCategory::Food,
        AllergyCategory::Medication,
        AllergyCategory::Environment,
        AllergyCategory::Biologic,
    ];
}

/// Potential for a life-threatening reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Criticality {
    Low,
    High,
    UnableToAssess,
}

impl Criticality {
    pub const ALL: [Criticality; 3] = [
        Criticality::Low,
        Criticality::High,
        Criticality::UnableToAssess,
    ];
}

/// Severity of an observed reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionSeverity {
    Mild,
    Moderate,
    Severe,
}

impl ReactionSeverity {
    pub const ALL: [ReactionSeverity; 3] = [
        ReactionSeverity::Mild,
        ReactionSeverity::Moderate,
        ReactionSeverity::Severe,
    ];
}

/// MedicationStatement.status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MedicationStatus {
    Active,
    Completed,
}

impl MedicationStatus {
    pub const ALL: [MedicationStatus; 2] = [MedicationStatus::Active, MedicationStatus::Completed];
}

/// Immunization.status and Procedure.status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventStatus {
    Completed,
}

/// Observation.status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObservationStatus {
    Final,
}

/// Composition.status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositionStatus {
    Final,
}

/// Demographics of the bundle's subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: ResourceId,
    pub meta: Meta,
    #[serde(default)]
    pub identifier: Vec<Identifier>,
    #[serde(default)]
    pub name: Vec<HumanName>,
    #[serde(default)]
    pub telecom: Vec<ContactPoint>,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub address: Vec<Address>,
}

impl Patient {
    /// Reference other resources use to point at this patient
    pub fn reference(&self) -> Reference {
        Reference::to("Patient", self.id)
    }

    /// Checks the required demographic fields
    pub fn validate(&self) -> Result<()> {
        let fail = |reason: &str| Err(IpsError::invalid_resource("Patient", self.id.to_string(), reason));

        if self.meta.profile.is_empty() {
            return fail("meta.profile is empty");
        }
        if self.identifier.is_empty()
            || self
                .identifier
                .iter()
                .any(|i| i.system.is_empty() || i.value.is_empty())
        {
            return fail("at least one complete identifier is required");
        }
        if self
            .name
            .first()
            .map(|n| n.family.is_empty() || n.given.iter().all(|g| g.is_empty()))
            .unwrap_or(true)
        {
            return fail("an official name with family and given parts is required");
        }
        if self.address.is_empty() {
            return fail("an address is required");
        }
        Ok(())
    }
}

/// A reaction recorded against an allergy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllergyReaction {
    #[serde(default)]
    pub manifestation: Vec<CodeableConcept>,
    pub severity: ReactionSeverity,
}

/// AllergyIntolerance resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllergyIntolerance {
    pub id: ResourceId,
    pub meta: Meta,
    pub clinical_status: CodeableConcept,
    pub verification_status: CodeableConcept,
    #[serde(default)]
    pub category: Vec<AllergyCategory>,
    pub criticality: Criticality,
    pub code: CodeableConcept,
    pub patient: Reference,
    pub onset_date_time: DateTime<Utc>,
    #[serde(default)]
    pub reaction: Vec<AllergyReaction>,
}

/// Dosage instructions of a medication statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dosage {
    pub text: String,
    pub route: CodeableConcept,
}

/// MedicationStatement resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationStatement {
    pub id: ResourceId,
    pub meta: Meta,
    pub status: MedicationStatus,
    pub medication_codeable_concept: CodeableConcept,
    pub subject: Reference,
    pub effective_date_time: DateTime<Utc>,
    #[serde(default)]
    pub dosage: Vec<Dosage>,
}

/// Condition resource (problem list item)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub id: ResourceId,
    pub meta: Meta,
    pub clinical_status: CodeableConcept,
    pub verification_status: CodeableConcept,
    #[serde(default)]
    pub category: Vec<CodeableConcept>,
    pub severity: CodeableConcept,
    pub code: CodeableConcept,
    pub subject: Reference,
    pub onset_date_time: DateTime<Utc>,
}

/// Immunization resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Immunization {
    pub id: ResourceId,
    pub meta: Meta,
    pub status: EventStatus,
    pub vaccine_code: CodeableConcept,
    pub patient: Reference,
    pub occurrence_date_time: DateTime<Utc>,
    pub lot_number: String,
    pub expiration_date: NaiveDate,
}

/// Procedure resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Procedure {
    pub id: ResourceId,
    pub meta: Meta,
    pub status: EventStatus,
    pub code: CodeableConcept,
    pub subject: Reference,
    pub performed_date_time: DateTime<Utc>,
}

/// One component of a panel observation (e.g. systolic pressure)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationComponent {
    pub code: CodeableConcept,
    pub value_quantity: Quantity,
}

/// Normal range for a quantitative result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRange {
    pub low: Quantity,
    pub high: Quantity,
}

/// Observation resource (vital sign or laboratory result)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub id: ResourceId,
    pub meta: Meta,
    pub status: ObservationStatus,
    #[serde(default)]
    pub category: Vec<CodeableConcept>,
    pub code: CodeableConcept,
    pub subject: Reference,
    pub effective_date_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_quantity: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_codeable_concept: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub component: Vec<ObservationComponent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reference_range: Vec<ReferenceRange>,
}

/// A clinical record owned by the bundle's patient
#[derive(Debug, Clone, PartialEq)]
pub enum ClinicalResource {
    Allergy(AllergyIntolerance),
    Medication(MedicationStatement),
    Condition(Condition),
    Immunization(Immunization),
    Procedure(Procedure),
    Observation(Observation),
}

impl ClinicalResource {
    /// Resource identifier
    pub fn id(&self) -> ResourceId {
        match self {
            ClinicalResource::Allergy(r) => r.id,
            ClinicalResource::Medication(r) => r.id,
            ClinicalResource::Condition(r) => r.id,
            ClinicalResource::Immunization(r) => r.id,
            ClinicalResource::Procedure(r) => r.id,
            ClinicalResource::Observation(r) => r.id,
        }
    }

    /// Resource kind
    pub fn kind(&self) -> ResourceKind {
        match self {
            ClinicalResource::Allergy(_) => ResourceKind::Allergy,
            ClinicalResource::Medication(_) => ResourceKind::Medication,
            ClinicalResource::Condition(_) => ResourceKind::Condition,
            ClinicalResource::Immunization(_) => ResourceKind::Immunization,
            ClinicalResource::Procedure(_) => ResourceKind::Procedure,
            ClinicalResource::Observation(_) => ResourceKind::Observation,
        }
    }

    /// Reference to the owning patient
    pub fn patient_reference(&self) -> &Reference {
        match self {
            ClinicalResource::Allergy(r) => &r.patient,
            ClinicalResource::Medication(r) => &r.subject,
            ClinicalResource::Condition(r) => &r.subject,
            ClinicalResource::Immunization(r) => &r.patient,
            ClinicalResource::Procedure(r) => &r.subject,
            ClinicalResource::Observation(r) => &r.subject,
        }
    }

    /// The concept drawn from the code table for this kind
    pub fn code(&self) -> &CodeableConcept {
        match self {
            ClinicalResource::Allergy(r) => &r.code,
            ClinicalResource::Medication(r) => &r.medication_codeable_concept,
            ClinicalResource::Condition(r) => &r.code,
            ClinicalResource::Immunization(r) => &r.vaccine_code,
            ClinicalResource::Procedure(r) => &r.code,
            ClinicalResource::Observation(r) => &r.code,
        }
    }

    fn meta(&self) -> &Meta {
        match self {
            ClinicalResource::Allergy(r) => &r.meta,
            ClinicalResource::Medication(r) => &r.meta,
            ClinicalResource::Condition(r) => &r.meta,
            ClinicalResource::Immunization(r) => &r.meta,
            ClinicalResource::Procedure(r) => &r.meta,
            ClinicalResource::Observation(r) => &r.meta,
        }
    }

    /// Checks required fields, codings and kind-specific invariants
    ///
    /// # Errors
    ///
    /// Returns [`IpsError::InvalidResource`] naming the resource type and id.
    pub fn validate(&self) -> Result<()> {
        let fail = |reason: String| {
            Err(IpsError::invalid_resource(
                self.kind().resource_type(),
                self.id().to_string(),
                reason,
            ))
        };

        if self.meta().profile.is_empty() {
            return fail("meta.profile is empty".to_string());
        }
        match self.patient_reference().target() {
            Some(("Patient", _)) => {}
            _ => {
                return fail(format!(
                    "patient reference '{}' is not a Patient reference",
                    self.patient_reference().reference
                ))
            }
        }
        if let Err(reason) = check_concept("code", self.code()) {
            return fail(reason);
        }

        let specific = match self {
            ClinicalResource::Allergy(r) => validate_allergy(r),
            ClinicalResource::Medication(r) => validate_medication(r),
            ClinicalResource::Condition(r) => validate_condition(r),
            ClinicalResource::Immunization(r) => validate_immunization(r),
            ClinicalResource::Procedure(_) => Ok(()),
            ClinicalResource::Observation(r) => validate_observation(r),
        };
        match specific {
            Ok(()) => Ok(()),
            Err(reason) => fail(reason),
        }
    }
}

fn check_concept(field: &str, concept: &CodeableConcept) -> std::result::Result<(), String> {
    if concept.coding.is_empty() {
        return Err(format!("{field} has no coding"));
    }
    for coding in &concept.coding {
        if coding.system.is_empty() || coding.code.is_empty() || coding.display.is_empty() {
            return Err(format!("{field} has an incomplete coding"));
        }
    }
    if concept.text.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(format!("{field}.text is blank"));
    }
    Ok(())
}

fn validate_allergy(r: &AllergyIntolerance) -> std::result::Result<(), String> {
    check_concept("clinicalStatus", &r.clinical_status)?;
    check_concept("verificationStatus", &r.verification_status)?;
    if r.category.is_empty() {
        return Err("category is empty".to_string());
    }
    for reaction in &r.reaction {
        if reaction.manifestation.is_empty() {
            return Err("reaction without manifestation".to_string());
        }
        for manifestation in &reaction.manifestation {
            check_concept("reaction.manifestation", manifestation)?;
        }
    }
    Ok(())
}

fn validate_medication(r: &MedicationStatement) -> std::result::Result<(), String> {
    for dosage in &r.dosage {
        if dosage.text.trim().is_empty() {
            return Err("dosage.text is blank".to_string());
        }
        check_concept("dosage.route", &dosage.route)?;
    }
    Ok(())
}

fn validate_condition(r: &Condition) -> std::result::Result<(), String> {
    check_concept("clinicalStatus", &r.clinical_status)?;
    check_concept("verificationStatus", &r.verification_status)?;
    check_concept("severity", &r.severity)?;
    if r.code.text.is_none() {
        return Err("code.text must carry the display or a narrative".to_string());
    }
    Ok(())
}

fn validate_immunization(r: &Immunization) -> std::result::Result<(), String> {
    if r.lot_number.trim().is_empty() {
        return Err("lotNumber is blank".to_string());
    }
    if r.expiration_date <= r.occurrence_date_time.date_naive() {
        return Err("expirationDate must follow the occurrence".to_string());
    }
    Ok(())
}

fn validate_observation(r: &Observation) -> std::result::Result<(), String> {
    let value_kinds = [
        r.value_quantity.is_some(),
        r.value_codeable_concept.is_some(),
        !r.component.is_empty(),
    ]
    .into_iter()
    .filter(|present| *present)
    .count();
    if value_kinds != 1 {
        return Err("exactly one of valueQuantity, valueCodeableConcept or component is required".to_string());
    }
    if let Some(value) = &r.value_codeable_concept {
        check_concept("valueCodeableConcept", value)?;
    }
    for component in &r.component {
        check_concept("component.code", &component.code)?;
    }
    for range in &r.reference_range {
        if range.low.value > range.high.value {
            return Err("referenceRange.low exceeds referenceRange.high".to_string());
        }
    }
    Ok(())
}

/// A section of the document header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionSection {
    pub title: String,
    pub code: CodeableConcept,
    #[serde(default)]
    pub entry: Vec<Reference>,
}

/// The IPS document header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    pub id: ResourceId,
    pub meta: Meta,
    pub status: CompositionStatus,
    #[serde(rename = "type")]
    pub document_type: CodeableConcept,
    pub subject: Reference,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub author: Vec<Reference>,
    pub title: String,
    #[serde(default)]
    pub section: Vec<CompositionSection>,
}

/// Any resource that can appear in a bundle entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "resourceType")]
pub enum Resource {
    Composition(Composition),
    Patient(Patient),
    AllergyIntolerance(AllergyIntolerance),
    MedicationStatement(MedicationStatement),
    Condition(Condition),
    Immunization(Immunization),
    Procedure(Procedure),
    Observation(Observation),
}

impl Resource {
    /// Resource identifier
    pub fn id(&self) -> ResourceId {
        match self {
            Resource::Composition(r) => r.id,
            Resource::Patient(r) => r.id,
            Resource::AllergyIntolerance(r) => r.id,
            Resource::MedicationStatement(r) => r.id,
            Resource::Condition(r) => r.id,
            Resource::Immunization(r) => r.id,
            Resource::Procedure(r) => r.id,
            Resource::Observation(r) => r.id,
        }
    }

    /// FHIR `resourceType`
    pub fn resource_type(&self) -> &'static str {
        match self {
            Resource::Composition(_) => "Composition",
            Resource::Patient(_) => "Patient",
            Resource::AllergyIntolerance(_) => "AllergyIntolerance",
            Resource::MedicationStatement(_) => "MedicationStatement",
            Resource::Condition(_) => "Condition",
            Resource::Immunization(_) => "Immunization",
            Resource::Procedure(_) => "Procedure",
            Resource::Observation(_) => "Observation",
        }
    }

    /// Borrows the clinical payload back out, if this is one
    pub fn as_clinical(&self) -> Option<ClinicalResource> {
        match self {
            Resource::AllergyIntolerance(r) => Some(ClinicalResource::Allergy(r.clone())),
            Resource::MedicationStatement(r) => Some(ClinicalResource::Medication(r.clone())),
            Resource::Condition(r) => Some(ClinicalResource::Condition(r.clone())),
            Resource::Immunization(r) => Some(ClinicalResource::Immunization(r.clone())),
            Resource::Procedure(r) => Some(ClinicalResource::Procedure(r.clone())),
            Resource::Observation(r) => Some(ClinicalResource::Observation(r.clone())),
            Resource::Composition(_) | Resource::Patient(_) => None,
        }
    }
}

impl From<ClinicalResource> for Resource {
    fn from(resource: ClinicalResource) -> Self {
        match resource {
            ClinicalResource::Allergy(r) => Resource::AllergyIntolerance(r),
            ClinicalResource::Medication(r) => Resource::MedicationStatement(r),
            ClinicalResource::Condition(r) => Resource::Condition(r),
            ClinicalResource::Immunization(r) => Resource::Immunization(r),
            ClinicalResource::Procedure(r) => Resource::Procedure(r),
            ClinicalResource::Observation(r) => Resource::Observation(r),
        }
    }
}
