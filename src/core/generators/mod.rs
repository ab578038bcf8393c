//! Resource generators
//!
//! One generator per resource kind. Each draws its coded concept from the
//! locale's code tables and every other value from the [`FactProvider`], and
//! returns a record that already passes [`ClinicalResource::validate`].
//! Only Condition records request a narrative; when the enricher returns
//! nothing the concept's display text is used.
//!
//! # Example
//!
//! ```rust
//! use ipsgen::adapters::enrichment::NoopEnricher;
//! use ipsgen::core::generators::{GenerationOptions, ResourceGenerators};
//! use ipsgen::facts::FactProvider;
//! use ipsgen::locale::Locale;
//! use std::sync::Arc;
//!
//! # fn example() -> ipsgen::domain::Result<()> {
//! let facts = FactProvider::seeded(Locale::base(), 1);
//! let mut generators = ResourceGenerators::new(facts, Arc::new(NoopEnricher));
//! let allergy = generators.generate_allergy("patient-1", &GenerationOptions::default())?;
//! assert_eq!(allergy.patient_reference().reference, "Patient/patient-1");
//! # Ok(())
//! # }
//! ```

mod observation;

use crate::adapters::enrichment::NarrativeEnricher;
use crate::domain::{
    AllergyCategory, AllergyIntolerance, AllergyReaction, ClinicalResource, CodeableConcept,
    CodedConcept, Condition, Criticality, Dosage, EventStatus, Immunization, IpsError,
    MedicationStatement, MedicationStatus, Meta, Patient, PatientId, Procedure, ReactionSeverity,
    Reference, ResourceId, ResourceKind, Result,
};
use crate::facts::FactProvider;
use crate::locale::Locale;
use crate::terminology::tables::{
    ALLERGY_CLINICAL_ACTIVE, ALLERGY_VERIFICATION_CONFIRMED, CONDITION_CLINICAL_ACTIVE,
    CONDITION_PROBLEM_LIST_ITEM, CONDITION_SEVERITIES, CONDITION_VERIFICATION_CONFIRMED,
    DOSAGE_INSTRUCTIONS, MEDICATION_ROUTES, REACTION_MANIFESTATIONS,
};
use crate::terminology::CodeTables;
use std::sync::Arc;

pub const PATIENT_PROFILE: &str = "http://hl7.org/fhir/uv/ips/StructureDefinition/Patient-uv-ips";

/// Per-call generation options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Restrict the draw to these codes of the kind's table
    pub code_subset: Option<Vec<String>>,
}

impl GenerationOptions {
    /// Options restricting the draw to the given codes
    pub fn with_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            code_subset: Some(codes.into_iter().map(Into::into).collect()),
        }
    }
}

/// Narrative prompt for a condition
pub fn condition_prompt(locale: &Locale, concept: &CodedConcept) -> String {
    format!(
        "Generate a brief 1-sentence clinical note for {} with {}. Be realistic and concise.",
        locale.patient_descriptor, concept.display
    )
}

/// The per-kind generators, sharing one fact provider and enricher
pub struct ResourceGenerators {
    locale: &'static Locale,
    tables: CodeTables,
    facts: FactProvider,
    enricher: Arc<dyn NarrativeEnricher>,
}

impl ResourceGenerators {
    /// Generators for the fact provider's locale
    pub fn new(facts: FactProvider, enricher: Arc<dyn NarrativeEnricher>) -> Self {
        let locale = facts.locale();
        Self {
            locale,
            tables: CodeTables::for_locale(locale),
            facts,
            enricher,
        }
    }

    /// Replaces the resolved code tables
    pub fn with_tables(mut self, tables: CodeTables) -> Self {
        self.tables = tables;
        self
    }

    pub fn locale(&self) -> &'static Locale {
        self.locale
    }

    pub fn tables(&self) -> &CodeTables {
        &self.tables
    }

    pub fn facts(&self) -> &FactProvider {
        &self.facts
    }

    pub fn enricher(&self) -> &Arc<dyn NarrativeEnricher> {
        &self.enricher
    }

    /// A fresh resource identifier
    pub fn next_id(&mut self) -> ResourceId {
        ResourceId::from_uuid(self.facts.uuid())
    }

    fn pick_concept(
        &mut self,
        kind: ResourceKind,
        options: &GenerationOptions,
    ) -> Result<CodedConcept> {
        let concepts = self.tables.require(kind)?;
        let pool: Vec<CodedConcept> = match &options.code_subset {
            Some(codes) => concepts
                .iter()
                .filter(|c| codes.iter().any(|code| code == c.code))
                .copied()
                .collect(),
            None => concepts.to_vec(),
        };
        if pool.is_empty() {
            return Err(IpsError::Configuration(format!(
                "none of the requested codes are in the {} table for locale {}",
                kind.resource_type(),
                self.locale.code
            )));
        }
        self.facts.choose(&pool, kind.plural()).copied()
    }

    /// The bundle's subject
    pub fn generate_patient(&mut self) -> Result<Patient> {
        let id = self.next_id();
        let name = self.facts.full_name();
        let telecom = self.facts.telecom(&name);

        let patient = Patient {
            id,
            meta: Meta::profile(PATIENT_PROFILE),
            identifier: vec![self.facts.national_identifier()],
            name: vec![name.into()],
            telecom,
            gender: self.facts.gender(),
            birth_date: self.facts.birth_date(),
            address: vec![self.facts.address()],
        };
        patient.validate()?;
        Ok(patient)
    }

    /// Generates one record of `kind` for the patient
    pub async fn generate(
        &mut self,
        kind: ResourceKind,
        patient_id: &str,
        options: &GenerationOptions,
    ) -> Result<ClinicalResource> {
        match kind {
            ResourceKind::Allergy => self.generate_allergy(patient_id, options),
            ResourceKind::Medication => self.generate_medication(patient_id, options),
            ResourceKind::Condition => self.generate_condition(patient_id, options).await,
            ResourceKind::Immunization => self.generate_immunization(patient_id, options),
            ResourceKind::Procedure => self.generate_procedure(patient_id, options),
            ResourceKind::Observation => self.generate_observation(patient_id, options),
        }
    }

    /// AllergyIntolerance with one reaction
    pub fn generate_allergy(
        &mut self,
        patient_id: &str,
        options: &GenerationOptions,
    ) -> Result<ClinicalResource> {
        let patient = PatientId::new(patient_id)?;
        let concept = self.pick_concept(ResourceKind::Allergy, options)?;
        let id = self.next_id();

        let category = *self.facts.choose(&AllergyCategory::ALL, "allergy categories")?;
        let criticality = *self.facts.choose(&Criticality::ALL, "criticalities")?;
        let manifestation = *self.facts.choose(REACTION_MANIFESTATIONS, "manifestations")?;
        let severity = *self.facts.choose(&ReactionSeverity::ALL, "severities")?;

        finish(ClinicalResource::Allergy(AllergyIntolerance {
            id,
            meta: Meta::profile(ResourceKind::Allergy.profile()),
            clinical_status: CodeableConcept::coded(&ALLERGY_CLINICAL_ACTIVE),
            verification_status: CodeableConcept::coded(&ALLERGY_VERIFICATION_CONFIRMED),
            category: vec![category],
            criticality,
            code: CodeableConcept::coded(&concept),
            patient: patient_reference(&patient),
            onset_date_time: self.facts.past_datetime(30, 3650),
            reaction: vec![AllergyReaction {
                manifestation: vec![CodeableConcept::coded(&manifestation)],
                severity,
            }],
        }))
    }

    /// MedicationStatement with dosage text and route
    pub fn generate_medication(
        &mut self,
        patient_id: &str,
        options: &GenerationOptions,
    ) -> Result<ClinicalResource> {
        let patient = PatientId::new(patient_id)?;
        let concept = self.pick_concept(ResourceKind::Medication, options)?;
        let id = self.next_id();

        let status = *self.facts.choose(&MedicationStatus::ALL, "medication statuses")?;
        let text = *self.facts.choose(DOSAGE_INSTRUCTIONS, "dosage instructions")?;
        let route = *self.facts.choose(MEDICATION_ROUTES, "routes")?;

        finish(ClinicalResource::Medication(MedicationStatement {
            id,
            meta: Meta::profile(ResourceKind::Medication.profile()),
            status,
            medication_codeable_concept: CodeableConcept::coded(&concept),
            subject: patient_reference(&patient),
            effective_date_time: self.facts.past_datetime(30, 730),
            dosage: vec![Dosage {
                text: text.to_string(),
                route: CodeableConcept::coded(&route),
            }],
        }))
    }

    /// Problem-list Condition; `code.text` is a narrative when the enricher
    /// supplies one, the display otherwise
    pub async fn generate_condition(
        &mut self,
        patient_id: &str,
        options: &GenerationOptions,
    ) -> Result<ClinicalResource> {
        let patient = PatientId::new(patient_id)?;
        let concept = self.pick_concept(ResourceKind::Condition, options)?;
        let id = self.next_id();

        let severity = *self.facts.choose(CONDITION_SEVERITIES, "condition severities")?;
        let onset = self.facts.past_datetime(90, 3650);

        let prompt = condition_prompt(self.locale, &concept);
        let text = match self.enricher.enrich(&prompt).await {
            Some(narrative) => narrative,
            None => concept.display.to_string(),
        };

        finish(ClinicalResource::Condition(Condition {
            id,
            meta: Meta::profile(ResourceKind::Condition.profile()),
            clinical_status: CodeableConcept::coded(&CONDITION_CLINICAL_ACTIVE),
            verification_status: CodeableConcept::coded(&CONDITION_VERIFICATION_CONFIRMED),
            category: vec![CodeableConcept::coded(&CONDITION_PROBLEM_LIST_ITEM)],
            severity: CodeableConcept::coded(&severity),
            code: CodeableConcept::coded(&concept).with_text(text),
            subject: patient_reference(&patient),
            onset_date_time: onset,
        }))
    }

    /// Completed Immunization with lot number and expiration date
    pub fn generate_immunization(
        &mut self,
        patient_id: &str,
        options: &GenerationOptions,
    ) -> Result<ClinicalResource> {
        let patient = PatientId::new(patient_id)?;
        let concept = self.pick_concept(ResourceKind::Immunization, options)?;
        let id = self.next_id();

        let occurrence = self.facts.past_datetime(30, 1825);
        let today = self.facts.now().date_naive();
        let expiration = self.facts.date_after(today, 90, 730);

        finish(ClinicalResource::Immunization(Immunization {
            id,
            meta: Meta::profile(ResourceKind::Immunization.profile()),
            status: EventStatus::Completed,
            vaccine_code: CodeableConcept::coded(&concept),
            patient: patient_reference(&patient),
            occurrence_date_time: occurrence,
            lot_number: self.facts.lot_number(),
            expiration_date: expiration,
        }))
    }

    /// Completed Procedure
    pub fn generate_procedure(
        &mut self,
        patient_id: &str,
        options: &GenerationOptions,
    ) -> Result<ClinicalResource> {
        let patient = PatientId::new(patient_id)?;
        let concept = self.pick_concept(ResourceKind::Procedure, options)?;
        let id = self.next_id();

        finish(ClinicalResource::Procedure(Procedure {
            id,
            meta: Meta::profile(ResourceKind::Procedure.profile()),
            status: EventStatus::Completed,
            code: CodeableConcept::coded(&concept),
            subject: patient_reference(&patient),
            performed_date_time: self.facts.past_datetime(180, 3650),
        }))
    }

    /// Final Observation; the value form follows the code's measurement profile
    pub fn generate_observation(
        &mut self,
        patient_id: &str,
        options: &GenerationOptions,
    ) -> Result<ClinicalResource> {
        let patient = PatientId::new(patient_id)?;
        let concept = self.pick_concept(ResourceKind::Observation, options)?;
        let id = self.next_id();

        let observation =
            observation::build(&mut self.facts, id, &concept, patient_reference(&patient))?;
        finish(ClinicalResource::Observation(observation))
    }
}

fn patient_reference(patient: &PatientId) -> Reference {
    Reference {
        reference: patient.reference(),
    }
}

fn finish(resource: ClinicalResource) -> Result<ClinicalResource> {
    resource.validate()?;
    tracing::trace!(
        kind = %resource.kind(),
        resource_id = %resource.id(),
        "Generated resource"
    );
    Ok(resource)
}
