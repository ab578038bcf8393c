//! Bundle composer
//!
//! Builds one complete IPS document: a patient, the requested number of
//! clinical records per kind, and a Composition indexing them. Generation is
//! a strictly sequential chain; a configuration error from any generator
//! aborts the bundle and nothing partial is returned.

use crate::adapters::enrichment::NarrativeEnricher;
use crate::core::generators::{GenerationOptions, ResourceGenerators};
use crate::core::validation::validate_bundle;
use crate::domain::{
    Bundle, BundleEntry, BundleType, ClinicalResource, CodeableConcept, Composition,
    CompositionSection, CompositionStatus, Identifier, Meta, Patient, Reference, Resource,
    ResourceCounts, ResourceId, ResourceKind, Result, IPS_BUNDLE_PROFILE,
};
use crate::facts::FactProvider;
use crate::locale::Locale;
use crate::terminology::tables::{LOINC, PATIENT_SUMMARY_DOCUMENT};
use std::sync::Arc;
use std::time::Instant;

pub const COMPOSITION_PROFILE: &str =
    "http://hl7.org/fhir/uv/ips/StructureDefinition/Composition-uv-ips";
pub const DOCUMENT_TITLE: &str = "International Patient Summary";
const BUNDLE_IDENTIFIER_SYSTEM: &str = "urn:ietf:rfc:3986";

/// Composes IPS bundles for one locale
///
/// # Example
///
/// ```rust
/// use ipsgen::adapters::enrichment::NoopEnricher;
/// use ipsgen::core::BundleComposer;
/// use ipsgen::domain::{ResourceCounts, ResourceKind};
/// use ipsgen::locale::Locale;
/// use std::sync::Arc;
///
/// # async fn example() -> ipsgen::domain::Result<()> {
/// let mut composer = BundleComposer::for_locale(Locale::base(), Some(7), Arc::new(NoopEnricher));
/// let counts = ResourceCounts::none()
///     .with(ResourceKind::Condition, 2)
///     .with(ResourceKind::Allergy, 1);
///
/// let bundle = composer.generate_bundle(&counts).await?;
/// assert_eq!(bundle.entry.len(), 5);
/// # Ok(())
/// # }
/// ```
pub struct BundleComposer {
    generators: ResourceGenerators,
}

impl BundleComposer {
    /// Composer drawing facts from `facts`, whose locale also selects the code tables
    pub fn new(facts: FactProvider, enricher: Arc<dyn NarrativeEnricher>) -> Self {
        Self {
            generators: ResourceGenerators::new(facts, enricher),
        }
    }

    /// Composer for `locale`, seeded when `seed` is given
    pub fn for_locale(
        locale: &'static Locale,
        seed: Option<u64>,
        enricher: Arc<dyn NarrativeEnricher>,
    ) -> Self {
        Self::new(FactProvider::new(locale, seed), enricher)
    }

    /// Composer over pre-built generators
    pub fn from_generators(generators: ResourceGenerators) -> Self {
        Self { generators }
    }

    pub fn locale(&self) -> &'static Locale {
        self.generators.locale()
    }

    /// Generates one bundle
    ///
    /// # Errors
    ///
    /// Counts over [`crate::domain::counts::MAX_PER_KIND`] and configuration
    /// errors from the generators (empty code table) abort the bundle. A composed bundle that fails structural validation is reported
    /// as [`crate::domain::IpsError::InvalidResource`] or
    /// [`crate::domain::IpsError::Validation`].
    pub async fn generate_bundle(&mut self, counts: &ResourceCounts) -> Result<Bundle> {
        counts.validate()?;
        let started = Instant::now();
        crate::log_generation_start!(
            self.locale().code,
            counts,
            self.generators.enricher().is_enabled()
        );

        let patient = self.generators.generate_patient()?;
        let patient_id = patient.id.to_string();
        let options = GenerationOptions::default();

        let mut clinical: Vec<ClinicalResource> = Vec::with_capacity(counts.total());
        for kind in ResourceKind::ALL {
            for _ in 0..counts.get(kind) {
                let resource = self.generators.generate(kind, &patient_id, &options).await?;
                clinical.push(resource);
            }
            tracing::debug!(kind = %kind, count = counts.get(kind), "Generated records");
        }

        let composition_id = self.generators.next_id();
        let bundle_id = self.generators.next_id();
        let timestamp = self.generators.facts().now();

        let composition = compose_header(composition_id, &patient, &clinical, timestamp);

        let mut entry = Vec::with_capacity(2 + clinical.len());
        entry.push(BundleEntry::new(Resource::Composition(composition)));
        entry.push(BundleEntry::new(Resource::Patient(patient)));
        entry.extend(
            clinical
                .into_iter()
                .map(|resource| BundleEntry::new(Resource::from(resource))),
        );

        let bundle = Bundle {
            id: bundle_id,
            meta: Meta::profile(IPS_BUNDLE_PROFILE),
            identifier: Identifier {
                system: BUNDLE_IDENTIFIER_SYSTEM.to_string(),
                value: bundle_id.full_url(),
            },
            bundle_type: BundleType::Document,
            timestamp,
            entry,
        };

        validate_bundle(&bundle)?;
        crate::log_bundle_complete!(bundle.id, bundle.entry.len(), started.elapsed());
        Ok(bundle)
    }
}

/// The Composition: one section per kind with at least one record, each
/// listing its records in generation order
fn compose_header(
    id: ResourceId,
    patient: &Patient,
    clinical: &[ClinicalResource],
    date: chrono::DateTime<chrono::Utc>,
) -> Composition {
    let section = ResourceKind::ALL
        .into_iter()
        .filter_map(|kind| {
            let entry: Vec<Reference> = clinical
                .iter()
                .filter(|r| r.kind() == kind)
                .map(|r| Reference::to(kind.resource_type(), r.id()))
                .collect();
            if entry.is_empty() {
                return None;
            }
            let spec = kind.section();
            Some(CompositionSection {
                title: spec.title.to_string(),
                code: CodeableConcept::from_parts(LOINC, spec.code, spec.display),
                entry,
            })
        })
        .collect();

    Composition {
        id,
        meta: Meta::profile(COMPOSITION_PROFILE),
        status: CompositionStatus::Final,
        document_type: CodeableConcept::coded(&PATIENT_SUMMARY_DOCUMENT),
        subject: patient.reference(),
        date,
        author: vec![patient.reference()],
        title: DOCUMENT_TITLE.to_string(),
        section,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::enrichment::NoopEnricher;
    use crate::domain::IpsError;
    use crate::terminology::CodeTables;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    fn composer(seed: u64) -> BundleComposer {
        let facts = FactProvider::seeded(Locale::base(), seed)
            .with_reference_time(Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap());
        BundleComposer::new(facts, Arc::new(NoopEnricher))
    }

    #[tokio::test]
    async fn test_default_counts_shape() {
        let counts = ResourceCounts::default();
        let bundle = composer(1).generate_bundle(&counts).await.unwrap();

        assert_eq!(bundle.entry.len(), 2 + counts.total());
        let composition = bundle.composition().unwrap();
        assert_eq!(composition.section.len(), 6);
        assert_eq!(composition.title, DOCUMENT_TITLE);
        assert_eq!(composition.author, vec![bundle.patient().unwrap().reference()]);
        assert_eq!(bundle.identifier.value, bundle.id.full_url());
    }

    #[tokio::test]
    async fn test_zero_counts_produce_header_and_patient_only() {
        let bundle = composer(2)
            .generate_bundle(&ResourceCounts::none())
            .await
            .unwrap();
        assert_eq!(bundle.entry.len(), 2);
        assert!(bundle.composition().unwrap().section.is_empty());
    }

    #[tokio::test]
    async fn test_sections_follow_generation_order() {
        let counts = ResourceCounts::none()
            .with(ResourceKind::Observation, 1)
            .with(ResourceKind::Allergy, 2);
        let bundle = composer(3).generate_bundle(&counts).await.unwrap();

        let titles: Vec<&str> = bundle
            .composition()
            .unwrap()
            .section
            .iter()
            .map(|s| s.title.as_str())
            .collect();
        assert_eq!(titles, ["Allergies and Intolerances", "Results"]);

        let types: Vec<&str> = bundle
            .clinical_entries()
            .map(|e| e.resource.resource_type())
            .collect();
        assert_eq!(types, ["AllergyIntolerance", "AllergyIntolerance", "Observation"]);
    }

    #[tokio::test]
    async fn test_timestamp_is_reference_time() {
        let bundle = composer(4)
            .generate_bundle(&ResourceCounts::none())
            .await
            .unwrap();
        assert_eq!(
            bundle.timestamp,
            Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_oversized_counts_are_rejected() {
        let counts = ResourceCounts::none()
            .with(ResourceKind::Allergy, usize::MAX)
            .with(ResourceKind::Condition, 1);
        let err = composer(6).generate_bundle(&counts).await.unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("allergies"));
    }

    #[tokio::test]
    async fn test_empty_table_aborts_bundle() {
        let mut tables = BTreeMap::new();
        tables.insert(ResourceKind::Allergy, Vec::new());
        let facts = FactProvider::seeded(Locale::base(), 5);
        let generators = ResourceGenerators::new(facts, Arc::new(NoopEnricher))
            .with_tables(CodeTables::from_tables("en_US", tables));
        let mut composer = BundleComposer::from_generators(generators);

        let err = composer
            .generate_bundle(&ResourceCounts::none().with(ResourceKind::Allergy, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, IpsError::Configuration(_)));
    }
}
