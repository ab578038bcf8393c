//! Properties every generated bundle must satisfy

use chrono::{TimeZone, Utc};
use ipsgen::adapters::enrichment::NoopEnricher;
use ipsgen::core::{BundleComposer, GenerationOptions, ResourceGenerators};
use ipsgen::domain::{Bundle, ResourceCounts, ResourceId, ResourceKind};
use ipsgen::facts::FactProvider;
use ipsgen::locale::Locale;
use ipsgen::terminology::tables::IRISH_CONDITIONS;
use ipsgen::terminology::CodeTables;
use std::collections::BTreeSet;
use std::sync::Arc;
use test_case::test_case;

fn facts(locale: &'static Locale, seed: u64) -> FactProvider {
    FactProvider::seeded(locale, seed)
        .with_reference_time(Utc.with_ymd_and_hms(2024, 11, 5, 14, 0, 0).unwrap())
}

async fn generate(locale: &'static Locale, seed: u64, counts: &ResourceCounts) -> Bundle {
    BundleComposer::new(facts(locale, seed), Arc::new(NoopEnricher))
        .generate_bundle(counts)
        .await
        .unwrap()
}

fn counts_cases() -> Vec<ResourceCounts> {
    vec![
        ResourceCounts::default(),
        ResourceCounts::none(),
        ResourceCounts::none().with(ResourceKind::Observation, 6),
        ResourceCounts::default()
            .with(ResourceKind::Medication, 0)
            .with(ResourceKind::Procedure, 4),
        ResourceCounts::none()
            .with(ResourceKind::Allergy, 1)
            .with(ResourceKind::Immunization, 1),
    ]
}

#[test_case(Locale::base() ; "base locale")]
#[test_case(Locale::ireland() ; "irish locale")]
#[tokio::test]
async fn test_referential_integrity(locale: &'static Locale) {
    for (seed, counts) in counts_cases().iter().enumerate() {
        let bundle = generate(locale, seed as u64, counts).await;
        let patient_ref = bundle.patient().unwrap().reference();

        assert_eq!(bundle.composition().unwrap().subject, patient_ref);
        for entry in bundle.clinical_entries() {
            let clinical = entry.resource.as_clinical().unwrap();
            assert_eq!(clinical.patient_reference(), &patient_ref);
        }
    }
}

#[test_case(Locale::base() ; "base locale")]
#[test_case(Locale::ireland() ; "irish locale")]
#[tokio::test]
async fn test_header_lists_every_record_exactly_once(locale: &'static Locale) {
    for (seed, counts) in counts_cases().iter().enumerate() {
        let bundle = generate(locale, 100 + seed as u64, counts).await;

        let listed: Vec<String> = bundle
            .composition()
            .unwrap()
            .section
            .iter()
            .flat_map(|s| s.entry.iter().map(|r| r.reference.clone()))
            .collect();
        let listed_set: BTreeSet<&String> = listed.iter().collect();
        assert_eq!(listed.len(), listed_set.len(), "a record is listed twice");

        let records: BTreeSet<String> = bundle
            .clinical_entries()
            .map(|e| format!("{}/{}", e.resource.resource_type(), e.resource.id()))
            .collect();
        assert_eq!(listed_set.into_iter().cloned().collect::<BTreeSet<_>>(), records);
    }
}

#[tokio::test]
async fn test_count_fidelity() {
    for (seed, counts) in counts_cases().iter().enumerate() {
        let bundle = generate(Locale::base(), 200 + seed as u64, counts).await;
        assert_eq!(bundle.entry.len(), 2 + counts.total());

        let composition = bundle.composition().unwrap();
        for kind in ResourceKind::ALL {
            let generated = bundle
                .clinical_entries()
                .filter(|e| e.resource.resource_type() == kind.resource_type())
                .count();
            assert_eq!(generated, counts.get(kind), "{kind}");

            let section = composition
                .section
                .iter()
                .find(|s| s.title == kind.section().title);
            if counts.get(kind) == 0 {
                assert!(section.is_none(), "empty section for {kind}");
            } else {
                assert_eq!(section.unwrap().entry.len(), counts.get(kind));
            }
        }
    }
}

#[test_case(Locale::base() ; "base locale")]
#[test_case(Locale::ireland() ; "irish locale")]
#[tokio::test]
async fn test_codes_come_from_the_locale_tables(locale: &'static Locale) {
    let tables = CodeTables::for_locale(locale);
    let counts = ResourceCounts::none()
        .with(ResourceKind::Allergy, 5)
        .with(ResourceKind::Medication, 5)
        .with(ResourceKind::Condition, 10)
        .with(ResourceKind::Immunization, 5)
        .with(ResourceKind::Procedure, 5)
        .with(ResourceKind::Observation, 10);
    let bundle = generate(locale, 300, &counts).await;

    for entry in bundle.clinical_entries() {
        let clinical = entry.resource.as_clinical().unwrap();
        let coding = clinical.code().primary().unwrap();
        assert!(
            tables
                .concepts(clinical.kind())
                .iter()
                .any(|concept| concept.matches(coding)),
            "{} {} is not in the {} table",
            coding.system,
            coding.code,
            clinical.kind()
        );
    }
}

#[tokio::test]
async fn test_same_seed_same_bundle() {
    let counts = ResourceCounts::default();
    let a = generate(Locale::ireland(), 42, &counts).await;
    let b = generate(Locale::ireland(), 42, &counts).await;

    assert_eq!(a, b);
    assert_eq!(a.to_json_pretty().unwrap(), b.to_json_pretty().unwrap());
}

#[tokio::test]
async fn test_different_seeds_differ() {
    let counts = ResourceCounts::default();
    let a = generate(Locale::base(), 1, &counts).await;
    let b = generate(Locale::base(), 2, &counts).await;
    assert_ne!(a.id, b.id);
}

#[tokio::test]
async fn test_irish_conditions_are_drawn() {
    let mut generators = ResourceGenerators::new(facts(Locale::ireland(), 500), Arc::new(NoopEnricher));
    let options = GenerationOptions::default();

    let mut seen = BTreeSet::new();
    for _ in 0..500 {
        let condition = generators
            .generate(ResourceKind::Condition, "patient-1", &options)
            .await
            .unwrap();
        seen.insert(condition.code().primary().unwrap().code.clone());
    }

    for concept in IRISH_CONDITIONS {
        assert!(seen.contains(concept.code), "{} never drawn", concept.display);
    }
}

#[tokio::test]
async fn test_base_locale_never_draws_irish_conditions() {
    let mut generators = ResourceGenerators::new(facts(Locale::base(), 501), Arc::new(NoopEnricher));
    let options = GenerationOptions::default();

    for _ in 0..200 {
        let condition = generators
            .generate(ResourceKind::Condition, "patient-1", &options)
            .await
            .unwrap();
        let code = &condition.code().primary().unwrap().code;
        assert!(!IRISH_CONDITIONS.iter().any(|c| c.code == code.as_str()));
    }
}

#[tokio::test]
async fn test_two_conditions_and_one_allergy() {
    let counts = ResourceCounts::none()
        .with(ResourceKind::Condition, 2)
        .with(ResourceKind::Allergy, 1);
    let bundle = generate(Locale::base(), 7, &counts).await;

    // header + patient + 2 conditions + 1 allergy
    assert_eq!(bundle.entry.len(), 5);
    let titles: Vec<&str> = bundle
        .composition()
        .unwrap()
        .section
        .iter()
        .map(|s| s.title.as_str())
        .collect();
    assert_eq!(titles, ["Allergies and Intolerances", "Problem List"]);
}

#[tokio::test]
async fn test_serialized_document_shape() {
    let bundle = generate(Locale::ireland(), 8, &ResourceCounts::default()).await;
    let json: serde_json::Value = serde_json::to_value(&bundle).unwrap();

    assert_eq!(json["resourceType"], "Bundle");
    assert_eq!(json["type"], "document");
    assert_eq!(
        json["meta"]["profile"][0],
        "http://hl7.org/fhir/uv/ips/StructureDefinition/Bundle-uv-ips"
    );
    assert_eq!(json["timestamp"], "2024-11-05T14:00:00Z");
    assert_eq!(json["entry"][0]["resource"]["resourceType"], "Composition");
    assert_eq!(json["entry"][1]["resource"]["resourceType"], "Patient");

    for entry in json["entry"].as_array().unwrap() {
        let id = entry["resource"]["id"].as_str().unwrap();
        assert!(id.parse::<ResourceId>().is_ok());
        assert_eq!(entry["fullUrl"], format!("urn:uuid:{id}"));
    }

    let patient = &json["entry"][1]["resource"];
    assert_eq!(patient["identifier"][0]["system"], "urn:oid:2.16.372.1.2.1.1");
    assert_eq!(patient["address"][0]["country"], "IE");
}
