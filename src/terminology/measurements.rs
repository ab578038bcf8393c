//! How each observation code is measured
//!
//! The code table says *what* was observed; a measurement profile says which
//! category and profile the observation belongs to and how its value is
//! drawn.

use super::tables::{LOINC, SNOMED};
use crate::domain::CodedConcept;

const OBSERVATION_CATEGORY: &str = "http://terminology.hl7.org/CodeSystem/observation-category";

pub const VITAL_SIGNS_CATEGORY: CodedConcept =
    CodedConcept::new(OBSERVATION_CATEGORY, "vital-signs", "Vital Signs");

pub const LABORATORY_CATEGORY: CodedConcept =
    CodedConcept::new(OBSERVATION_CATEGORY, "laboratory", "Laboratory");

pub const VITAL_SIGNS_PROFILE: &str = "http://hl7.org/fhir/StructureDefinition/vitalsigns";

pub const LABORATORY_PROFILE: &str =
    "http://hl7.org/fhir/uv/ips/StructureDefinition/Observation-results-laboratory-uv-ips";

/// A uniformly drawn quantity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantitySpec {
    pub low: f64,
    pub high: f64,
    /// Decimal places kept after drawing
    pub decimals: u32,
    pub unit: &'static str,
    pub ucum: &'static str,
    /// Normal range reported alongside the value
    pub reference_range: Option<(f64, f64)>,
}

/// How the observation's value is produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueSpec {
    Quantity(QuantitySpec),
    /// A panel of quantitative components (e.g. systolic + diastolic)
    Panel(&'static [(CodedConcept, QuantitySpec)]),
    /// A coded result drawn from a fixed answer list
    Coded(&'static [CodedConcept]),
}

/// Category, profile and value recipe for one observation code
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementProfile {
    pub code: &'static str,
    pub category: CodedConcept,
    pub profile: &'static str,
    /// Window of days before the reference instant the observation falls in
    pub recency_days: (i64, i64),
    pub value: ValueSpec,
}

const BLOOD_PRESSURE_COMPONENTS: &[(CodedConcept, QuantitySpec)] = &[
    (
        CodedConcept::new(LOINC, "8480-6", "Systolic blood pressure"),
        QuantitySpec {
            low: 110.0,
            high: 140.0,
            decimals: 0,
            unit: "mmHg",
            ucum: "mm[Hg]",
            reference_range: None,
        },
    ),
    (
        CodedConcept::new(LOINC, "8462-4", "Diastolic blood pressure"),
        QuantitySpec {
            low: 70.0,
            high: 90.0,
            decimals: 0,
            unit: "mmHg",
            ucum: "mm[Hg]",
            reference_range: None,
        },
    ),
];

const BLOOD_GROUPS: &[CodedConcept] = &[
    CodedConcept::new(SNOMED, "278149003", "Blood group A Rh(D) positive"),
    CodedConcept::new(SNOMED, "278152006", "Blood group A Rh(D) negative"),
    CodedConcept::new(SNOMED, "278150003", "Blood group AB Rh(D) positive"),
    CodedConcept::new(SNOMED, "278153001", "Blood group B Rh(D) negative"),
    CodedConcept::new(SNOMED, "278151004", "Blood group B Rh(D) positive"),
    CodedConcept::new(SNOMED, "278147001", "Blood group O Rh(D) positive"),
    CodedConcept::new(SNOMED, "278148006", "Blood group O Rh(D) negative"),
];

pub const MEASUREMENTS: &[MeasurementProfile] = &[
    MeasurementProfile {
        code: "85354-9",
        category: VITAL_SIGNS_CATEGORY,
        profile: VITAL_SIGNS_PROFILE,
        recency_days: (1, 90),
        value: ValueSpec::Panel(BLOOD_PRESSURE_COMPONENTS),
    },
    MeasurementProfile {
        code: "8867-4",
        category: VITAL_SIGNS_CATEGORY,
        profile: VITAL_SIGNS_PROFILE,
        recency_days: (1, 90),
        value: ValueSpec::Quantity(QuantitySpec {
            low: 55.0,
            high: 100.0,
            decimals: 0,
            unit: "beats/minute",
            ucum: "/min",
            reference_range: Some((60.0, 100.0)),
        }),
    },
    MeasurementProfile {
        code: "29463-7",
        category: VITAL_SIGNS_CATEGORY,
        profile: VITAL_SIGNS_PROFILE,
        recency_days: (1, 90),
        value: ValueSpec::Quantity(QuantitySpec {
            low: 50.0,
            high: 120.0,
            decimals: 1,
            unit: "kg",
            ucum: "kg",
            reference_range: None,
        }),
    },
    MeasurementProfile {
        code: "2339-0",
        category: LABORATORY_CATEGORY,
        profile: LABORATORY_PROFILE,
        recency_days: (1, 180),
        value: ValueSpec::Quantity(QuantitySpec {
            low: 70.0,
            high: 120.0,
            decimals: 1,
            unit: "mg/dL",
            ucum: "mg/dL",
            reference_range: Some((70.0, 99.0)),
        }),
    },
    MeasurementProfile {
        code: "718-7",
        category: LABORATORY_CATEGORY,
        profile: LABORATORY_PROFILE,
        recency_days: (1, 180),
        value: ValueSpec::Quantity(QuantitySpec {
            low: 11.0,
            high: 17.5,
            decimals: 1,
            unit: "g/dL",
            ucum: "g/dL",
            reference_range: Some((12.0, 17.5)),
        }),
    },
    MeasurementProfile {
        code: "882-1",
        category: LABORATORY_CATEGORY,
        profile: LABORATORY_PROFILE,
        recency_days: (1, 180),
        value: ValueSpec::Coded(BLOOD_GROUPS),
    },
];

/// Looks up the measurement profile for an observation code
pub fn profile_for(code: &str) -> Option<&'static MeasurementProfile> {
    MEASUREMENTS.iter().find(|m| m.code == code)
}
