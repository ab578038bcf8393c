//! Static code tables
//!
//! Base tables apply to every locale; locale descriptors may contribute
//! additional concepts per kind.

use crate::domain::CodedConcept;

pub const SNOMED: &str = "http://snomed.info/sct";
pub const RXNORM: &str = "http://www.nlm.nih.gov/research/umls/rxnorm";
pub const CVX: &str = "http://hl7.org/fhir/sid/cvx";
pub const LOINC: &str = "http://loinc.org";

pub const ALLERGIES: &[CodedConcept] = &[
    CodedConcept::new(SNOMED, "227493005", "Cashew nuts"),
    CodedConcept::new(SNOMED, "300916003", "Latex allergy"),
    CodedConcept::new(SNOMED, "91935009", "Allergy to peanuts"),
    CodedConcept::new(SNOMED, "293586001", "Allergy to penicillin"),
    CodedConcept::new(SNOMED, "419199007", "Allergy to substance"),
];

pub const MEDICATIONS: &[CodedConcept] = &[
    CodedConcept::new(RXNORM, "318272", "Metformin 500mg"),
    CodedConcept::new(RXNORM, "197361", "Lisinopril 10mg"),
    CodedConcept::new(RXNORM, "1049221", "Atorvastatin 20mg"),
    CodedConcept::new(RXNORM, "855332", "Levothyroxine 50mcg"),
    CodedConcept::new(RXNORM, "309362", "Omeprazole 20mg"),
];

pub const CONDITIONS: &[CodedConcept] = &[
    CodedConcept::new(SNOMED, "44054006", "Type 2 Diabetes Mellitus"),
    CodedConcept::new(SNOMED, "38341003", "Hypertension"),
    CodedConcept::new(SNOMED, "13644009", "Hypercholesterolemia"),
    CodedConcept::new(SNOMED, "195967001", "Asthma"),
    CodedConcept::new(SNOMED, "40055000", "Chronic sinusitis"),
];

/// Conditions common in the Irish population
pub const IRISH_CONDITIONS: &[CodedConcept] = &[
    CodedConcept::new(SNOMED, "13645005", "Chronic obstructive pulmonary disease"),
    CodedConcept::new(SNOMED, "49601007", "Cardiovascular disease"),
    CodedConcept::new(SNOMED, "363406005", "Colon cancer"),
    CodedConcept::new(SNOMED, "74400008", "Appendicitis"),
];

pub const IMMUNIZATIONS: &[CodedConcept] = &[
    CodedConcept::new(CVX, "207", "COVID-19 vaccine"),
    CodedConcept::new(CVX, "141", "Influenza vaccine"),
    CodedConcept::new(CVX, "113", "Td (adult) vaccine"),
    CodedConcept::new(CVX, "133", "Pneumococcal conjugate vaccine"),
    CodedConcept::new(CVX, "121", "Zoster vaccine"),
];

pub const PROCEDURES: &[CodedConcept] = &[
    CodedConcept::new(SNOMED, "80146002", "Appendectomy"),
    CodedConcept::new(SNOMED, "265764009", "Renal dialysis"),
    CodedConcept::new(SNOMED, "71388002", "Procedure"),
    CodedConcept::new(SNOMED, "86198006", "Cesarean section"),
    CodedConcept::new(SNOMED, "232717009", "Coronary artery bypass grafting"),
];

pub const OBSERVATIONS: &[CodedConcept] = &[
    CodedConcept::new(LOINC, "85354-9", "Blood pressure panel"),
    CodedConcept::new(LOINC, "8867-4", "Heart rate"),
    CodedConcept::new(LOINC, "29463-7", "Body weight"),
    CodedConcept::new(LOINC, "2339-0", "Glucose [Mass/volume] in Blood"),
    CodedConcept::new(LOINC, "718-7", "Hemoglobin [Mass/volume] in Blood"),
    CodedConcept::new(LOINC, "882-1", "ABO and Rh group [Type] in Blood"),
];

pub const REACTION_MANIFESTATIONS: &[CodedConcept] = &[
    CodedConcept::new(SNOMED, "126485001", "Urticaria"),
    CodedConcept::new(SNOMED, "271807003", "Eruption of skin"),
    CodedConcept::new(SNOMED, "39579001", "Anaphylaxis"),
    CodedConcept::new(SNOMED, "267036007", "Dyspnea"),
    CodedConcept::new(SNOMED, "422587007", "Nausea"),
];

pub const MEDICATION_ROUTES: &[CodedConcept] = &[
    CodedConcept::new(SNOMED, "26643006", "Oral route"),
    CodedConcept::new(SNOMED, "34206005", "Subcutaneous route"),
    CodedConcept::new(SNOMED, "78421000", "Intramuscular route"),
    CodedConcept::new(SNOMED, "6064005", "Topical route"),
];

pub const DOSAGE_INSTRUCTIONS: &[&str] = &[
    "1 tablet once daily",
    "1 tablet twice daily",
    "2 tablets once daily with food",
    "1 tablet every morning before breakfast",
    "1 capsule at night",
];

pub const CONDITION_SEVERITIES: &[CodedConcept] = &[
    CodedConcept::new(SNOMED, "255604002", "Mild"),
    CodedConcept::new(SNOMED, "6736007", "Moderate"),
    CodedConcept::new(SNOMED, "24484000", "Severe"),
];

pub const ALLERGY_CLINICAL_ACTIVE: CodedConcept = CodedConcept::new(
    "http://terminology.hl7.org/CodeSystem/allergyintolerance-clinical",
    "active",
    "Active",
);

pub const ALLERGY_VERIFICATION_CONFIRMED: CodedConcept = CodedConcept::new(
    "http://terminology.hl7.org/CodeSystem/allergyintolerance-verification",
    "confirmed",
    "Confirmed",
);

pub const CONDITION_CLINICAL_ACTIVE: CodedConcept = CodedConcept::new(
    "http://terminology.hl7.org/CodeSystem/condition-clinical",
    "active",
    "Active",
);

pub const CONDITION_VERIFICATION_CONFIRMED: CodedConcept = CodedConcept::new(
    "http://terminology.hl7.org/CodeSystem/condition-ver-status",
    "confirmed",
    "Confirmed",
);

pub const CONDITION_PROBLEM_LIST_ITEM: CodedConcept = CodedConcept::new(
    "http://terminology.hl7.org/CodeSystem/condition-category",
    "problem-list-item",
    "Problem List Item",
);

pub const PATIENT_SUMMARY_DOCUMENT: CodedConcept =
    CodedConcept::new(LOINC, "60591-5", "Patient summary Document");
