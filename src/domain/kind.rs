//! Clinical resource kinds and their IPS document metadata

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The clinical resource kinds a bundle can carry
///
/// Declaration order is the fixed generation order: entries and header
/// sections always appear in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Allergy,
    Medication,
    Condition,
    Immunization,
    Procedure,
    Observation,
}

/// Static section metadata for the Composition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpec {
    /// Human readable section title
    pub title: &'static str,
    /// LOINC section code
    pub code: &'static str,
    /// LOINC display for the section code
    pub display: &'static str,
}

impl ResourceKind {
    /// All kinds in generation order
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Allergy,
        ResourceKind::Medication,
        ResourceKind::Condition,
        ResourceKind::Immunization,
        ResourceKind::Procedure,
        ResourceKind::Observation,
    ];

    /// The FHIR `resourceType` used for this kind
    pub fn resource_type(&self) -> &'static str {
        match self {
            ResourceKind::Allergy => "AllergyIntolerance",
            ResourceKind::Medication => "MedicationStatement",
            ResourceKind::Condition => "Condition",
            ResourceKind::Immunization => "Immunization",
            ResourceKind::Procedure => "Procedure",
            ResourceKind::Observation => "Observation",
        }
    }

    /// Maps a FHIR `resourceType` back to a kind
    pub fn from_resource_type(resource_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.resource_type() == resource_type)
    }

    /// The plural name used for counts (`allergies`, `medications`, ...)
    pub fn plural(&self) -> &'static str {
        match self {
            ResourceKind::Allergy => "allergies",
            ResourceKind::Medication => "medications",
            ResourceKind::Condition => "conditions",
            ResourceKind::Immunization => "immunizations",
            ResourceKind::Procedure => "procedures",
            ResourceKind::Observation => "observations",
        }
    }

    /// IPS profile declared in `meta.profile`
    ///
    /// Observations pick their profile from the measurement table instead.
    pub fn profile(&self) -> &'static str {
        match self {
            ResourceKind::Allergy => {
                "http://hl7.org/fhir/uv/ips/StructureDefinition/AllergyIntolerance-uv-ips"
            }
            ResourceKind::Medication => {
                "http://hl7.org/fhir/uv/ips/StructureDefinition/MedicationStatement-uv-ips"
            }
            ResourceKind::Condition => {
                "http://hl7.org/fhir/uv/ips/StructureDefinition/Condition-uv-ips"
            }
            ResourceKind::Immunization => {
                "http://hl7.org/fhir/uv/ips/StructureDefinition/Immunization-uv-ips"
            }
            ResourceKind::Procedure => {
                "http://hl7.org/fhir/uv/ips/StructureDefinition/Procedure-uv-ips"
            }
            ResourceKind::Observation => {
                "http://hl7.org/fhir/uv/ips/StructureDefinition/Observation-results-laboratory-uv-ips"
            }
        }
    }

    /// Composition section for this kind
    pub fn section(&self) -> SectionSpec {
        match self {
            ResourceKind::Allergy => SectionSpec {
                title: "Allergies and Intolerances",
                code: "48765-2",
                display: "Allergies and adverse reactions Document",
            },
            ResourceKind::Medication => SectionSpec {
                title: "Medication Summary",
                code: "10160-0",
                display: "History of Medication use Narrative",
            },
            ResourceKind::Condition => SectionSpec {
                title: "Problem List",
                code: "11450-4",
                display: "Problem list - Reported",
            },
            ResourceKind::Immunization => SectionSpec {
                title: "History of Immunizations",
                code: "11369-6",
                display: "History of Immunization Narrative",
            },
            ResourceKind::Procedure => SectionSpec {
                title: "History of Procedures",
                code: "47519-4",
                display: "History of Procedures Document",
            },
            ResourceKind::Observation => SectionSpec {
                title: "Results",
                code: "30954-2",
                display: "Relevant diagnostic tests/laboratory data Narrative",
            },
        }
    }

    /// Maps a section LOINC code back to its kind
    pub fn from_section_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.section().code == code)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource_type())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    /// Accepts the singular, plural or FHIR resource type name, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| {
                let singular = format!("{kind:?}").to_lowercase();
                wanted == singular
                    || wanted == kind.plural()
                    || wanted == kind.resource_type().to_lowercase()
            })
            .ok_or_else(|| format!("Unknown resource kind '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_order() {
        assert_eq!(ResourceKind::ALL[0], ResourceKind::Allergy);
        assert_eq!(ResourceKind::ALL[5], ResourceKind::Observation);
        let mut sorted = ResourceKind::ALL;
        sorted.sort();
        assert_eq!(sorted, ResourceKind::ALL);
    }

    #[test]
    fn test_resource_type_round_trip() {
        for kind in ResourceKind::ALL {
            assert_eq!(ResourceKind::from_resource_type(kind.resource_type()), Some(kind));
            assert_eq!(ResourceKind::from_section_code(kind.section().code), Some(kind));
        }
        assert_eq!(ResourceKind::from_resource_type("Patient"), None);
    }

    #[test]
    fn test_from_str_accepts_aliases() {
        assert_eq!("allergy".parse::<ResourceKind>().unwrap(), ResourceKind::Allergy);
        assert_eq!("Allergies".parse::<ResourceKind>().unwrap(), ResourceKind::Allergy);
        assert_eq!(
            "MedicationStatement".parse::<ResourceKind>().unwrap(),
            ResourceKind::Medication
        );
        assert!("devices".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_section_codes_are_unique() {
        let mut codes: Vec<_> = ResourceKind::ALL.iter().map(|k| k.section().code).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), ResourceKind::ALL.len());
    }
}
