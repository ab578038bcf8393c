//! FHIR R4 data types used by the generated resources
//!
//! Only the subset of each data type that IPSGen populates is modeled.
//! Field names serialize in FHIR camelCase.

use serde::{Deserialize, Serialize};

/// A coded concept template from a terminology table
///
/// `system` + `code` identify the concept, `display` is its human readable
/// label. Narrative text is attached later on the [`CodeableConcept`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CodedConcept {
    pub system: &'static str,
    pub code: &'static str,
    pub display: &'static str,
}

impl CodedConcept {
    /// Creates a concept template
    pub const fn new(system: &'static str, code: &'static str, display: &'static str) -> Self {
        Self {
            system,
            code,
            display,
        }
    }

    /// Whether a serialized coding carries exactly this triple
    pub fn matches(&self, coding: &Coding) -> bool {
        coding.system == self.system && coding.code == self.code && coding.display == self.display
    }
}

/// Resource metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub profile: Vec<String>,
}

impl Meta {
    /// Metadata declaring a single profile
    pub fn profile(profile: impl Into<String>) -> Self {
        Self {
            profile: vec![profile.into()],
        }
    }
}

/// A `{system, code, display}` triple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coding {
    pub system: String,
    pub code: String,
    pub display: String,
}

impl From<&CodedConcept> for Coding {
    fn from(concept: &CodedConcept) -> Self {
        Self {
            system: concept.system.to_string(),
            code: concept.code.to_string(),
            display: concept.display.to_string(),
        }
    }
}

/// One or more codings plus optional free text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeableConcept {
    #[serde(default)]
    pub coding: Vec<Coding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl CodeableConcept {
    /// A single-coding concept without text
    pub fn coded(concept: &CodedConcept) -> Self {
        Self {
            coding: vec![Coding::from(concept)],
            text: None,
        }
    }

    /// A single-coding concept from loose parts
    pub fn from_parts(system: &str, code: &str, display: &str) -> Self {
        Self {
            coding: vec![Coding {
                system: system.to_string(),
                code: code.to_string(),
                display: display.to_string(),
            }],
            text: None,
        }
    }

    /// Sets the free text
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// The first coding, if any
    pub fn primary(&self) -> Option<&Coding> {
        self.coding.first()
    }
}

/// A literal reference to another resource (`ResourceType/id`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub reference: String,
}

impl Reference {
    /// Reference to a resource of the given type
    pub fn to(resource_type: &str, id: impl std::fmt::Display) -> Self {
        Self {
            reference: format!("{resource_type}/{id}"),
        }
    }

    /// Splits the reference into `(resource_type, id)`
    pub fn target(&self) -> Option<(&str, &str)> {
        self.reference
            .split_once('/')
            .filter(|(kind, id)| !kind.is_empty() && !id.is_empty())
    }
}

/// A measured amount with a UCUM unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: String,
    pub system: String,
    pub code: String,
}

impl Quantity {
    /// UCUM quantity
    pub fn ucum(value: f64, unit: &str, code: &str) -> Self {
        Self {
            value,
            unit: unit.to_string(),
            system: "http://unitsofmeasure.org".to_string(),
            code: code.to_string(),
        }
    }
}

/// A business identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub system: String,
    pub value: String,
}

/// A person's name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanName {
    #[serde(rename = "use")]
    pub name_use: String,
    pub family: String,
    #[serde(default)]
    pub given: Vec<String>,
}

/// A postal address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(rename = "use")]
    pub address_use: String,
    #[serde(default)]
    pub line: Vec<String>,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
}

/// A phone number, email address, etc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPoint {
    pub system: String,
    pub value: String,
    #[serde(rename = "use")]
    pub contact_use: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ASTHMA: CodedConcept = CodedConcept::new("http://snomed.info/sct", "195967001", "Asthma");

    #[test]
    fn test_codeable_concept_serializes_triple_and_text() {
        let concept = CodeableConcept::coded(&ASTHMA).with_text("Asthma");
        let value = serde_json::to_value(&concept).unwrap();
        assert_eq!(
            value,
            json!({
                "coding": [{"system": "http://snomed.info/sct", "code": "195967001", "display": "Asthma"}],
                "text": "Asthma"
            })
        );
    }

    #[test]
    fn test_text_omitted_when_absent() {
        let value = serde_json::to_value(CodeableConcept::coded(&ASTHMA)).unwrap();
        assert!(value.get("text").is_none());
    }

    #[test]
    fn test_concept_matches_coding() {
        let coding = Coding::from(&ASTHMA);
        assert!(ASTHMA.matches(&coding));
        let other = Coding {
            display: "Wheeze".to_string(),
            ..coding
        };
        assert!(!ASTHMA.matches(&other));
    }

    #[test]
    fn test_reference_target() {
        let reference = Reference::to("Patient", "abc");
        assert_eq!(reference.reference, "Patient/abc");
        assert_eq!(reference.target(), Some(("Patient", "abc")));
        let broken = Reference {
            reference: "Patient/".to_string(),
        };
        assert_eq!(broken.target(), None);
    }

    #[test]
    fn test_address_uses_fhir_field_names() {
        let address = Address {
            address_use: "home".to_string(),
            line: vec!["1 Main Street".to_string()],
            city: "Cork".to_string(),
            state: Some("Cork".to_string()),
            postal_code: "T12 X2Y3".to_string(),
            country: "IE".to_string(),
        };
        let value = serde_json::to_value(&address).unwrap();
        assert_eq!(value["use"], "home");
        assert_eq!(value["postalCode"], "T12 X2Y3");
    }
}
