//! The IPS document bundle

use super::datatypes::{Identifier, Meta};
use super::ids::ResourceId;
use super::resources::{Composition, Patient, Resource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Profile every generated bundle declares
pub const IPS_BUNDLE_PROFILE: &str = "http://hl7.org/fhir/uv/ips/StructureDefinition/Bundle-uv-ips";

/// Bundle.type; IPSGen only ever emits documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleType {
    Document,
}

/// A `{fullUrl, resource}` pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    pub full_url: String,
    pub resource: Resource,
}

impl BundleEntry {
    /// Wraps a resource, addressing it by `urn:uuid:<id>`
    pub fn new(resource: Resource) -> Self {
        Self {
            full_url: resource.id().full_url(),
            resource,
        }
    }
}

/// The aggregate document: header, patient, then clinical resources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "resourceType", rename = "Bundle")]
pub struct Bundle {
    pub id: ResourceId,
    pub meta: Meta,
    pub identifier: Identifier,
    #[serde(rename = "type")]
    pub bundle_type: BundleType,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub entry: Vec<BundleEntry>,
}

impl Bundle {
    /// The document header (entry 0), if present
    pub fn composition(&self) -> Option<&Composition> {
        match self.entry.first().map(|e| &e.resource) {
            Some(Resource::Composition(composition)) => Some(composition),
            _ => None,
        }
    }

    /// The subject (entry 1), if present
    pub fn patient(&self) -> Option<&Patient> {
        match self.entry.get(1).map(|e| &e.resource) {
            Some(Resource::Patient(patient)) => Some(patient),
            _ => None,
        }
    }

    /// Entries after the header and patient
    pub fn clinical_entries(&self) -> impl Iterator<Item = &BundleEntry> {
        self.entry.iter().skip(2)
    }

    /// Serializes to pretty-printed FHIR JSON
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
