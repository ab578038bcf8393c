//! Domain identifier types with validation
//!
//! Newtype wrappers keep resource identifiers and patient identifiers apart
//! and guarantee they are well-formed.

use super::errors::IpsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of a generated FHIR resource
///
/// Always a UUID so the bundle can address it as `urn:uuid:<id>`.
///
/// # Examples
///
/// ```
/// use ipsgen::domain::ids::ResourceId;
/// use std::str::FromStr;
///
/// let id = ResourceId::from_str("7d44b88c-4199-4bad-97dc-d78268e01398").unwrap();
/// assert_eq!(id.full_url(), "urn:uuid:7d44b88c-4199-4bad-97dc-d78268e01398");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(Uuid);

impl ResourceId {
    /// Wraps an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// The bundle `fullUrl` for this resource
    pub fn full_url(&self) -> String {
        format!("urn:uuid:{}", self.0)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResourceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| format!("Invalid resource id '{s}': {e}"))
    }
}

/// Identifier of the patient that owns every clinical record of a bundle
///
/// Any non-blank string is accepted so callers can attach records to a
/// patient they created themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatientId(String);

impl PatientId {
    /// Creates a new PatientId
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the identifier is blank.
    pub fn new(id: impl Into<String>) -> Result<Self, IpsError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(IpsError::Configuration(
                "patient identifier is required to generate dependent resources".to_string(),
            ));
        }
        Ok(Self(id))
    }

    /// Returns the patient id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The FHIR reference string pointing at this patient
    pub fn reference(&self) -> String {
        format!("Patient/{}", self.0)
    }
}

impl From<ResourceId> for PatientId {
    fn from(id: ResourceId) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PatientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
