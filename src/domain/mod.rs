//! Domain models and types for IPSGen.
//!
//! The domain layer provides:
//! - **Identifiers** ([`ResourceId`], [`PatientId`])
//! - **FHIR data types** ([`CodedConcept`], [`CodeableConcept`], [`Reference`], ...)
//! - **Resources** ([`Patient`], [`ClinicalResource`], [`Composition`], [`Bundle`])
//! - **Resource kinds** ([`ResourceKind`]) with their section metadata, and
//!   the per-kind [`ResourceCounts`] a bundle is generated with
//! - **Error types** ([`IpsError`], [`EnrichmentError`]) and the [`Result`] alias
//!
//! # Error Handling
//!
//! ```rust
//! use ipsgen::domain::{PatientId, Result};
//!
//! fn example() -> Result<()> {
//!     let patient = PatientId::new("patient-1")?;
//!     assert_eq!(patient.reference(), "Patient/patient-1");
//!     Ok(())
//! }
//! ```

pub mod bundle;
pub mod context;
pub mod counts;
pub mod datatypes;
pub mod errors;
pub mod ids;
pub mod kind;
pub mod resources;
pub mod result;

pub use bundle::{Bundle, BundleEntry, BundleType, IPS_BUNDLE_PROFILE};
pub use counts::ResourceCounts;
pub use datatypes::{
    Address, CodeableConcept, CodedConcept, Coding, ContactPoint, HumanName, Identifier, Meta,
    Quantity, Reference,
};
pub use errors::{EnrichmentError, IpsError};
pub use ids::{PatientId, ResourceId};
pub use kind::{ResourceKind, SectionSpec};
pub use resources::{
    AllergyCategory, AllergyIntolerance, AllergyReaction, ClinicalResource, Composition,
    CompositionSection, CompositionStatus, Condition, Criticality, Dosage, EventStatus, Gender,
    Immunization, MedicationStatement, MedicationStatus, Observation, ObservationComponent,
    ObservationStatus, Patient, Procedure, ReactionSeverity, ReferenceRange, Resource,
};
pub use result::Result;
