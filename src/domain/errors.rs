//! Domain error types
//!
//! This module defines the error hierarchy for IPSGen. Generation either
//! succeeds with a complete bundle or fails with a single [`IpsError`];
//! [`EnrichmentError`] is recovered inside the generator layer and never
//! reaches callers of the composer.

use thiserror::Error;

/// Main IPSGen error type
#[derive(Debug, Error)]
pub enum IpsError {
    /// Configuration-related errors (empty code table, missing patient
    /// identifier, malformed counts, unknown locale, invalid settings)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A composed resource failed structural validation
    #[error("Invalid {resource_type} resource '{id}': {reason}")]
    InvalidResource {
        /// FHIR resource type of the offending resource
        resource_type: String,
        /// Identifier of the offending resource
        id: String,
        /// What was wrong with it
        reason: String,
    },

    /// Narrative enrichment errors
    #[error("Enrichment error: {0}")]
    Enrichment(#[from] EnrichmentError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Validation errors for documents read back from disk
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl IpsError {
    /// Builds an [`IpsError::InvalidResource`]
    pub fn invalid_resource(
        resource_type: impl Into<String>,
        id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        IpsError::InvalidResource {
            resource_type: resource_type.into(),
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error is a configuration problem (CLI exit code 2)
    pub fn is_configuration(&self) -> bool {
        matches!(self, IpsError::Configuration(_))
    }
}

/// Narrative enrichment transport errors
///
/// Errors that occur when talking to the text-generation service. They do not
/// expose the HTTP client's own error types.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    /// Endpoint, credential or deployment name is missing
    #[error("Enrichment service is not configured: {0}")]
    NotConfigured(String),

    /// Failed to reach the service
    #[error("Failed to connect to enrichment service: {0}")]
    ConnectionFailed(String),

    /// Credential rejected
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx other than authentication)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Response body could not be understood
    #[error("Invalid response from service: {0}")]
    InvalidResponse(String),
}

impl From<std::io::Error> for IpsError {
    fn from(err: std::io::Error) -> Self {
        IpsError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for IpsError {
    fn from(err: serde_json::Error) -> Self {
        IpsError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for IpsError {
    fn from(err: toml::de::Error) -> Self {
        IpsError::Configuration(format!("TOML parse error: {err}"))
    }
}
