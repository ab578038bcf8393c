//! Logging and observability
//!
//! Structured logging via `tracing`: a console layer on stderr and an
//! optional JSON file layer with rotation, plus a few macros that keep the
//! field names of recurring events consistent.
//!
//! # Example
//!
//! ```no_run
//! use ipsgen::logging::init_logging;
//! use ipsgen::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(locale = "en_IE", "Generating bundle");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a bundle generation
///
/// # Example
///
/// ```no_run
/// use ipsgen::log_generation_start;
/// use ipsgen::domain::ResourceCounts;
///
/// log_generation_start!("en_IE", ResourceCounts::default(), false);
/// ```
#[macro_export]
macro_rules! log_generation_start {
    ($locale:expr, $counts:expr, $enrichment:expr) => {
        tracing::info!(
            locale = %$locale,
            counts = %$counts,
            enrichment = $enrichment,
            "Starting bundle generation"
        );
    };
}

/// Log the completion of a bundle
///
/// # Example
///
/// ```no_run
/// use ipsgen::log_bundle_complete;
/// use std::time::Duration;
///
/// log_bundle_complete!("0b0c4a4e-1111-4222-8333-444455556666", 15, Duration::from_millis(12));
/// ```
#[macro_export]
macro_rules! log_bundle_complete {
    ($bundle_id:expr, $entries:expr, $duration:expr) => {
        tracing::info!(
            bundle_id = %$bundle_id,
            entries = $entries,
            duration_ms = $duration.as_millis() as u64,
            "Bundle generated"
        );
    };
}

/// Log a narrative request that failed; the caller falls back to the
/// display text
///
/// # Example
///
/// ```no_run
/// use ipsgen::log_enrichment_fallback;
///
/// log_enrichment_fallback!("azure-openai", "Request timeout: 30s");
/// ```
#[macro_export]
macro_rules! log_enrichment_fallback {
    ($service:expr, $reason:expr) => {
        tracing::warn!(
            service = %$service,
            reason = %$reason,
            "Narrative enrichment failed, using display text"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use ipsgen::log_error_with_context;
/// use ipsgen::domain::IpsError;
///
/// let error = IpsError::Configuration("Unknown locale".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
