//! Result type alias for IPSGen

use super::errors::IpsError;

/// Result type alias for IPSGen operations
///
/// # Examples
///
/// ```
/// use ipsgen::domain::result::Result;
/// use ipsgen::domain::errors::IpsError;
///
/// fn failing_function() -> Result<()> {
///     Err(IpsError::Configuration("empty code table".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, IpsError>;
