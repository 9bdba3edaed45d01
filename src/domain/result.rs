//! Result type alias for Compendium

use super::errors::CompendiumError;

/// Result type alias for Compendium operations
///
/// # Examples
///
/// ```
/// use compendium::domain::result::Result;
/// use compendium::domain::errors::CompendiumError;
///
/// fn failing_function() -> Result<()> {
///     Err(CompendiumError::Other("nope".to_string()))
/// }
/// assert!(failing_function().is_err());
/// ```
pub type Result<T> = std::result::Result<T, CompendiumError>;
