//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers that flow through an export. Keeping
//! tenant names and definition IDs as distinct types prevents handing one to
//! an API expecting the other.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Definition identifier newtype wrapper
///
/// Globally unique key of a definition. The value is opaque to the export
/// pipeline: it is compared, hashed and echoed, never parsed.
///
/// # Examples
///
/// ```
/// use compendium::domain::ids::DefinitionId;
/// use std::str::FromStr;
///
/// let id = DefinitionId::from_str("a1b2c3d4-0000-4000-8000-000000000001").unwrap();
/// assert_eq!(id.as_str(), "a1b2c3d4-0000-4000-8000-000000000001");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DefinitionId(String);

impl DefinitionId {
    /// Creates a new DefinitionId from a string
    ///
    /// # Errors
    ///
    /// Returns `Err` if the ID is empty or only whitespace
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Definition ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the definition ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Whether the ID can be used verbatim as a file stem
    ///
    /// File-backed stores key their files by ID, so anything that could
    /// escape the store directory is rejected.
    pub fn is_path_safe(&self) -> bool {
        self.0 != "."
            && self.0 != ".."
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    }
}

impl fmt::Display for DefinitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DefinitionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for DefinitionId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DefinitionId> for String {
    fn from(id: DefinitionId) -> Self {
        id.0
    }
}

impl AsRef<str> for DefinitionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Tenant identifier newtype wrapper
///
/// Names the data scope a request is bound to. Tenant names are restricted
/// to ASCII letters, digits, `-` and `_`.
///
/// # Examples
///
/// ```
/// use compendium::domain::ids::TenantId;
///
/// let tenant = TenantId::new("acme_corp").unwrap();
/// assert_eq!(tenant.as_str(), "acme_corp");
/// assert!(TenantId::new("../etc").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(String);

impl TenantId {
    /// Creates a new TenantId from a string
    ///
    /// # Errors
    ///
    /// Returns `Err` if the name is empty or contains characters outside
    /// `[A-Za-z0-9_-]`
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.is_empty() {
            return Err("Tenant ID cannot be empty".to_string());
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(format!(
                "Invalid tenant ID '{id}'. Only ASCII letters, digits, '-' and '_' are allowed"
            ));
        }
        Ok(Self(id))
    }

    /// Returns the tenant ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TenantId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
