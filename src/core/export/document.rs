//! Export document
//!
//! The versioned bundle returned to the caller. Field names on the wire are
//! fixed: `abVersion`, `date` and `definitions`.

use crate::domain::Definition;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Export schema version written into every document
pub const FORMAT_VERSION: &str = "0.0.0";

/// A complete, deduplicated export
///
/// # Examples
///
/// ```
/// use compendium::core::export::ExportDocument;
/// use chrono::NaiveDate;
///
/// let doc = ExportDocument::new(Vec::new(), NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
/// let json = serde_json::to_value(&doc).unwrap();
/// assert_eq!(json["abVersion"], "0.0.0");
/// assert_eq!(json["date"], "20240309");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    /// Export schema version
    #[serde(rename = "abVersion")]
    pub format_version: String,

    /// Day the export was produced
    #[serde(rename = "date", with = "compact_date")]
    pub generated_at: NaiveDate,

    /// Definitions in first-reference order, one per ID
    pub definitions: Vec<Definition>,
}

impl ExportDocument {
    /// Wrap definitions with the current format version and the given date
    pub fn new(definitions: Vec<Definition>, generated_at: NaiveDate) -> Self {
        Self {
            format_version: FORMAT_VERSION.to_string(),
            generated_at,
            definitions,
        }
    }

    /// Wrap definitions, dated today in local time
    pub fn dated_today(definitions: Vec<Definition>) -> Self {
        Self::new(definitions, Local::now().date_naive())
    }

    /// Number of definitions in the document
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the document holds no definitions
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// `YYYYMMDD` date encoding
mod compact_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y%m%d";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}
