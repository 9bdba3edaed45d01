//! Inbound export request
//!
//! The request as handed over by the transport layer: the tenant it targets,
//! the raw `download` parameter and a correlation ID for logging.

use super::errors::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// An export-all request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRequest {
    /// Correlation ID, generated when not supplied by the transport
    #[serde(default = "Uuid::new_v4")]
    pub request_id: Uuid,

    /// Tenant name as received; validated by the tenant context provider
    pub tenant: String,

    /// Raw `download` parameter, validated by [`DownloadFlag::parse`]
    #[serde(default)]
    pub download: Option<Value>,
}

impl ExportRequest {
    /// Creates a request for a tenant without a `download` parameter
    pub fn new(tenant: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            tenant: tenant.into(),
            download: None,
        }
    }

    /// Sets the raw `download` parameter
    pub fn with_download(mut self, download: Value) -> Self {
        self.download = Some(download);
        self
    }
}

/// Validated `download` parameter
///
/// Only influences how the response is framed, never its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DownloadFlag(Option<i64>);

impl DownloadFlag {
    /// Validates a raw `download` value
    ///
    /// Absent and `null` values mean "not set". Integers are accepted as
    /// numbers (including integral floats such as `1.0`) or numeric strings.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidParameter`] for anything that is not
    /// an integer.
    ///
    /// # Examples
    ///
    /// ```
    /// use compendium::domain::request::DownloadFlag;
    /// use serde_json::json;
    ///
    /// assert!(DownloadFlag::parse(Some(&json!(1))).unwrap().is_requested());
    /// assert!(!DownloadFlag::parse(None).unwrap().is_requested());
    /// assert!(DownloadFlag::parse(Some(&json!(1.5))).is_err());
    /// ```
    pub fn parse(raw: Option<&Value>) -> Result<Self, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidParameter {
            name: "download".to_string(),
            reason: reason.to_string(),
        };

        match raw {
            None | Some(Value::Null) => Ok(Self(None)),
            Some(Value::Number(n)) => {
                if let Some(i) = n.as_i64() {
                    return Ok(Self(Some(i)));
                }
                match n.as_f64() {
                    Some(f)
                        if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 =>
                    {
                        Ok(Self(Some(f as i64)))
                    }
                    _ => Err(invalid("must be an integer")),
                }
            }
            Some(Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map(|i| Self(Some(i)))
                .map_err(|_| invalid("must be an integer")),
            Some(_) => Err(invalid("must be a number")),
        }
    }

    /// The validated integer, if one was supplied
    pub fn value(&self) -> Option<i64> {
        self.0
    }

    /// Whether the caller asked for the export as a file download
    pub fn is_requested(&self) -> bool {
        matches!(self.0, Some(v) if v != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(json!(1), Some(1) ; "integer")]
    #[test_case(json!(0), Some(0) ; "zero")]
    #[test_case(json!(-3), Some(-3) ; "negative")]
    #[test_case(json!(2.0), Some(2) ; "integral float")]
    #[test_case(json!("7"), Some(7) ; "numeric string")]
    #[test_case(Value::Null, None ; "null")]
    fn test_download_flag_accepts(raw: Value, expected: Option<i64>) {
        let flag = DownloadFlag::parse(Some(&raw)).unwrap();
        assert_eq!(flag.value(), expected);
    }

    #[test_case(json!(1.5) ; "fractional")]
    #[test_case(json!("1.5") ; "fractional string")]
    #[test_case(json!("yes") ; "word")]
    #[test_case(json!(true) ; "boolean")]
    #[test_case(json!([1]) ; "array")]
    fn test_download_flag_rejects(raw: Value) {
        let err = DownloadFlag::parse(Some(&raw)).unwrap_err();
        assert!(err.to_string().contains("download"));
    }

    #[test]
    fn test_download_flag_requested() {
        assert!(!DownloadFlag::parse(None).unwrap().is_requested());
        assert!(!DownloadFlag::parse(Some(&json!(0))).unwrap().is_requested());
        assert!(DownloadFlag::parse(Some(&json!(1))).unwrap().is_requested());
    }

    #[test]
    fn test_export_request_deserialize_defaults() {
        let request: ExportRequest = serde_json::from_str(r#"{"tenant": "acme"}"#).unwrap();
        assert_eq!(request.tenant, "acme");
        assert!(request.download.is_none());
    }
}
