//! FortiOS response envelope.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// The JSON envelope wrapping every FortiOS REST response.
///
/// Only `results` carries endpoint data; the remaining fields describe the
/// request and the device that served it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse {
    /// HTTP method echoed by FortiOS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,
    /// Endpoint payload (array for table GETs, object for singletons and monitors)
    #[serde(default)]
    pub results: Value,
    /// VDOM that served the request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vdom: Option<String>,
    /// Resource path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Resource name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Action requested, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Primary key affected by a write
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mkey: Option<Value>,
    /// `success` or `error`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// HTTP status reported inside the body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    /// FortiOS internal error code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<i64>,
    /// CLI error text, when the CLI layer rejected the change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cli_error: Option<String>,
    /// Configuration revision after the request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    /// Whether the request changed the configuration revision
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_changed: Option<bool>,
    /// Device serial number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
    /// Firmware version (e.g. `v7.4.3`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Firmware build number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<u64>,
    /// Number of matching entries for paged table GETs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_count: Option<u64>,
    /// Total number of entries in the table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl ApiResponse {
    /// Returns true if FortiOS reported success.
    ///
    /// A missing `status` counts as success when the embedded HTTP status is
    /// absent or 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self.status.as_deref() {
            Some(status) => status.eq_ignore_ascii_case("success"),
            None => self.http_status.map_or(true, |code| (200..300).contains(&code)),
        }
    }

    /// Deserialize `results` into `T`.
    pub fn results_as<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_value(self.results.clone()).map_err(|err| {
            Error::ResponseParseError(format!(
                "Failed to decode results of {}: {err}",
                self.label()
            ))
        })
    }

    /// Deserialize the first entry of `results`.
    ///
    /// FortiOS returns a one-element array for a GET by key; singletons return
    /// an object directly, which is decoded as-is.
    pub fn first_result<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let entry = match &self.results {
            Value::Array(items) => items.first().cloned().ok_or_else(|| {
                Error::NotFound(format!("{} returned no results", self.label()))
            })?,
            other => other.clone(),
        };

        serde_json::from_value(entry).map_err(|err| {
            Error::ResponseParseError(format!(
                "Failed to decode entry of {}: {err}",
                self.label()
            ))
        })
    }

    /// Number of entries in `results` (1 for object results, 0 for null).
    #[must_use]
    pub fn result_count(&self) -> usize {
        match &self.results {
            Value::Array(items) => items.len(),
            Value::Null => 0,
            _ => 1,
        }
    }

    /// Returns the affected mkey as a string.
    #[must_use]
    pub fn mkey_str(&self) -> Option<String> {
        match self.mkey.as_ref()? {
            Value::String(value) => Some(value.clone()),
            Value::Number(value) => Some(value.to_string()),
            _ => None,
        }
    }

    fn label(&self) -> String {
        match (&self.path, &self.name) {
            (Some(path), Some(name)) => format!("{path}/{name}"),
            _ => "response".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope() -> ApiResponse {
        serde_json::from_value(json!({
            "http_method": "GET",
            "results": [{"name": "web", "subnet": "10.0.0.0 255.255.255.0"}],
            "vdom": "root",
            "path": "firewall",
            "name": "address",
            "status": "success",
            "http_status": 200,
            "serial": "FGVM01TM00000000",
            "version": "v7.4.3",
            "build": 2573
        }))
        .unwrap()
    }

    #[test]
    fn test_envelope_fields() {
        let response = envelope();
        assert!(response.is_success());
        assert_eq!(response.vdom.as_deref(), Some("root"));
        assert_eq!(response.build, Some(2573));
        assert_eq!(response.result_count(), 1);
    }

    #[test]
    fn test_first_result() {
        #[derive(Deserialize)]
        struct Address {
            name: String,
        }

        let address: Address = envelope().first_result().unwrap();
        assert_eq!(address.name, "web");
    }

    #[test]
    fn test_first_result_empty_array_is_not_found() {
        let mut response = envelope();
        response.results = json!([]);
        let err = response.first_result::<Value>().unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_results_as_reports_parse_error() {
        let err = envelope().results_as::<Vec<u32>>().unwrap_err();
        assert!(matches!(err, Error::ResponseParseError(msg) if msg.contains("firewall/address")));
    }

    #[test]
    fn test_error_status() {
        let response: ApiResponse = serde_json::from_value(json!({
            "status": "error",
            "http_status": 404,
            "error": -3
        }))
        .unwrap();
        assert!(!response.is_success());
        assert_eq!(response.error, Some(-3));
    }

    #[test]
    fn test_mkey_str() {
        let mut response = ApiResponse::default();
        assert_eq!(response.mkey_str(), None);
        response.mkey = Some(json!(12));
        assert_eq!(response.mkey_str().as_deref(), Some("12"));
        response.mkey = Some(json!("web"));
        assert_eq!(response.mkey_str().as_deref(), Some("web"));
    }
}
