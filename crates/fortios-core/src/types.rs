//! Core FortiOS request types.
//!
//! This module provides the API family enumeration and the transport-neutral
//! request description handed to an [`ApiTransport`](crate::client::ApiTransport).

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Version segment of every FortiOS REST URL.
pub const API_VERSION: &str = "v2";

/// FortiOS REST API families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiFamily {
    /// Configuration database
    Cmdb,
    /// Runtime monitoring and actions
    Monitor,
    /// Log retrieval
    Log,
    /// Service endpoints (e.g. sniffer, security rating)
    Service,
}

impl ApiFamily {
    /// Returns the URL segment for this family.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Cmdb => "cmdb",
            Self::Monitor => "monitor",
            Self::Log => "log",
            Self::Service => "service",
        }
    }

    /// Returns all API families.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Cmdb, Self::Monitor, Self::Log, Self::Service]
    }
}

impl FromStr for ApiFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "cmdb" => Ok(Self::Cmdb),
            "monitor" => Ok(Self::Monitor),
            "log" => Ok(Self::Log),
            "service" => Ok(Self::Service),
            _ => Err(Error::InvalidRequest(format!("Unknown API family: {s}"))),
        }
    }
}

impl std::fmt::Display for ApiFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single request against the FortiOS REST API.
///
/// `path` is the resource path below the family (`firewall/address`,
/// `firewall.service/custom`). The optional `mkey` is sent as one
/// percent-encoded path segment.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// API family
    pub family: ApiFamily,
    /// Resource path below the family
    pub path: String,
    /// Primary key of the addressed entry
    pub mkey: Option<String>,
    /// Query string pairs
    pub params: Vec<(&'static str, String)>,
    /// JSON body
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Create a request with the given method.
    #[must_use]
    pub fn new(method: Method, family: ApiFamily, path: impl Into<String>) -> Self {
        Self {
            method,
            family,
            path: path.into(),
            mkey: None,
            params: Vec::new(),
            body: None,
        }
    }

    /// Create a GET request.
    #[must_use]
    pub fn get(family: ApiFamily, path: impl Into<String>) -> Self {
        Self::new(Method::GET, family, path)
    }

    /// Create a POST request.
    #[must_use]
    pub fn post(family: ApiFamily, path: impl Into<String>) -> Self {
        Self::new(Method::POST, family, path)
    }

    /// Create a PUT request.
    #[must_use]
    pub fn put(family: ApiFamily, path: impl Into<String>) -> Self {
        Self::new(Method::PUT, family, path)
    }

    /// Create a DELETE request.
    #[must_use]
    pub fn delete(family: ApiFamily, path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, family, path)
    }

    /// Address a specific entry.
    #[must_use]
    pub fn with_mkey(mut self, mkey: impl Into<String>) -> Self {
        self.mkey = Some(mkey.into());
        self
    }

    /// Append query parameters.
    #[must_use]
    pub fn with_params(mut self, params: Vec<(&'static str, String)>) -> Self {
        self.params.extend(params);
        self
    }

    /// Append a single query parameter.
    #[must_use]
    pub fn with_param(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.params.push((key, value.into()));
        self
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Returns the value of a query parameter, if present.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true when retrying the request cannot duplicate a side effect.
    #[must_use]
    pub fn is_idempotent(&self) -> bool {
        self.method == Method::GET || self.method == Method::PUT || self.method == Method::DELETE
    }

    /// Human readable `path/mkey` label used in logs and error messages.
    #[must_use]
    pub fn resource_label(&self) -> String {
        match &self.mkey {
            Some(mkey) => format!("{}/{}/{mkey}", self.family, self.path),
            None => format!("{}/{}", self.family, self.path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_family_names() {
        assert_eq!(ApiFamily::Cmdb.name(), "cmdb");
        assert_eq!(ApiFamily::Monitor.to_string(), "monitor");
        assert_eq!(ApiFamily::all().len(), 4);
    }

    #[test]
    fn test_family_from_str() {
        assert_eq!("CMDB".parse::<ApiFamily>().unwrap(), ApiFamily::Cmdb);
        assert_eq!("log".parse::<ApiFamily>().unwrap(), ApiFamily::Log);
        assert!(matches!(
            "unknown".parse::<ApiFamily>(),
            Err(Error::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_request_builder() {
        let request = ApiRequest::put(ApiFamily::Cmdb, "firewall/policy")
            .with_mkey("7")
            .with_param("action", "move")
            .with_param("before", "3")
            .with_body(json!({"name": "x"}));

        assert_eq!(request.method, Method::PUT);
        assert_eq!(request.mkey.as_deref(), Some("7"));
        assert_eq!(request.param("before"), Some("3"));
        assert_eq!(request.param("after"), None);
        assert_eq!(request.resource_label(), "cmdb/firewall/policy/7");
        assert!(request.body.is_some());
    }

    #[test]
    fn test_idempotency() {
        assert!(ApiRequest::get(ApiFamily::Cmdb, "a/b").is_idempotent());
        assert!(ApiRequest::delete(ApiFamily::Cmdb, "a/b").is_idempotent());
        assert!(!ApiRequest::post(ApiFamily::Cmdb, "a/b").is_idempotent());
    }
}
